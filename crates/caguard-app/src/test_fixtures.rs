//! Temporary baseline and policy directories for use case tests.

use crate::CheckInput;
use caguard_settings::Overrides;
use caguard_types::CheckCategory;
use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

const NAMING_RULES: &str = r#"
pattern: '^(?P<lang>[a-z]{2})-(?P<env>[a-z]+)-ca-(?P<scope>app-[a-z0-9]+|[a-z]+)-(?P<control>[a-z]+)-(?P<number>\d+)$'
environments: [prd, tst, acc]
scopes: [admins, users, guests]
controls: [mfa, block, device]
numberRange: { min: 1, max: 999 }
"#;

const COMPLIANCE_RULES: &str = r#"
requiredExclusions:
  groups: [AAD-BreakGlass-Accounts]
scopeRequirements:
  admins:
    mandatoryControls: [mfa]
    forbiddenStates: [disabled]
allowedStates: [enabled, enabledForReportingButNotEnforced]
"#;

const BEST_PRACTICES: &str = r#"
- id: BP001
  name: Exclude break-glass accounts
  severity: critical
  remediation: Exclude the break-glass group
- id: BP003
  name: Report-only first
  severity: medium
  remediation: Deploy new policies in report-only mode first
"#;

pub(crate) struct Fixture {
    _dir: TempDir,
    pub root: Utf8PathBuf,
    pub policies: Utf8PathBuf,
    pub baseline: Utf8PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 temp dir");
        let policies = root.join("policies");
        let baseline = root.join("baseline");
        std::fs::create_dir_all(&policies).expect("create policies dir");
        std::fs::create_dir_all(&baseline).expect("create baseline dir");
        write(&baseline.join("naming-rules.yaml"), NAMING_RULES);
        write(&baseline.join("compliance-rules.yaml"), COMPLIANCE_RULES);
        write(&baseline.join("best-practices.yaml"), BEST_PRACTICES);
        Self {
            _dir: dir,
            root,
            policies,
            baseline,
        }
    }

    pub fn input(&self, category: CheckCategory) -> CheckInput<'_> {
        CheckInput {
            policies: &self.policies,
            baseline_dir: &self.baseline,
            config_text: "",
            overrides: Overrides::default(),
            category,
            groups_file: None,
        }
    }
}

pub(crate) fn write(path: &Utf8Path, contents: &str) {
    std::fs::write(path, contents).expect("write fixture file");
}

/// A policy that passes every rule in the fixture baseline.
pub(crate) fn admins_policy(name: &str) -> String {
    format!(
        r#"
name: {name}
displayName: {display}
state: enabled
metadata:
  owner: identity-team
  createdBy: ops
  ticketId: CHG-1
  justification: Admin MFA baseline
conditions:
  users:
    includeGroups: [Admins]
    excludeGroups: [AAD-BreakGlass-Accounts]
  applications:
    includeApplications: [All]
grantControls:
  operator: OR
  builtInControls: [mfa]
"#,
        display = name.to_uppercase()
    )
}
