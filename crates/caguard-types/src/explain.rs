//! Explain registry for finding codes and best-practice ids.
//!
//! Maps codes and `BPxxx` ids to human-readable explanations with remediation guidance.

use crate::ids;

/// Explanation entry for a code or best practice.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the finding.
    pub title: &'static str,
    /// What the check does and why it exists.
    pub description: &'static str,
    /// How to fix violations.
    pub remediation: &'static str,
    /// Before/after policy snippets, where a snippet helps.
    pub examples: Option<ExamplePair>,
}

/// Before and after policy examples (YAML).
#[derive(Debug, Clone)]
pub struct ExamplePair {
    /// Policy fragment that would trigger a finding.
    pub before: &'static str,
    /// Policy fragment that passes the check.
    pub after: &'static str,
}

/// Look up an explanation by code or best-practice id.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    match identifier {
        // Naming
        ids::CODE_PATTERN_MISMATCH => Some(explain_pattern_mismatch()),
        ids::CODE_INVALID_ENVIRONMENT => Some(explain_naming_component(
            "Invalid Environment",
            "The `env` component of the policy name is not in the naming rules' `environments` list.",
        )),
        ids::CODE_INVALID_SCOPE => Some(explain_naming_component(
            "Invalid Scope",
            "The scope component is neither in the naming rules' `scopes` list nor an `app-<name>` scope.",
        )),
        ids::CODE_INVALID_CONTROL => Some(explain_naming_component(
            "Invalid Control",
            "The `control` component of the policy name is not in the naming rules' `controls` list.",
        )),
        ids::CODE_INVALID_NUMBER_FORMAT => Some(explain_naming_component(
            "Invalid Policy Number",
            "The `number` component of the policy name is not an integer.",
        )),
        ids::CODE_NUMBER_OUT_OF_RANGE => Some(explain_naming_component(
            "Policy Number Out Of Range",
            "The `number` component lies outside the inclusive `numberRange` of the naming rules.",
        )),

        // Compliance
        ids::CODE_MISSING_REQUIRED_EXCLUSION => Some(explain_missing_required_exclusion()),
        ids::CODE_MISSING_MANDATORY_CONTROL => Some(explain_missing_mandatory_control()),
        ids::CODE_FORBIDDEN_STATE => Some(explain_forbidden_state()),
        ids::CODE_FORBIDDEN_CLIENT_APP_TYPE => Some(explain_forbidden_client_app_type()),
        ids::CODE_BELOW_MINIMUM_CONTROLS => Some(explain_below_minimum_controls()),
        ids::CODE_DISALLOWED_STATE => Some(explain_disallowed_state()),

        // Conflicts
        ids::CODE_OVERLAPPING_CONDITIONS => Some(explain_overlapping_conditions()),
        ids::CODE_REDUNDANT_POLICY => Some(explain_redundant_policy()),
        ids::CODE_COVERAGE_GAP => Some(explain_coverage_gap()),

        // Best practices
        ids::BP_EXCLUDE_BREAK_GLASS => {
            let mut exp = explain_missing_required_exclusion();
            exp.title = "Exclude Break-Glass Accounts";
            Some(exp)
        }
        ids::BP_BLOCK_LEGACY_AUTH => Some(explain_block_legacy_auth()),
        ids::BP_REPORT_ONLY_FIRST => Some(explain_report_only_first()),
        ids::BP_ADMINS_REQUIRE_MFA => Some(explain_admins_require_mfa()),
        ids::BP_ALL_USERS_NEED_EXCLUSION => Some(explain_all_users_need_exclusion()),
        ids::BP_EXTERNALS_REQUIRE_DEVICE => Some(explain_externals_require_device()),
        ids::BP_HIGH_RISK_SIGN_IN_FREQUENCY => Some(explain_high_risk_sign_in_frequency()),

        _ => None,
    }
}

/// List all known finding codes.
pub fn all_codes() -> &'static [&'static str] {
    &[
        ids::CODE_PATTERN_MISMATCH,
        ids::CODE_INVALID_ENVIRONMENT,
        ids::CODE_INVALID_SCOPE,
        ids::CODE_INVALID_CONTROL,
        ids::CODE_INVALID_NUMBER_FORMAT,
        ids::CODE_NUMBER_OUT_OF_RANGE,
        ids::CODE_MISSING_REQUIRED_EXCLUSION,
        ids::CODE_MISSING_MANDATORY_CONTROL,
        ids::CODE_FORBIDDEN_STATE,
        ids::CODE_FORBIDDEN_CLIENT_APP_TYPE,
        ids::CODE_BELOW_MINIMUM_CONTROLS,
        ids::CODE_DISALLOWED_STATE,
        ids::CODE_OVERLAPPING_CONDITIONS,
        ids::CODE_REDUNDANT_POLICY,
        ids::CODE_COVERAGE_GAP,
    ]
}

/// List all best-practice ids with a registered predicate.
pub fn all_practice_ids() -> &'static [&'static str] {
    &[
        ids::BP_EXCLUDE_BREAK_GLASS,
        ids::BP_BLOCK_LEGACY_AUTH,
        ids::BP_REPORT_ONLY_FIRST,
        ids::BP_ADMINS_REQUIRE_MFA,
        ids::BP_ALL_USERS_NEED_EXCLUSION,
        ids::BP_EXTERNALS_REQUIRE_DEVICE,
        ids::BP_HIGH_RISK_SIGN_IN_FREQUENCY,
    ]
}

// --- Naming ---

fn explain_pattern_mismatch() -> Explanation {
    Explanation {
        title: "Name Does Not Match Pattern",
        description: "\
The policy `name` does not match the `pattern` regular expression in the naming rules.

Names are the join key between naming, compliance, best-practice and conflict
results, and the naming convention encodes environment, scope, control and a
sequence number so reviewers can tell what a policy does from its name alone.",
        remediation: "\
Rename the policy to follow the convention, for example
`<lang>-<env>-ca-<scope>-<control>-<number>`.",
        examples: Some(ExamplePair {
            before: "name: RequireMfaForAdmins",
            after: "name: en-prd-ca-admins-mfa-001",
        }),
    }
}

fn explain_naming_component(title: &'static str, description: &'static str) -> Explanation {
    Explanation {
        title,
        description,
        remediation: "\
Use a value from the corresponding allow-list in the naming rules, or extend the
allow-list in the baseline if the new value is intentional.",
        examples: None,
    }
}

// --- Compliance ---

fn explain_missing_required_exclusion() -> Explanation {
    Explanation {
        title: "Missing Required Exclusion",
        description: "\
A group listed under `requiredExclusions.groups` is absent from
`conditions.users.excludeGroups`.

Required exclusions hold break-glass (emergency access) accounts. A restrictive
policy that applies to them can lock every administrator out of the tenant.",
        remediation: "Add every required group to `conditions.users.excludeGroups`.",
        examples: Some(ExamplePair {
            before: r#"conditions:
  users:
    includeUsers: [All]
    excludeGroups: []"#,
            after: r#"conditions:
  users:
    includeUsers: [All]
    excludeGroups: [AAD-BreakGlass-Accounts]"#,
        }),
    }
}

fn explain_missing_mandatory_control() -> Explanation {
    Explanation {
        title: "Missing Mandatory Control",
        description: "\
The policy scope has `mandatoryControls` in the compliance rules and one of them
is not present in `grantControls.builtInControls`.",
        remediation: "Add the mandatory control to `grantControls.builtInControls`.",
        examples: Some(ExamplePair {
            before: r#"grantControls:
  builtInControls: [compliantDevice]"#,
            after: r#"grantControls:
  builtInControls: [mfa, compliantDevice]"#,
        }),
    }
}

fn explain_forbidden_state() -> Explanation {
    Explanation {
        title: "Forbidden State For Scope",
        description: "The policy `state` is listed in `forbiddenStates` for the policy scope.",
        remediation: "Change the policy state, or move the policy to a scope that allows it.",
        examples: None,
    }
}

fn explain_forbidden_client_app_type() -> Explanation {
    Explanation {
        title: "Forbidden Client App Type",
        description: "\
`conditions.clientAppTypes` contains a type listed in `forbiddenClientAppTypes`
for the policy scope.",
        remediation: "Remove the forbidden client app type from the policy conditions.",
        examples: None,
    }
}

fn explain_below_minimum_controls() -> Explanation {
    Explanation {
        title: "Below Minimum Controls",
        description: "\
The policy grants fewer built-in controls than `minimumControls` requires for
its scope. This finding is advisory.",
        remediation: "Add grant controls until the scope minimum is met.",
        examples: None,
    }
}

fn explain_disallowed_state() -> Explanation {
    Explanation {
        title: "Disallowed Policy State",
        description: "\
The policy `state` is not listed in the compliance rules' `allowedStates`. This
gate applies to every policy regardless of scope and fails the run.",
        remediation: "Use one of the allowed states.",
        examples: Some(ExamplePair {
            before: "state: disabled",
            after: "state: enabledForReportingButNotEnforced",
        }),
    }
}

// --- Conflicts ---

fn explain_overlapping_conditions() -> Explanation {
    Explanation {
        title: "Overlapping Conditions",
        description: "\
Two policies target at least one common group or user (or one targets `All`
users) but grant different control sets. Users in the overlap must satisfy both
policies, which is often not what either author intended.

Advisory by default; the `strict` profile or `fail_on_conflicts` promotes it.",
        remediation: "\
Align the grant controls, narrow the include conditions so the targets no longer
overlap, or merge the policies.",
        examples: None,
    }
}

fn explain_redundant_policy() -> Explanation {
    Explanation {
        title: "Redundant Policy",
        description: "\
Two policies have identical include/exclude groups, include users, include
applications and built-in controls. One of them has no effect.",
        remediation: "Delete one of the policies.",
        examples: None,
    }
}

fn explain_coverage_gap() -> Explanation {
    Explanation {
        title: "Coverage Gap",
        description: "\
A directory group from the supplied group list is not included by any policy.
System and service groups matching the configured denylist are ignored.",
        remediation: "Add the group to an appropriate policy, or to `system_group_patterns`.",
        examples: None,
    }
}

// --- Best practices ---

fn explain_block_legacy_auth() -> Explanation {
    Explanation {
        title: "Block Legacy Authentication",
        description: "\
The policy targets legacy client app types (`other`, `exchangeActiveSync`) but
does not block them. Legacy protocols cannot perform MFA.",
        remediation: "Grant the `block` control for legacy client app types.",
        examples: Some(ExamplePair {
            before: r#"conditions:
  clientAppTypes: [exchangeActiveSync, other]
grantControls:
  builtInControls: [mfa]"#,
            after: r#"conditions:
  clientAppTypes: [exchangeActiveSync, other]
grantControls:
  builtInControls: [block]"#,
        }),
    }
}

fn explain_report_only_first() -> Explanation {
    Explanation {
        title: "Start New Policies In Report-Only Mode",
        description: "\
The policy is newly created (its ticket id carries the new-policy prefix) and is
already `enabled`. New policies should run in report-only mode first so their
impact can be reviewed in sign-in logs.",
        remediation: "Set `state: enabledForReportingButNotEnforced` for the first rollout.",
        examples: None,
    }
}

fn explain_admins_require_mfa() -> Explanation {
    Explanation {
        title: "Require MFA For Administrators",
        description: "The policy scope is `admins` but `mfa` is not a grant control.",
        remediation: "Add `mfa` to `grantControls.builtInControls`.",
        examples: None,
    }
}

fn explain_all_users_need_exclusion() -> Explanation {
    Explanation {
        title: "All-Users Policies Need An Exclusion",
        description: "\
`includeUsers` contains `All` and `excludeGroups` is empty. There is no safety
exclusion for emergency access.",
        remediation: "Exclude at least the break-glass group.",
        examples: None,
    }
}

fn explain_externals_require_device() -> Explanation {
    Explanation {
        title: "Require A Managed Device For Externals",
        description: "\
The policy scope is `externals` and neither `compliantDevice` nor
`domainJoinedDevice` is a grant control.",
        remediation: "Add `compliantDevice` or `domainJoinedDevice`.",
        examples: None,
    }
}

fn explain_high_risk_sign_in_frequency() -> Explanation {
    Explanation {
        title: "Sign-In Frequency For High User Risk",
        description: "\
`userRiskLevels` includes `high` but `sessionControls.signInFrequency.value` is
not set, so a risky session can persist indefinitely.",
        remediation: "Set a sign-in frequency, for example `value: 1, type: hours`.",
        examples: None,
    }
}
