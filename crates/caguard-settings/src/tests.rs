use super::*;
use caguard_domain::model::PolicyState;
use caguard_domain::policy::ConflictGate;
use caguard_domain::practices::PracticeCheck;
use caguard_types::Severity;

const NAMING_YAML: &str = r#"
pattern: '^(?P<lang>[a-z]{2})-(?P<env>[a-z]+)-ca-(?P<scope>app-[a-z0-9]+|[a-z]+)-(?P<control>[a-z]+)-(?P<number>\d+)$'
environments: [prd, tst]
scopes: [admins, users]
controls: [mfa, block]
numberRange: { min: 1, max: 999 }
"#;

const COMPLIANCE_YAML: &str = r#"
requiredExclusions:
  groups: [AAD-BreakGlass-Accounts]
scopeRequirements:
  admins:
    mandatoryControls: [mfa]
    forbiddenStates: [disabled]
    minimumControls: 1
  app:
    forbiddenClientAppTypes: [other]
allowedStates: [enabled, enabledForReportingButNotEnforced]
"#;

const CATALOG_WRAPPED_YAML: &str = r#"
bestPractices:
  - id: BP001
    name: Exclude break-glass accounts
    severity: critical
    check: excludeGroups contains AAD-BreakGlass-Accounts
    remediation: Add AAD-BreakGlass-Accounts to excludeGroups
  - id: BP004
    name: Admins require MFA
    severity: high
    check: admins scope requires mfa
    remediation: Add mfa to builtInControls
"#;

#[test]
fn naming_rules_resolve() {
    let doc = parse_naming_rules(NAMING_YAML, DocFormat::Yaml).expect("parse");
    let rules = resolve_naming(doc).expect("resolve");
    assert_eq!(rules.environments, vec!["prd", "tst"]);
    assert_eq!(rules.number_range.max, 999);
    assert!(rules.pattern.is_match("en-prd-ca-admins-mfa-001"));
}

#[test]
fn invalid_regex_is_fatal() {
    let doc = NamingRulesDoc {
        pattern: "(?P<env>[a-z".to_string(),
        environments: vec![],
        scopes: vec![],
        controls: vec![],
        number_range: NumberRangeDoc { min: 1, max: 2 },
    };
    let err = resolve_naming(doc).unwrap_err();
    assert!(err.to_string().contains("invalid naming pattern"));
}

#[test]
fn pattern_without_env_group_is_rejected() {
    let mut doc = parse_naming_rules(NAMING_YAML, DocFormat::Yaml).expect("parse");
    doc.pattern = r"^(?P<control>[a-z]+)$".to_string();
    let err = resolve_naming(doc).unwrap_err();
    assert!(err.to_string().contains("`env`"));
}

#[test]
fn inverted_number_range_is_rejected() {
    let mut doc = parse_naming_rules(NAMING_YAML, DocFormat::Yaml).expect("parse");
    doc.number_range = NumberRangeDoc { min: 10, max: 1 };
    assert!(resolve_naming(doc).is_err());
}

#[test]
fn missing_required_field_is_fatal() {
    let err = parse_naming_rules("pattern: '^x$'\n", DocFormat::Yaml).unwrap_err();
    assert!(format!("{err:#}").contains("environments"));
}

#[test]
fn compliance_rules_resolve_with_pattern() {
    let naming = resolve_naming(parse_naming_rules(NAMING_YAML, DocFormat::Yaml).expect("parse"))
        .expect("resolve");
    let doc = parse_compliance_rules(COMPLIANCE_YAML, DocFormat::Yaml).expect("parse");
    let rules = resolve_compliance(doc, Some(&naming.pattern)).expect("resolve");
    assert_eq!(rules.required_exclusion_groups, vec!["AAD-BreakGlass-Accounts"]);
    assert_eq!(
        rules.allowed_states,
        vec![PolicyState::Enabled, PolicyState::ReportOnly]
    );
    let admins = rules.requirement_for("admins").expect("admins");
    assert_eq!(admins.forbidden_states, vec![PolicyState::Disabled]);
    assert_eq!(admins.minimum_controls, Some(1));
    assert!(rules.requirement_for("app-payroll").is_some());
    assert!(rules.pattern.is_some());
}

#[test]
fn compliance_rules_parse_from_json() {
    let json = r#"{
        "requiredExclusions": {"groups": ["BG"]},
        "allowedStates": ["enabled"]
    }"#;
    let doc = parse_compliance_rules(json, DocFormat::Json).expect("parse");
    let rules = resolve_compliance(doc, None).expect("resolve");
    assert!(rules.scope_requirements.is_empty());
    assert!(rules.pattern.is_none());
}

#[test]
fn unknown_state_in_rules_is_fatal() {
    let yaml = "requiredExclusions: {groups: []}\nallowedStates: [paused]\n";
    assert!(parse_compliance_rules(yaml, DocFormat::Yaml).is_err());
}

#[test]
fn catalog_accepts_wrapper_and_bare_list() {
    let wrapped = parse_best_practices(CATALOG_WRAPPED_YAML, DocFormat::Yaml).expect("wrapped");
    assert_eq!(wrapped.len(), 2);

    let bare = r#"[{"id": "BP005", "name": "All users", "severity": "medium", "check": "", "remediation": "exclude a group"}]"#;
    let list = parse_best_practices(bare, DocFormat::Json).expect("bare");
    assert_eq!(list[0].severity, Severity::Medium);

    let resolved = resolve_best_practices(wrapped).expect("resolve");
    assert_eq!(resolved[0].predicate, PracticeCheck::ExcludeBreakGlass);
    assert_eq!(resolved[1].predicate, PracticeCheck::AdminsRequireMfa);
    assert_eq!(resolved[0].severity, Severity::Critical);
}

#[test]
fn free_text_severity_is_rejected() {
    let bare = r#"[{"id": "BP001", "name": "x", "severity": "urgent", "remediation": "y"}]"#;
    assert!(parse_best_practices(bare, DocFormat::Json).is_err());
}

#[test]
fn unknown_practice_id_fails_fast() {
    let bare = r#"[{"id": "BP042", "name": "x", "severity": "high", "remediation": "y"}]"#;
    let docs = parse_best_practices(bare, DocFormat::Json).expect("parse");
    let err = resolve_best_practices(docs).unwrap_err();
    assert!(format!("{err:#}").contains("BP042"));
}

#[test]
fn duplicate_practice_id_is_rejected() {
    let bare = r#"[
        {"id": "BP001", "name": "x", "severity": "high", "remediation": "y"},
        {"id": "BP001", "name": "x", "severity": "high", "remediation": "y"}
    ]"#;
    let docs = parse_best_practices(bare, DocFormat::Json).expect("parse");
    assert!(resolve_best_practices(docs).is_err());
}

#[test]
fn baseline_wires_naming_pattern_into_compliance() {
    let baseline = resolve_baseline(BaselineDocs {
        naming: Some(parse_naming_rules(NAMING_YAML, DocFormat::Yaml).expect("parse")),
        compliance: Some(parse_compliance_rules(COMPLIANCE_YAML, DocFormat::Yaml).expect("parse")),
        best_practices: None,
    })
    .expect("resolve");
    assert!(baseline.compliance.expect("compliance").pattern.is_some());
    assert!(baseline.best_practices.is_empty());
}

#[test]
fn default_config_is_standard_profile() {
    let resolved = resolve_config(CaguardConfigV1::default(), Overrides::default()).expect("cfg");
    assert_eq!(resolved.profile, PROFILE_STANDARD);
    assert_eq!(resolved.engine.fail_on_conflicts, ConflictGate::Never);
    assert_eq!(resolved.engine.parallel_threshold, 64);
}

#[test]
fn strict_profile_gates_high_conflicts() {
    let cfg = parse_config_toml("profile = \"strict\"\n").expect("toml");
    let resolved = resolve_config(cfg, Overrides::default()).expect("cfg");
    assert_eq!(resolved.engine.fail_on_conflicts, ConflictGate::High);
}

#[test]
fn overrides_beat_config_file() {
    let cfg = parse_config_toml(
        r#"
schema = "caguard.config.v1"
profile = "strict"
fail_on_conflicts = "high"
parallel_threshold = 10
break_glass_group = "Emergency-Access"
new_ticket_prefix = "INIT"
system_group_patterns = ["Lab-*"]
"#,
    )
    .expect("toml");
    let resolved = resolve_config(
        cfg,
        Overrides {
            profile: None,
            fail_on_conflicts: Some("any".to_string()),
            parallel_threshold: Some(2),
        },
    )
    .expect("cfg");
    assert_eq!(resolved.profile, PROFILE_STRICT);
    assert_eq!(resolved.engine.fail_on_conflicts, ConflictGate::Any);
    assert_eq!(resolved.engine.parallel_threshold, 2);
    assert_eq!(
        resolved.engine.practice_context.break_glass_group,
        "Emergency-Access"
    );
    assert_eq!(resolved.engine.practice_context.new_ticket_prefix, "INIT");
    assert!(resolved.engine.system_groups.is_system_group("Lab-7"));
    assert!(!resolved.engine.system_groups.is_system_group("Service-X"));
}

#[test]
fn unknown_profile_and_gate_are_errors() {
    let bad_profile = CaguardConfigV1 {
        profile: Some("lenient".to_string()),
        ..CaguardConfigV1::default()
    };
    assert!(resolve_config(bad_profile, Overrides::default()).is_err());

    let bad_gate = CaguardConfigV1 {
        fail_on_conflicts: Some("sometimes".to_string()),
        ..CaguardConfigV1::default()
    };
    assert!(resolve_config(bad_gate, Overrides::default()).is_err());
}

#[test]
fn doc_format_from_extension() {
    assert_eq!(DocFormat::from_extension("YML"), Some(DocFormat::Yaml));
    assert_eq!(DocFormat::from_extension("json"), Some(DocFormat::Json));
    assert_eq!(DocFormat::from_extension("toml"), None);
}
