//! Property-based tests for the domain crate.
//!
//! Invariants covered:
//! - naming: conforming names pass, one bad component yields exactly its error
//! - conflicts: a pair is never both overlapping and redundant
//! - engine: identical input produces identical reports

use crate::conflicts::detect;
use crate::engine::run_checks;
use crate::model::{Policy, PolicySet};
use crate::naming::validate;
use crate::policy::EngineConfig;
use crate::rules::Baseline;
use crate::test_support::{
    BREAK_GLASS, compliance_rules, full_catalog, naming_rules, policy,
};
use caguard_types::{CheckCategory, ConflictKind, NamingCode};
use proptest::prelude::*;
use std::collections::BTreeMap;

// ============================================================================
// Strategies
// ============================================================================

fn arb_component(allowed: Vec<String>) -> impl Strategy<Value = String> {
    prop::sample::select(allowed)
}

fn arb_valid_name() -> impl Strategy<Value = (String, String, String, u32)> {
    let rules = naming_rules();
    (
        arb_component(rules.environments),
        arb_component(rules.scopes),
        arb_component(rules.controls),
        1u32..=999,
    )
}

fn arb_policy(index: usize) -> impl Strategy<Value = Policy> {
    (
        prop::sample::subsequence(vec!["G1", "G2", "G3"], 0..=2),
        prop::sample::subsequence(vec!["All", "u1", "u2"], 0..=1),
        prop::sample::subsequence(vec!["mfa", "block", "compliantDevice"], 0..=2),
        any::<bool>(),
    )
        .prop_map(move |(groups, users, controls, break_glass)| {
            let excludes: &[&str] = if break_glass { &[BREAK_GLASS] } else { &[] };
            policy(&format!("en-prd-ca-users-mfa-{:03}", index + 1))
                .include_groups(&groups)
                .include_users(&users)
                .exclude_groups(excludes)
                .controls(&controls)
                .build()
        })
}

fn arb_policies() -> impl Strategy<Value = Vec<Policy>> {
    (0usize..8).prop_flat_map(|n| (0..n).map(arb_policy).collect::<Vec<_>>())
}

// ============================================================================
// Naming
// ============================================================================

proptest! {
    #[test]
    fn conforming_names_validate((env, scope, control, number) in arb_valid_name()) {
        let name = format!("en-{env}-ca-{scope}-{control}-{number:03}");
        prop_assert_eq!(validate(&name, &naming_rules()), Ok(()));
    }

    #[test]
    fn single_bad_component_yields_its_error(
        (env, scope, control, number) in arb_valid_name(),
        which in 0usize..4,
        bad_number in 1000u32..100_000,
    ) {
        let rules = naming_rules();
        let (name, expected) = match which {
            0 => (format!("en-zzz-ca-{scope}-{control}-{number:03}"), NamingCode::InvalidEnvironment),
            1 => (format!("en-{env}-ca-zzz-{control}-{number:03}"), NamingCode::InvalidScope),
            2 => (format!("en-{env}-ca-{scope}-zzz-{number:03}"), NamingCode::InvalidControl),
            _ => (format!("en-{env}-ca-{scope}-{control}-{bad_number}"), NamingCode::NumberOutOfRange),
        };
        let err = validate(&name, &rules).expect_err("mutated name must fail");
        prop_assert_eq!(err.code(), expected);
    }
}

// ============================================================================
// Conflicts and engine
// ============================================================================

proptest! {
    #[test]
    fn overlap_and_redundancy_are_mutually_exclusive(policies in arb_policies()) {
        let mut seen: BTreeMap<(String, String), ConflictKind> = BTreeMap::new();
        for c in detect(&policies) {
            prop_assert_eq!(c.policies.len(), 2);
            let mut pair = c.policies.clone();
            pair.sort();
            let key = (pair[0].clone(), pair[1].clone());
            prop_assert!(seen.insert(key, c.kind).is_none(), "pair reported twice");
        }
    }

    #[test]
    fn run_checks_is_deterministic(policies in arb_policies()) {
        let baseline = Baseline {
            naming: Some(naming_rules()),
            compliance: Some(compliance_rules()),
            best_practices: full_catalog(),
        };
        let cfg = EngineConfig::default();
        let set = PolicySet::from_policies(policies);
        let first = run_checks(&set, CheckCategory::All, &baseline, &cfg, None);
        let second = run_checks(&set, CheckCategory::All, &baseline, &cfg, None);
        let a = serde_json::to_vec(&first).expect("serialize");
        let b = serde_json::to_vec(&second).expect("serialize");
        prop_assert_eq!(a, b);
    }
}
