//! Resolved baseline rule sets. Built once per run by the settings layer and
//! treated as immutable configuration afterwards.

use crate::model::PolicyState;
use crate::practices::PracticeCheck;
use caguard_types::Severity;
use regex::Regex;
use std::collections::BTreeMap;

/// Scope prefix that the naming and compliance rules treat as a wildcard family.
pub const APP_SCOPE_PREFIX: &str = "app-";

/// Compliance key consulted for `app-*` scopes with no exact entry.
pub const APP_SCOPE_BASE: &str = "app";

#[derive(Clone, Debug)]
pub struct NamingRules {
    /// Regex with named groups `env`, `scope`, `control`, `number`.
    pub pattern: Regex,
    pub environments: Vec<String>,
    pub scopes: Vec<String>,
    pub controls: Vec<String>,
    pub number_range: NumberRange,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NumberRange {
    pub min: i64,
    pub max: i64,
}

impl NumberRange {
    pub fn contains(&self, n: i64) -> bool {
        self.min <= n && n <= self.max
    }
}

#[derive(Clone, Debug)]
pub struct ComplianceRules {
    pub required_exclusion_groups: Vec<String>,
    pub scope_requirements: BTreeMap<String, ScopeRequirement>,
    pub allowed_states: Vec<PolicyState>,
    /// Naming pattern used for scope extraction; `None` means positional only.
    pub pattern: Option<Regex>,
}

impl ComplianceRules {
    /// Exact scope key first, then the `app` base key for `app-*` scopes.
    pub fn requirement_for(&self, scope: &str) -> Option<&ScopeRequirement> {
        self.scope_requirements.get(scope).or_else(|| {
            if scope.starts_with(APP_SCOPE_PREFIX) {
                self.scope_requirements.get(APP_SCOPE_BASE)
            } else {
                None
            }
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScopeRequirement {
    pub mandatory_controls: Vec<String>,
    pub forbidden_states: Vec<PolicyState>,
    pub forbidden_client_app_types: Vec<String>,
    pub minimum_controls: Option<usize>,
}

/// A catalog entry bound to its registered predicate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BestPractice {
    pub id: String,
    pub name: String,
    pub severity: Severity,
    /// Documentation only; evaluation is done by `predicate`.
    pub check: String,
    pub remediation: String,
    pub predicate: PracticeCheck,
}

/// All rule sets a run may need. Categories whose rules are absent are skipped.
#[derive(Clone, Debug, Default)]
pub struct Baseline {
    pub naming: Option<NamingRules>,
    pub compliance: Option<ComplianceRules>,
    pub best_practices: Vec<BestPractice>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules_with(keys: &[&str]) -> ComplianceRules {
        ComplianceRules {
            required_exclusion_groups: Vec::new(),
            scope_requirements: keys
                .iter()
                .map(|k| {
                    (
                        k.to_string(),
                        ScopeRequirement {
                            mandatory_controls: vec![k.to_string()],
                            ..ScopeRequirement::default()
                        },
                    )
                })
                .collect(),
            allowed_states: Vec::new(),
            pattern: None,
        }
    }

    #[test]
    fn app_scope_falls_back_to_base_key() {
        let rules = rules_with(&["app"]);
        let req = rules.requirement_for("app-payroll").expect("fallback");
        assert_eq!(req.mandatory_controls, vec!["app"]);
    }

    #[test]
    fn exact_compound_key_wins_over_base() {
        let rules = rules_with(&["app", "app-payroll"]);
        let req = rules.requirement_for("app-payroll").expect("exact");
        assert_eq!(req.mandatory_controls, vec!["app-payroll"]);
    }

    #[test]
    fn non_app_scope_has_no_fallback() {
        let rules = rules_with(&["app"]);
        assert!(rules.requirement_for("admins").is_none());
    }

    #[test]
    fn number_range_is_inclusive() {
        let r = NumberRange { min: 1, max: 999 };
        assert!(r.contains(1));
        assert!(r.contains(999));
        assert!(!r.contains(0));
        assert!(!r.contains(1000));
    }
}
