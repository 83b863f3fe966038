use caguard_domain::model::PolicyState;
use caguard_types::Severity;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Schema identifier for `caguard.toml`.
pub const SCHEMA_CONFIG_V1: &str = "caguard.config.v1";

/// Key of the legacy catalog wrapper object.
pub const CATALOG_WRAPPER_KEY: &str = "bestPractices";

/// `caguard.toml` schema v1.
///
/// Every field is optional; unset fields fall back to the profile preset.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CaguardConfigV1 {
    /// Optional schema string for tooling (`caguard.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// `standard` (default) or `strict`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Promote conflicts to blocking: `never`, `high` or `any`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on_conflicts: Option<String>,

    /// Group every policy should exclude (BP001).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break_glass_group: Option<String>,

    /// Client app types treated as legacy authentication (BP002).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_client_app_types: Option<Vec<String>>,

    /// Grant controls that count as blocking access (BP002).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocking_controls: Option<Vec<String>>,

    /// Ticket prefix marking a newly created policy (BP003).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_ticket_prefix: Option<String>,

    /// Glob patterns for groups ignored by the coverage-gap pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_group_patterns: Option<Vec<String>>,

    /// Policy count at which the conflict scan runs in parallel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel_threshold: Option<u32>,
}

/// `naming-rules` document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NamingRulesDoc {
    /// Regex with named groups `env`, `scope`, `control`, `number`.
    pub pattern: String,
    pub environments: Vec<String>,
    pub scopes: Vec<String>,
    pub controls: Vec<String>,
    pub number_range: NumberRangeDoc,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NumberRangeDoc {
    pub min: i64,
    pub max: i64,
}

/// `compliance-rules` document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceRulesDoc {
    pub required_exclusions: RequiredExclusionsDoc,
    #[serde(default)]
    pub scope_requirements: BTreeMap<String, ScopeRequirementDoc>,
    pub allowed_states: Vec<PolicyState>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RequiredExclusionsDoc {
    #[serde(default)]
    pub groups: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScopeRequirementDoc {
    #[serde(default)]
    pub mandatory_controls: Vec<String>,
    #[serde(default)]
    pub forbidden_states: Vec<PolicyState>,
    #[serde(default)]
    pub forbidden_client_app_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_controls: Option<u32>,
}

/// One `best-practices` catalog entry. `check` is documentation only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BestPracticeDoc {
    pub id: String,
    pub name: String,
    pub severity: Severity,
    #[serde(default)]
    pub check: String,
    pub remediation: String,
}

/// Accepted catalog shapes: a bare list or the `bestPractices` wrapper.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum BestPracticeCatalogDoc {
    List(Vec<BestPracticeDoc>),
    Wrapped {
        #[serde(rename = "bestPractices")]
        best_practices: Vec<BestPracticeDoc>,
    },
}
