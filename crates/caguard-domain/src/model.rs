//! Parsed policy documents.
//!
//! Field names follow the Microsoft Graph conditional access shape (camelCase),
//! with short aliases (`include`/`exclude`) accepted for condition lists.

use caguard_types::EvaluationError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Wildcard accepted in `includeUsers`.
pub const ALL_USERS: &str = "All";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    /// Unique identifier and join key across validators.
    pub name: String,
    pub display_name: String,
    pub state: PolicyState,
    pub metadata: PolicyMetadata,
    pub conditions: Conditions,
    pub grant_controls: GrantControls,
    #[serde(default)]
    pub session_controls: SessionControls,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum PolicyState {
    #[serde(rename = "enabled")]
    Enabled,
    #[serde(rename = "disabled")]
    Disabled,
    #[serde(
        rename = "enabledForReportingButNotEnforced",
        alias = "enabled-for-reporting-only",
        alias = "reportOnly"
    )]
    ReportOnly,
}

impl PolicyState {
    pub fn as_str(self) -> &'static str {
        match self {
            PolicyState::Enabled => "enabled",
            PolicyState::Disabled => "disabled",
            PolicyState::ReportOnly => "enabledForReportingButNotEnforced",
        }
    }
}

impl std::fmt::Display for PolicyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PolicyMetadata {
    pub owner: String,
    pub created_by: String,
    pub ticket_id: String,
    pub justification: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Conditions {
    #[serde(default)]
    pub users: UserConditions,
    #[serde(default)]
    pub applications: ApplicationConditions,
    #[serde(default)]
    pub locations: LocationConditions,
    #[serde(default)]
    pub platforms: PlatformConditions,
    #[serde(default)]
    pub client_app_types: Vec<String>,
    #[serde(default)]
    pub sign_in_risk_levels: Vec<String>,
    #[serde(default)]
    pub user_risk_levels: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserConditions {
    #[serde(default)]
    pub include_groups: Vec<String>,
    #[serde(default)]
    pub exclude_groups: Vec<String>,
    #[serde(default)]
    pub include_users: Vec<String>,
    #[serde(default)]
    pub exclude_users: Vec<String>,
}

impl UserConditions {
    pub fn includes_all_users(&self) -> bool {
        self.include_users.iter().any(|u| u == ALL_USERS)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ApplicationConditions {
    #[serde(default, rename = "includeApplications", alias = "include")]
    pub include: Vec<String>,
    #[serde(default, rename = "excludeApplications", alias = "exclude")]
    pub exclude: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LocationConditions {
    #[serde(default, rename = "includeLocations", alias = "include")]
    pub include: Vec<String>,
    #[serde(default, rename = "excludeLocations", alias = "exclude")]
    pub exclude: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PlatformConditions {
    #[serde(default, rename = "includePlatforms", alias = "include")]
    pub include: Vec<String>,
    #[serde(default, rename = "excludePlatforms", alias = "exclude")]
    pub exclude: Vec<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum GrantOperator {
    #[serde(rename = "AND")]
    And,
    #[default]
    #[serde(rename = "OR")]
    Or,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GrantControls {
    #[serde(default)]
    pub operator: GrantOperator,
    #[serde(default)]
    pub built_in_controls: Vec<String>,
    #[serde(default)]
    pub custom_authentication_factors: Vec<String>,
    #[serde(default)]
    pub terms_of_use: Vec<String>,
}

impl GrantControls {
    pub fn has_control(&self, control: &str) -> bool {
        self.built_in_controls.iter().any(|c| c == control)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionControls {
    #[serde(default)]
    pub sign_in_frequency: SignInFrequency,
    #[serde(default)]
    pub persistent_browser: PersistentBrowser,
    #[serde(default)]
    pub cloud_app_security: CloudAppSecurity,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SignInFrequency {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<u32>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl SignInFrequency {
    /// A zero value is treated the same as a missing one.
    pub fn is_set(&self) -> bool {
        self.value.is_some_and(|v| v > 0)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PersistentBrowser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CloudAppSecurity {
    #[serde(default, rename = "isEnabled", alias = "enabled")]
    pub enabled: bool,
    #[serde(
        default,
        rename = "cloudAppSecurityType",
        alias = "type",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
}

/// A successfully parsed policy and the document it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolicyDocument {
    pub source: String,
    pub policy: Policy,
}

/// Everything the loader produced: parsed documents in deterministic order plus
/// per-document failures. The engine validates `documents` and carries `errors`
/// into the report untouched.
#[derive(Clone, Debug, Default)]
pub struct PolicySet {
    pub documents: Vec<PolicyDocument>,
    pub errors: Vec<EvaluationError>,
}

impl PolicySet {
    pub fn from_policies(policies: Vec<Policy>) -> Self {
        Self {
            documents: policies
                .into_iter()
                .map(|p| PolicyDocument {
                    source: p.name.clone(),
                    policy: p,
                })
                .collect(),
            errors: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
