//! Best-practice predicate registry.
//!
//! Catalog entries carry documentation; evaluation is dispatched on the stable
//! practice id to one predicate per [`PracticeCheck`] variant. Adding a check
//! means adding a variant, its module, and a row in [`PracticeCheck::ALL`].

use crate::model::Policy;
use crate::rules::BestPractice;
use caguard_types::{Recommendation, ids};
use regex::Regex;
use thiserror::Error;

mod admins_require_mfa;
mod all_users_need_exclusion;
mod block_legacy_auth;
mod exclude_break_glass;
mod externals_require_device;
mod high_risk_sign_in_frequency;
mod report_only_first;

pub const DEFAULT_BREAK_GLASS_GROUP: &str = "AAD-BreakGlass-Accounts";
pub const DEFAULT_LEGACY_CLIENT_APP_TYPES: &[&str] = &["other", "exchangeActiveSync"];
pub const DEFAULT_BLOCKING_CONTROLS: &[&str] = &["block"];
pub const DEFAULT_NEW_TICKET_PREFIX: &str = "NEW";

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("best practice '{id}' has no registered check")]
    UnknownPracticeId { id: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PracticeCheck {
    ExcludeBreakGlass,
    BlockLegacyAuth,
    ReportOnlyFirst,
    AdminsRequireMfa,
    AllUsersNeedExclusion,
    ExternalsRequireDevice,
    HighRiskSignInFrequency,
}

impl PracticeCheck {
    pub const ALL: [PracticeCheck; 7] = [
        PracticeCheck::ExcludeBreakGlass,
        PracticeCheck::BlockLegacyAuth,
        PracticeCheck::ReportOnlyFirst,
        PracticeCheck::AdminsRequireMfa,
        PracticeCheck::AllUsersNeedExclusion,
        PracticeCheck::ExternalsRequireDevice,
        PracticeCheck::HighRiskSignInFrequency,
    ];

    pub fn id(self) -> &'static str {
        match self {
            PracticeCheck::ExcludeBreakGlass => ids::BP_EXCLUDE_BREAK_GLASS,
            PracticeCheck::BlockLegacyAuth => ids::BP_BLOCK_LEGACY_AUTH,
            PracticeCheck::ReportOnlyFirst => ids::BP_REPORT_ONLY_FIRST,
            PracticeCheck::AdminsRequireMfa => ids::BP_ADMINS_REQUIRE_MFA,
            PracticeCheck::AllUsersNeedExclusion => ids::BP_ALL_USERS_NEED_EXCLUSION,
            PracticeCheck::ExternalsRequireDevice => ids::BP_EXTERNALS_REQUIRE_DEVICE,
            PracticeCheck::HighRiskSignInFrequency => ids::BP_HIGH_RISK_SIGN_IN_FREQUENCY,
        }
    }

    /// Resolve a catalog id. Unknown ids are a configuration error.
    pub fn from_id(id: &str) -> Result<Self, CatalogError> {
        Self::ALL
            .into_iter()
            .find(|c| c.id() == id)
            .ok_or_else(|| CatalogError::UnknownPracticeId { id: id.to_string() })
    }

    /// True when `policy` violates this practice.
    pub fn is_violation(self, policy: &Policy, ctx: &PracticeContext) -> bool {
        match self {
            PracticeCheck::ExcludeBreakGlass => exclude_break_glass::is_violation(policy, ctx),
            PracticeCheck::BlockLegacyAuth => block_legacy_auth::is_violation(policy, ctx),
            PracticeCheck::ReportOnlyFirst => report_only_first::is_violation(policy, ctx),
            PracticeCheck::AdminsRequireMfa => admins_require_mfa::is_violation(policy, ctx),
            PracticeCheck::AllUsersNeedExclusion => all_users_need_exclusion::is_violation(policy),
            PracticeCheck::ExternalsRequireDevice => {
                externals_require_device::is_violation(policy, ctx)
            }
            PracticeCheck::HighRiskSignInFrequency => {
                high_risk_sign_in_frequency::is_violation(policy)
            }
        }
    }
}

/// Tunables the predicates read. Defaults reproduce the stock catalog behavior.
#[derive(Clone, Debug)]
pub struct PracticeContext {
    pub break_glass_group: String,
    pub legacy_client_app_types: Vec<String>,
    pub blocking_controls: Vec<String>,
    pub new_ticket_prefix: String,
    /// Naming pattern used for scope extraction (BP004, BP006).
    pub naming_pattern: Option<Regex>,
}

impl Default for PracticeContext {
    fn default() -> Self {
        Self {
            break_glass_group: DEFAULT_BREAK_GLASS_GROUP.to_string(),
            legacy_client_app_types: to_strings(DEFAULT_LEGACY_CLIENT_APP_TYPES),
            blocking_controls: to_strings(DEFAULT_BLOCKING_CONTROLS),
            new_ticket_prefix: DEFAULT_NEW_TICKET_PREFIX.to_string(),
            naming_pattern: None,
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Evaluate every catalog entry against `policy`, in catalog order.
pub fn validate(
    policy: &Policy,
    practices: &[BestPractice],
    ctx: &PracticeContext,
) -> Vec<Recommendation> {
    practices
        .iter()
        .filter(|bp| bp.predicate.is_violation(policy, ctx))
        .map(|bp| Recommendation {
            practice_id: bp.id.clone(),
            severity: bp.severity,
            remediation: bp.remediation.clone(),
        })
        .collect()
}
