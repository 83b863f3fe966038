use super::PracticeContext;
use crate::model::Policy;

/// Legacy client types in scope without a blocking grant control.
pub(super) fn is_violation(policy: &Policy, ctx: &PracticeContext) -> bool {
    let targets_legacy = policy
        .conditions
        .client_app_types
        .iter()
        .any(|t| ctx.legacy_client_app_types.contains(t));
    if !targets_legacy {
        return false;
    }
    !ctx
        .blocking_controls
        .iter()
        .any(|c| policy.grant_controls.has_control(c))
}
