use super::PracticeContext;
use crate::model::{Policy, PolicyState};

/// A newly ticketed policy should launch in report-only mode.
pub(super) fn is_violation(policy: &Policy, ctx: &PracticeContext) -> bool {
    if ctx.new_ticket_prefix.is_empty() {
        return false;
    }
    policy.state == PolicyState::Enabled
        && policy
            .metadata
            .ticket_id
            .starts_with(ctx.new_ticket_prefix.as_str())
}
