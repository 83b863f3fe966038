use super::PracticeContext;
use crate::model::Policy;

pub(super) fn is_violation(policy: &Policy, ctx: &PracticeContext) -> bool {
    !policy
        .conditions
        .users
        .exclude_groups
        .iter()
        .any(|g| g == &ctx.break_glass_group)
}
