use super::PracticeContext;
use crate::model::Policy;
use crate::scope::extract_scope;

const ADMINS_SCOPE: &str = "admins";
const MFA: &str = "mfa";

pub(super) fn is_violation(policy: &Policy, ctx: &PracticeContext) -> bool {
    extract_scope(&policy.name, ctx.naming_pattern.as_ref()) == ADMINS_SCOPE
        && !policy.grant_controls.has_control(MFA)
}
