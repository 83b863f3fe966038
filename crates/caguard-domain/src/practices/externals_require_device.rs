use super::PracticeContext;
use crate::model::Policy;
use crate::scope::extract_scope;

const EXTERNALS_SCOPE: &str = "externals";
const DEVICE_CONTROLS: [&str; 2] = ["compliantDevice", "domainJoinedDevice"];

pub(super) fn is_violation(policy: &Policy, ctx: &PracticeContext) -> bool {
    extract_scope(&policy.name, ctx.naming_pattern.as_ref()) == EXTERNALS_SCOPE
        && !DEVICE_CONTROLS
            .iter()
            .any(|c| policy.grant_controls.has_control(c))
}
