use crate::model::Policy;

pub(super) fn is_violation(policy: &Policy) -> bool {
    let users = &policy.conditions.users;
    users.includes_all_users() && users.exclude_groups.is_empty()
}
