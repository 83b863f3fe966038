use crate::model::Policy;

const HIGH_RISK: &str = "high";

/// High user risk in scope without a sign-in frequency (zero counts as unset).
pub(super) fn is_violation(policy: &Policy) -> bool {
    policy
        .conditions
        .user_risk_levels
        .iter()
        .any(|r| r == HIGH_RISK)
        && !policy.session_controls.sign_in_frequency.is_set()
}
