use caguard_domain::policy::{ConflictGate, EngineConfig};

pub const PROFILE_STANDARD: &str = "standard";
pub const PROFILE_STRICT: &str = "strict";

/// Preset profiles. Both share the stock best-practice context and system
/// group denylist; they differ only in conflict gating.
pub fn preset(profile: &str) -> EngineConfig {
    match profile {
        PROFILE_STRICT => strict_profile(),
        // default
        _ => standard_profile(),
    }
}

fn standard_profile() -> EngineConfig {
    EngineConfig::default()
}

fn strict_profile() -> EngineConfig {
    EngineConfig {
        fail_on_conflicts: ConflictGate::High,
        ..EngineConfig::default()
    }
}
