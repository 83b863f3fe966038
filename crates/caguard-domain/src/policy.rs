use crate::conflicts::SystemGroupFilter;
use crate::practices::PracticeContext;
use caguard_types::{ConflictKind, Severity};

/// Policy count at which the conflict scan switches to the rayon path.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

/// Opt-in promotion of conflicts to blocking.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConflictGate {
    #[default]
    Never,
    High,
    Any,
}

impl ConflictGate {
    pub fn blocks(self, kind: ConflictKind) -> bool {
        match self {
            ConflictGate::Never => false,
            ConflictGate::High => kind.severity() >= Severity::High,
            ConflictGate::Any => true,
        }
    }
}

#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub fail_on_conflicts: ConflictGate,
    pub practice_context: PracticeContext,
    pub system_groups: SystemGroupFilter,
    pub parallel_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fail_on_conflicts: ConflictGate::Never,
            practice_context: PracticeContext::default(),
            system_groups: SystemGroupFilter::default(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}
