#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum RenderableSeverity {
    Medium,
    High,
    Critical,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableVerdictStatus {
    Pass,
    Warn,
    Fail,
}

/// Report section a finding belongs to, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum RenderableSection {
    EvaluationError,
    Naming,
    Compliance,
    Conflict,
    BestPractice,
}

impl RenderableSection {
    pub const ALL: [RenderableSection; 5] = [
        RenderableSection::EvaluationError,
        RenderableSection::Naming,
        RenderableSection::Compliance,
        RenderableSection::Conflict,
        RenderableSection::BestPractice,
    ];

    pub fn title(self) -> &'static str {
        match self {
            RenderableSection::EvaluationError => "Evaluation errors",
            RenderableSection::Naming => "Naming",
            RenderableSection::Compliance => "Compliance",
            RenderableSection::Conflict => "Conflicts",
            RenderableSection::BestPractice => "Best practices",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableFinding {
    pub section: RenderableSection,
    pub severity: RenderableSeverity,
    /// Whether this finding fails the run.
    pub blocking: bool,
    pub code: String,
    /// Policy name, document path or policy pair the finding is about.
    pub subject: Option<String>,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderableCounts {
    pub policies_evaluated: u32,
    pub naming_errors: u32,
    pub critical: u32,
    pub high: u32,
    pub medium: u32,
    pub recommendations: u32,
    pub conflicts: u32,
    pub evaluation_errors: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableReport {
    pub verdict: RenderableVerdictStatus,
    pub category: String,
    pub counts: RenderableCounts,
    pub findings: Vec<RenderableFinding>,
}
