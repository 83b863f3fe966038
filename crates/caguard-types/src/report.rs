use crate::ids;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Stable schema identifier for caguard reports.
pub const SCHEMA_REPORT_V1: &str = "caguard.report.v1";

/// Closed three-level ranking. Declaration order is the ranking order
/// (`Medium < High < Critical`).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    /// Critical and high compliance findings fail a run.
    pub fn is_blocking(self) -> bool {
        self >= Severity::High
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            other => Err(format!(
                "unknown severity: {other} (expected critical|high|medium)"
            )),
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which check categories a run evaluates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum CheckCategory {
    Naming,
    Compliance,
    BestPractices,
    Conflicts,
    All,
}

impl CheckCategory {
    pub fn runs_naming(self) -> bool {
        matches!(self, CheckCategory::Naming | CheckCategory::All)
    }

    pub fn runs_compliance(self) -> bool {
        matches!(self, CheckCategory::Compliance | CheckCategory::All)
    }

    pub fn runs_best_practices(self) -> bool {
        matches!(self, CheckCategory::BestPractices | CheckCategory::All)
    }

    pub fn runs_conflicts(self) -> bool {
        matches!(self, CheckCategory::Conflicts | CheckCategory::All)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CheckCategory::Naming => ids::CHECK_NAMING,
            CheckCategory::Compliance => ids::CHECK_COMPLIANCE,
            CheckCategory::BestPractices => ids::CHECK_BEST_PRACTICES,
            CheckCategory::Conflicts => ids::CHECK_CONFLICTS,
            CheckCategory::All => "all",
        }
    }
}

impl std::str::FromStr for CheckCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "naming" => Ok(CheckCategory::Naming),
            "compliance" => Ok(CheckCategory::Compliance),
            "best-practices" => Ok(CheckCategory::BestPractices),
            "conflicts" => Ok(CheckCategory::Conflicts),
            "all" => Ok(CheckCategory::All),
            other => Err(format!(
                "unknown check category: {other} (expected naming|compliance|best-practices|conflicts|all)"
            )),
        }
    }
}

// ============================================================================
// Naming
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NamingCode {
    PatternMismatch,
    InvalidEnvironment,
    InvalidScope,
    InvalidControl,
    InvalidNumberFormat,
    NumberOutOfRange,
}

impl NamingCode {
    pub fn as_str(self) -> &'static str {
        match self {
            NamingCode::PatternMismatch => ids::CODE_PATTERN_MISMATCH,
            NamingCode::InvalidEnvironment => ids::CODE_INVALID_ENVIRONMENT,
            NamingCode::InvalidScope => ids::CODE_INVALID_SCOPE,
            NamingCode::InvalidControl => ids::CODE_INVALID_CONTROL,
            NamingCode::InvalidNumberFormat => ids::CODE_INVALID_NUMBER_FORMAT,
            NamingCode::NumberOutOfRange => ids::CODE_NUMBER_OUT_OF_RANGE,
        }
    }
}

/// A naming failure for one policy. Always blocking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NamingFinding {
    pub policy: String,
    pub code: NamingCode,
    pub message: String,
    pub fingerprint: String,
}

// ============================================================================
// Compliance
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    MissingRequiredExclusion,
    MissingMandatoryControl,
    ForbiddenState,
    ForbiddenClientAppType,
    BelowMinimumControls,
    DisallowedState,
}

impl ViolationKind {
    /// Engine-owned severity. Rule documents never carry severities.
    pub fn severity(self) -> Severity {
        match self {
            ViolationKind::MissingRequiredExclusion => Severity::Critical,
            ViolationKind::DisallowedState => Severity::Critical,
            ViolationKind::MissingMandatoryControl
            | ViolationKind::ForbiddenState
            | ViolationKind::ForbiddenClientAppType => Severity::High,
            ViolationKind::BelowMinimumControls => Severity::Medium,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ViolationKind::MissingRequiredExclusion => ids::CODE_MISSING_REQUIRED_EXCLUSION,
            ViolationKind::MissingMandatoryControl => ids::CODE_MISSING_MANDATORY_CONTROL,
            ViolationKind::ForbiddenState => ids::CODE_FORBIDDEN_STATE,
            ViolationKind::ForbiddenClientAppType => ids::CODE_FORBIDDEN_CLIENT_APP_TYPE,
            ViolationKind::BelowMinimumControls => ids::CODE_BELOW_MINIMUM_CONTROLS,
            ViolationKind::DisallowedState => ids::CODE_DISALLOWED_STATE,
        }
    }
}

/// Compliance output: `(severity, message)` tagged with its kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Violation {
    pub kind: ViolationKind,
    pub severity: Severity,
    pub message: String,
}

impl Violation {
    pub fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            message: message.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PolicyViolation {
    pub policy: String,
    #[serde(flatten)]
    pub violation: Violation,
    pub fingerprint: String,
}

// ============================================================================
// Best practices
// ============================================================================

/// Best-practice output. Advisory only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Recommendation {
    pub practice_id: String,
    pub severity: Severity,
    pub remediation: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PolicyRecommendation {
    pub policy: String,
    #[serde(flatten)]
    pub recommendation: Recommendation,
    pub fingerprint: String,
}

// ============================================================================
// Conflicts
// ============================================================================

/// Declaration order doubles as the report sort order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictKind {
    OverlappingConditions,
    RedundantPolicy,
    CoverageGap,
}

impl ConflictKind {
    pub fn severity(self) -> Severity {
        match self {
            ConflictKind::OverlappingConditions => Severity::High,
            ConflictKind::RedundantPolicy | ConflictKind::CoverageGap => Severity::Medium,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConflictKind::OverlappingConditions => ids::CODE_OVERLAPPING_CONDITIONS,
            ConflictKind::RedundantPolicy => ids::CODE_REDUNDANT_POLICY,
            ConflictKind::CoverageGap => ids::CODE_COVERAGE_GAP,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Conflict {
    #[serde(rename = "type")]
    pub kind: ConflictKind,
    pub severity: Severity,
    pub description: String,
    /// Affected policy names, in input order.
    #[serde(default)]
    pub policies: Vec<String>,
    /// Uncovered directory groups (coverage gaps only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,
}

// ============================================================================
// Report
// ============================================================================

/// A policy document that could not be evaluated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EvaluationError {
    /// Document identifier (relative path for files).
    pub source: String,
    pub code: String,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReportCounts {
    pub policies_evaluated: u32,
    pub naming_errors: u32,
    pub critical: u32,
    pub high: u32,
    pub medium: u32,
    pub recommendations: u32,
    pub conflicts: u32,
    pub evaluation_errors: u32,
}

/// Deterministic validation result. Contains no timestamps, so identical input
/// serializes to identical bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationReport {
    pub category: CheckCategory,
    /// True iff any naming error or critical/high compliance violation exists
    /// (or a conflict the caller opted to promote).
    pub blocking: bool,
    pub counts: ReportCounts,
    #[serde(default)]
    pub naming_errors: Vec<NamingFinding>,
    #[serde(default)]
    pub violations: Vec<PolicyViolation>,
    #[serde(default)]
    pub recommendations: Vec<PolicyRecommendation>,
    #[serde(default)]
    pub conflicts: Vec<Conflict>,
    #[serde(default)]
    pub evaluation_errors: Vec<EvaluationError>,
}

impl ValidationReport {
    pub fn empty(category: CheckCategory) -> Self {
        Self {
            category,
            blocking: false,
            counts: ReportCounts::default(),
            naming_errors: Vec::new(),
            violations: Vec::new(),
            recommendations: Vec::new(),
            conflicts: Vec::new(),
            evaluation_errors: Vec::new(),
        }
    }

    pub fn has_advisories(&self) -> bool {
        !self.recommendations.is_empty()
            || !self.conflicts.is_empty()
            || self.violations.iter().any(|v| !v.violation.severity.is_blocking())
    }

    pub fn verdict(&self) -> Verdict {
        if self.blocking || !self.evaluation_errors.is_empty() {
            Verdict::Fail
        } else if self.has_advisories() {
            Verdict::Warn
        } else {
            Verdict::Pass
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Warn,
    Fail,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// Outer shape written to disk: run metadata around the deterministic report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportEnvelope {
    /// Versioned schema identifier for the envelope shape.
    pub schema: String,
    pub tool: ToolMeta,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    pub verdict: Verdict,
    pub report: ValidationReport,
    /// Set when the run aborted before a report could be produced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_error: Option<String>,
}
