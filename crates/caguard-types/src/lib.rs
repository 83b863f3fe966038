//! Stable DTOs and IDs used across the caguard workspace.
//!
//! This crate is intentionally boring:
//! - data types for the emitted validation report and its envelope
//! - the closed severity ranking
//! - stable string IDs and codes
//! - canonical document-relative path handling
//! - explain registry for remediation guidance

#![forbid(unsafe_code)]

pub mod explain;
pub mod ids;
pub mod path;
pub mod report;

pub use explain::{ExamplePair, Explanation, lookup_explanation};
pub use path::DocPath;
pub use report::{
    CheckCategory, Conflict, ConflictKind, EvaluationError, NamingCode, NamingFinding,
    PolicyRecommendation, PolicyViolation, Recommendation, ReportCounts, ReportEnvelope,
    SCHEMA_REPORT_V1, Severity, ToolMeta, ValidationReport, Verdict, Violation, ViolationKind,
};
