//! Use case orchestration for caguard.
//!
//! This crate provides the application layer: use cases that coordinate the domain, repo, and
//! render layers. It is intentionally thin and delegates heavy lifting to the appropriate layers.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod check;
mod explain;
mod plan;
mod render;
mod report;

#[cfg(test)]
mod test_fixtures;

pub use check::{CheckInput, CheckOutput, baseline_needs, run_check, verdict_exit_code};
pub use explain::{ExplainOutput, format_explanation, format_not_found, run_explain};
pub use plan::{PlanInput, PlanOutput, format_plan, run_plan};
pub use render::{render_annotations, render_markdown};
pub use report::{parse_report_json, runtime_error_report, serialize_report, to_renderable};
