//! The `explain` use case: look up code and best-practice documentation.

use caguard_types::explain::{self, Explanation};

/// Output from the explain use case.
#[derive(Clone, Debug)]
pub enum ExplainOutput {
    /// Found an explanation for the identifier.
    Found(Explanation),
    /// Unknown identifier; includes available codes and best-practice ids.
    NotFound {
        identifier: String,
        available_codes: &'static [&'static str],
        available_practice_ids: &'static [&'static str],
    },
}

/// Look up an explanation for a finding code or `BPxxx` id.
pub fn run_explain(identifier: &str) -> ExplainOutput {
    match explain::lookup_explanation(identifier) {
        Some(exp) => ExplainOutput::Found(exp),
        None => ExplainOutput::NotFound {
            identifier: identifier.to_string(),
            available_codes: explain::all_codes(),
            available_practice_ids: explain::all_practice_ids(),
        },
    }
}

/// Format an explanation for terminal display.
pub fn format_explanation(exp: &Explanation) -> String {
    let mut out = String::new();

    out.push_str(exp.title);
    out.push('\n');
    out.push_str(&"=".repeat(exp.title.len()));
    out.push_str("\n\n");
    out.push_str(exp.description);
    out.push_str("\n\n");
    out.push_str("Remediation\n");
    out.push_str("-----------\n");
    out.push_str(exp.remediation);
    out.push('\n');

    if let Some(examples) = &exp.examples {
        out.push('\n');
        out.push_str("Examples\n");
        out.push_str("--------\n\n");
        out.push_str("Before (violation):\n");
        out.push_str("```yaml\n");
        out.push_str(examples.before);
        out.push('\n');
        out.push_str("```\n\n");
        out.push_str("After (fixed):\n");
        out.push_str("```yaml\n");
        out.push_str(examples.after);
        out.push('\n');
        out.push_str("```\n");
    }

    out
}

/// Format the "not found" error message for terminal display.
pub fn format_not_found(
    identifier: &str,
    codes: &[&'static str],
    practice_ids: &[&'static str],
) -> String {
    let mut out = String::new();

    out.push_str(&format!("Unknown code or best-practice id: {identifier}\n\n"));
    out.push_str("Available codes:\n");
    for code in codes {
        out.push_str(&format!("  - {code}\n"));
    }
    out.push_str("\nAvailable best-practice ids:\n");
    for id in practice_ids {
        out.push_str(&format!("  - {id}\n"));
    }

    out
}
