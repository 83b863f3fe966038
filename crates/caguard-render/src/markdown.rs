use crate::{RenderableReport, RenderableSeverity, RenderableVerdictStatus};

pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();

    out.push_str("# Caguard report\n\n");
    let verdict = match report.verdict {
        RenderableVerdictStatus::Pass => "PASS",
        RenderableVerdictStatus::Warn => "WARN",
        RenderableVerdictStatus::Fail => "FAIL",
    };
    let c = &report.counts;
    out.push_str(&format!(
        "- Verdict: **{}**\n- Checks: {}\n- Policies evaluated: {}\n\
         - Naming errors: {}\n- Violations: {} critical / {} high / {} medium\n\
         - Recommendations: {}\n- Conflicts: {}\n- Evaluation errors: {}\n\n",
        verdict,
        report.category,
        c.policies_evaluated,
        c.naming_errors,
        c.critical,
        c.high,
        c.medium,
        c.recommendations,
        c.conflicts,
        c.evaluation_errors,
    ));

    if report.findings.is_empty() {
        out.push_str("No findings.\n");
        return out;
    }

    for section in crate::RenderableSection::ALL {
        let mut items = report.findings.iter().filter(|f| f.section == section).peekable();
        if items.peek().is_none() {
            continue;
        }
        out.push_str(&format!("## {}\n\n", section.title()));
        for f in items {
            let sev = match f.severity {
                RenderableSeverity::Critical => "CRITICAL",
                RenderableSeverity::High => "HIGH",
                RenderableSeverity::Medium => "MEDIUM",
            };
            let marker = if f.blocking { " (blocking)" } else { "" };
            match &f.subject {
                Some(subject) => out.push_str(&format!(
                    "- [{}]{} `{}` / `{}`: {}\n",
                    sev, marker, subject, f.code, f.message
                )),
                None => out.push_str(&format!(
                    "- [{}]{} `{}`: {}\n",
                    sev, marker, f.code, f.message
                )),
            }
        }
        out.push('\n');
    }

    out
}
