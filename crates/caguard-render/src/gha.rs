use crate::{RenderableReport, RenderableSection, RenderableSeverity};

/// Render findings as GitHub Actions workflow command annotations.
///
/// Levels: `error` for blocking findings, `notice` for medium best-practice
/// recommendations, `warning` for everything else.
pub fn render_github_annotations(report: &RenderableReport) -> Vec<String> {
    let mut out = Vec::new();

    for f in &report.findings {
        let level = if f.blocking {
            "error"
        } else if f.section == RenderableSection::BestPractice
            && f.severity == RenderableSeverity::Medium
        {
            "notice"
        } else {
            "warning"
        };

        let title = match &f.subject {
            Some(subject) => format!(" title={}", escape_property(subject)),
            None => String::new(),
        };

        let message = escape_data(&format!("[caguard:{}] {}", f.code, f.message));
        out.push(format!("::{level}{title}::{message}"));
    }

    out
}

fn escape_data(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}
