use anyhow::Context;
use caguard_render::{
    RenderableCounts, RenderableFinding, RenderableReport, RenderableSection, RenderableSeverity,
    RenderableVerdictStatus,
};
use caguard_types::{
    CheckCategory, Conflict, EvaluationError, ReportEnvelope, SCHEMA_REPORT_V1, Severity,
    ToolMeta, ValidationReport, Verdict, ids,
};
use time::OffsetDateTime;

pub fn parse_report_json(text: &str) -> anyhow::Result<ReportEnvelope> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: {schema:?} (expected {SCHEMA_REPORT_V1})");
    }

    serde_json::from_value(value).context("parse caguard report")
}

pub fn serialize_report(report: &ReportEnvelope) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}

pub fn to_renderable(envelope: &ReportEnvelope) -> RenderableReport {
    let report = &envelope.report;
    let mut findings = Vec::new();

    findings.extend(report.evaluation_errors.iter().map(|e| RenderableFinding {
        section: RenderableSection::EvaluationError,
        severity: RenderableSeverity::Critical,
        blocking: true,
        code: e.code.clone(),
        subject: Some(e.source.clone()),
        message: e.message.clone(),
    }));

    findings.extend(report.naming_errors.iter().map(|n| RenderableFinding {
        section: RenderableSection::Naming,
        severity: RenderableSeverity::High,
        blocking: true,
        code: n.code.as_str().to_string(),
        subject: Some(n.policy.clone()),
        message: n.message.clone(),
    }));

    findings.extend(report.violations.iter().map(|v| RenderableFinding {
        section: RenderableSection::Compliance,
        severity: renderable_severity(v.violation.severity),
        blocking: v.violation.severity.is_blocking(),
        code: v.violation.kind.as_str().to_string(),
        subject: Some(v.policy.clone()),
        message: v.violation.message.clone(),
    }));

    // The report only records whether the run blocked; conflicts are credited
    // with it when nothing else could have.
    let conflicts_block = report.blocking
        && report.naming_errors.is_empty()
        && !report
            .violations
            .iter()
            .any(|v| v.violation.severity.is_blocking());
    findings.extend(report.conflicts.iter().map(|c| RenderableFinding {
        section: RenderableSection::Conflict,
        severity: renderable_severity(c.severity),
        blocking: conflicts_block,
        code: c.kind.as_str().to_string(),
        subject: conflict_subject(c),
        message: c.description.clone(),
    }));

    findings.extend(report.recommendations.iter().map(|r| RenderableFinding {
        section: RenderableSection::BestPractice,
        severity: renderable_severity(r.recommendation.severity),
        blocking: false,
        code: r.recommendation.practice_id.clone(),
        subject: Some(r.policy.clone()),
        message: r.recommendation.remediation.clone(),
    }));

    RenderableReport {
        verdict: match envelope.verdict {
            Verdict::Pass => RenderableVerdictStatus::Pass,
            Verdict::Warn => RenderableVerdictStatus::Warn,
            Verdict::Fail => RenderableVerdictStatus::Fail,
        },
        category: report.category.as_str().to_string(),
        counts: RenderableCounts {
            policies_evaluated: report.counts.policies_evaluated,
            naming_errors: report.counts.naming_errors,
            critical: report.counts.critical,
            high: report.counts.high,
            medium: report.counts.medium,
            recommendations: report.counts.recommendations,
            conflicts: report.counts.conflicts,
            evaluation_errors: report.counts.evaluation_errors,
        },
        findings,
    }
}

fn renderable_severity(severity: Severity) -> RenderableSeverity {
    match severity {
        Severity::Medium => RenderableSeverity::Medium,
        Severity::High => RenderableSeverity::High,
        Severity::Critical => RenderableSeverity::Critical,
    }
}

fn conflict_subject(c: &Conflict) -> Option<String> {
    if c.policies.is_empty() {
        None
    } else {
        Some(c.policies.join(" / "))
    }
}

/// Envelope for a run that aborted before producing a report.
pub fn runtime_error_report(category: CheckCategory, message: &str) -> ReportEnvelope {
    let now = OffsetDateTime::now_utc();
    let mut report = ValidationReport::empty(category);
    report.evaluation_errors.push(EvaluationError {
        source: ids::CHECK_TOOL_RUNTIME.to_string(),
        code: ids::CODE_RUNTIME_ERROR.to_string(),
        message: message.to_string(),
    });
    report.counts.evaluation_errors = 1;

    ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "caguard".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at: now,
        finished_at: now,
        verdict: Verdict::Fail,
        report,
        runtime_error: Some(message.to_string()),
    }
}
