//! The `check` use case: load rules and policies, run the engine, produce a report.

use anyhow::Context;
use caguard_repo::BaselineNeeds;
use caguard_settings::{Overrides, ResolvedConfig};
use caguard_types::{CheckCategory, ReportEnvelope, SCHEMA_REPORT_V1, ToolMeta, Verdict};
use camino::Utf8Path;
use time::OffsetDateTime;
use tracing::{debug, info};

/// Input for the check use case.
#[derive(Clone, Debug)]
pub struct CheckInput<'a> {
    /// Policy directory or single policy file.
    pub policies: &'a Utf8Path,
    /// Directory holding the baseline rule documents.
    pub baseline_dir: &'a Utf8Path,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
    pub category: CheckCategory,
    /// Optional list of directory groups for the coverage-gap pass.
    pub groups_file: Option<&'a Utf8Path>,
}

/// Output from the check use case.
#[derive(Clone, Debug)]
pub struct CheckOutput {
    pub report: ReportEnvelope,
    /// The resolved configuration used.
    pub resolved_config: ResolvedConfig,
}

/// Rule documents required by a category.
pub fn baseline_needs(category: CheckCategory) -> BaselineNeeds {
    BaselineNeeds {
        naming: category.runs_naming(),
        compliance: category.runs_compliance(),
        best_practices: category.runs_best_practices(),
    }
}

/// Run the check use case: parse config, load baseline and policies, evaluate, produce report.
pub fn run_check(input: CheckInput<'_>) -> anyhow::Result<CheckOutput> {
    let started_at = OffsetDateTime::now_utc();

    // Parse config (empty is allowed, defaults apply).
    let cfg = if input.config_text.trim().is_empty() {
        caguard_settings::CaguardConfigV1::default()
    } else {
        caguard_settings::parse_config_toml(input.config_text).context("parse config")?
    };

    let mut resolved = caguard_settings::resolve_config(cfg, input.overrides.clone())
        .context("resolve config")?;
    debug!(profile = %resolved.profile, "resolved config");

    let mut needs = baseline_needs(input.category);
    if needs.compliance || needs.best_practices {
        // Scope extraction prefers the naming pattern; it is optional here.
        needs.naming = needs.naming
            || caguard_repo::baseline_document_exists(input.baseline_dir, caguard_repo::NAMING_STEMS);
    }
    let docs = caguard_repo::load_baseline_docs(input.baseline_dir, needs)
        .context("load baseline rules")?;
    let baseline = caguard_settings::resolve_baseline(docs).context("resolve baseline rules")?;
    resolved.engine.practice_context.naming_pattern =
        baseline.naming.as_ref().map(|n| n.pattern.clone());
    info!(
        naming = baseline.naming.is_some(),
        compliance = baseline.compliance.is_some(),
        best_practices = baseline.best_practices.len(),
        "baseline loaded"
    );

    let set = caguard_repo::load_policy_set(input.policies).context("load policies")?;
    info!(
        documents = set.documents.len(),
        errors = set.errors.len(),
        "policies loaded"
    );

    let groups = input
        .groups_file
        .map(caguard_repo::load_name_list)
        .transpose()
        .context("load directory groups")?;

    let report = caguard_domain::run_checks(
        &set,
        input.category,
        &baseline,
        &resolved.engine,
        groups.as_deref(),
    );

    let finished_at = OffsetDateTime::now_utc();
    let duration_ms =
        u64::try_from((finished_at - started_at).whole_milliseconds()).unwrap_or(0);
    let verdict = report.verdict();
    info!(
        category = input.category.as_str(),
        verdict = ?verdict,
        duration_ms,
        "check finished"
    );

    Ok(CheckOutput {
        report: ReportEnvelope {
            schema: SCHEMA_REPORT_V1.to_string(),
            tool: ToolMeta {
                name: "caguard".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            started_at,
            finished_at,
            verdict,
            report,
            runtime_error: None,
        },
        resolved_config: resolved,
    })
}

/// Map verdict to exit code: 0 = pass/warn, 2 = fail.
pub fn verdict_exit_code(verdict: Verdict) -> i32 {
    match verdict {
        Verdict::Pass => 0,
        Verdict::Warn => 0,
        Verdict::Fail => 2,
    }
}
