//! The `plan` use case: validate everything, then decide what a deployment
//! would create or update.

use crate::check::{CheckInput, run_check};
use anyhow::Context;
use caguard_domain::plan::{PlanAction, PlannedChange};
use caguard_types::{CheckCategory, ReportEnvelope, Verdict};
use camino::Utf8Path;
use tracing::{info, warn};

/// Input for the plan use case. The check always runs with category `all`.
#[derive(Clone, Debug)]
pub struct PlanInput<'a> {
    pub check: CheckInput<'a>,
    /// Display names already deployed in the tenant.
    pub existing: Option<&'a Utf8Path>,
}

#[derive(Clone, Debug)]
pub struct PlanOutput {
    pub report: ReportEnvelope,
    /// `None` when the validation verdict refused the plan.
    pub changes: Option<Vec<PlannedChange>>,
}

pub fn run_plan(input: PlanInput<'_>) -> anyhow::Result<PlanOutput> {
    let mut check = input.check;
    check.category = CheckCategory::All;
    let policies = check.policies;
    let output = run_check(check)?;

    if output.report.verdict == Verdict::Fail {
        warn!("plan refused: validation failed");
        return Ok(PlanOutput {
            report: output.report,
            changes: None,
        });
    }

    let existing = input
        .existing
        .map(caguard_repo::load_name_list)
        .transpose()
        .context("load existing display names")?
        .unwrap_or_default();

    // A passing report has no evaluation errors, so every document is unique.
    let set = caguard_repo::load_policy_set(policies).context("load policies")?;
    let changes = caguard_domain::plan::plan(set.documents.iter().map(|d| &d.policy), &existing);
    info!(changes = changes.len(), "plan computed");

    Ok(PlanOutput {
        report: output.report,
        changes: Some(changes),
    })
}

/// Format a plan for terminal display.
pub fn format_plan(output: &PlanOutput) -> String {
    let Some(changes) = &output.changes else {
        let counts = &output.report.report.counts;
        return format!(
            "Plan refused: validation failed ({} naming error(s), {} critical, {} high, {} evaluation error(s))\n",
            counts.naming_errors, counts.critical, counts.high, counts.evaluation_errors
        );
    };

    let mut out = String::new();
    for change in changes {
        let action = match change.action {
            PlanAction::Create => "create",
            PlanAction::Update => "update",
        };
        out.push_str(&format!(
            "{action:<6} {} ({})\n",
            change.policy, change.display_name
        ));
    }
    let creates = changes
        .iter()
        .filter(|c| c.action == PlanAction::Create)
        .count();
    out.push_str(&format!(
        "\nPlan: {creates} to create, {} to update\n",
        changes.len() - creates
    ));
    out
}
