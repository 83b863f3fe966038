use crate::conflicts;
use crate::fingerprint::fingerprint_for_policy;
use crate::model::{Policy, PolicySet};
use crate::policy::EngineConfig;
use crate::rules::Baseline;
use crate::{compliance, naming, practices};
use caguard_types::{
    CheckCategory, Conflict, EvaluationError, NamingFinding, PolicyRecommendation,
    PolicyViolation, ReportCounts, Severity, ValidationReport, ids,
};
use rayon::prelude::*;
use std::collections::BTreeSet;

#[derive(Default)]
struct PolicyFindings {
    naming: Option<NamingFinding>,
    violations: Vec<PolicyViolation>,
    recommendations: Vec<PolicyRecommendation>,
}

/// Run the requested check categories over a policy set.
///
/// Categories whose rule set is absent from `baseline` contribute nothing.
/// The coverage-gap pass runs only when `directory_groups` is supplied.
pub fn run_checks(
    set: &PolicySet,
    category: CheckCategory,
    baseline: &Baseline,
    cfg: &EngineConfig,
    directory_groups: Option<&[String]>,
) -> ValidationReport {
    let (policies, mut evaluation_errors) = unique_policies(set);

    let per_policy: Vec<PolicyFindings> = policies
        .par_iter()
        .map(|p| evaluate_policy(p, category, baseline, cfg))
        .collect();

    let mut report = ValidationReport::empty(category);
    for f in per_policy {
        report.naming_errors.extend(f.naming);
        report.violations.extend(f.violations);
        report.recommendations.extend(f.recommendations);
    }

    if category.runs_conflicts() {
        report.conflicts = detect_conflicts(&policies, cfg, directory_groups);
    }

    evaluation_errors.sort_by(|a, b| a.source.cmp(&b.source).then(a.code.cmp(&b.code)));
    report.evaluation_errors = evaluation_errors;

    report.blocking = !report.naming_errors.is_empty()
        || report
            .violations
            .iter()
            .any(|v| v.violation.severity.is_blocking())
        || report
            .conflicts
            .iter()
            .any(|c| cfg.fail_on_conflicts.blocks(c.kind));
    report.counts = counts(&report, policies.len());
    report
}

/// First document wins for a given name; later ones become evaluation errors.
fn unique_policies(set: &PolicySet) -> (Vec<&Policy>, Vec<EvaluationError>) {
    let mut errors = set.errors.clone();
    let mut seen = BTreeSet::new();
    let mut policies = Vec::with_capacity(set.documents.len());
    for doc in &set.documents {
        if seen.insert(doc.policy.name.as_str()) {
            policies.push(&doc.policy);
        } else {
            errors.push(EvaluationError {
                source: doc.source.clone(),
                code: ids::CODE_DUPLICATE_POLICY_NAME.to_string(),
                message: format!(
                    "policy name '{}' is already defined by another document",
                    doc.policy.name
                ),
            });
        }
    }
    (policies, errors)
}

fn evaluate_policy(
    policy: &Policy,
    category: CheckCategory,
    baseline: &Baseline,
    cfg: &EngineConfig,
) -> PolicyFindings {
    let mut out = PolicyFindings::default();

    if category.runs_naming()
        && let Some(rules) = &baseline.naming
        && let Err(err) = naming::validate(&policy.name, rules)
    {
        let code = err.code();
        out.naming = Some(NamingFinding {
            policy: policy.name.clone(),
            code,
            message: err.to_string(),
            fingerprint: fingerprint_for_policy(
                ids::CHECK_NAMING,
                code.as_str(),
                &policy.name,
                None,
            ),
        });
    }

    if category.runs_compliance()
        && let Some(rules) = &baseline.compliance
    {
        out.violations = compliance::validate(policy, rules)
            .into_iter()
            .map(|v| PolicyViolation {
                policy: policy.name.clone(),
                fingerprint: fingerprint_for_policy(
                    ids::CHECK_COMPLIANCE,
                    v.kind.as_str(),
                    &policy.name,
                    Some(v.message.as_str()),
                ),
                violation: v,
            })
            .collect();
    }

    if category.runs_best_practices() {
        out.recommendations =
            practices::validate(policy, &baseline.best_practices, &cfg.practice_context)
                .into_iter()
                .map(|r| PolicyRecommendation {
                    policy: policy.name.clone(),
                    fingerprint: fingerprint_for_policy(
                        ids::CHECK_BEST_PRACTICES,
                        &r.practice_id,
                        &policy.name,
                        None,
                    ),
                    recommendation: r,
                })
                .collect();
    }

    out
}

fn detect_conflicts(
    policies: &[&Policy],
    cfg: &EngineConfig,
    directory_groups: Option<&[String]>,
) -> Vec<Conflict> {
    let mut out = if policies.len() >= cfg.parallel_threshold {
        conflicts::detect_parallel(policies)
    } else {
        conflicts::detect(policies)
    };
    if let Some(groups) = directory_groups
        && let Some(gap) = conflicts::detect_coverage_gaps(policies, groups, &cfg.system_groups)
    {
        out.push(gap);
        conflicts::sort_conflicts(&mut out);
    }
    out
}

fn counts(report: &ValidationReport, policies_evaluated: usize) -> ReportCounts {
    let by_severity = |sev: Severity| {
        report
            .violations
            .iter()
            .filter(|v| v.violation.severity == sev)
            .count() as u32
    };
    ReportCounts {
        policies_evaluated: policies_evaluated as u32,
        naming_errors: report.naming_errors.len() as u32,
        critical: by_severity(Severity::Critical),
        high: by_severity(Severity::High),
        medium: by_severity(Severity::Medium),
        recommendations: report.recommendations.len() as u32,
        conflicts: report.conflicts.len() as u32,
        evaluation_errors: report.evaluation_errors.len() as u32,
    }
}
