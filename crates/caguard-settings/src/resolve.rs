use crate::model::{
    BestPracticeDoc, CaguardConfigV1, ComplianceRulesDoc, NamingRulesDoc, NumberRangeDoc,
};
use crate::presets::{self, PROFILE_STANDARD, PROFILE_STRICT};
use anyhow::Context;
use caguard_domain::conflicts::SystemGroupFilter;
use caguard_domain::policy::{ConflictGate, EngineConfig};
use caguard_domain::practices::PracticeCheck;
use caguard_domain::rules::{
    Baseline, BestPractice, ComplianceRules, NamingRules, NumberRange, ScopeRequirement,
};
use regex::Regex;
use std::collections::BTreeSet;

/// Named groups a naming pattern must define.
const REQUIRED_NAMING_GROUPS: [&str; 2] = ["env", "control"];

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub fail_on_conflicts: Option<String>,
    pub parallel_threshold: Option<u32>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub profile: String,
    pub engine: EngineConfig,
}

/// Parsed rule documents; `None` for documents the run does not need.
#[derive(Clone, Debug, Default)]
pub struct BaselineDocs {
    pub naming: Option<NamingRulesDoc>,
    pub compliance: Option<ComplianceRulesDoc>,
    pub best_practices: Option<Vec<BestPracticeDoc>>,
}

pub fn resolve_config(
    cfg: CaguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| PROFILE_STANDARD.to_string());
    validate_profile(&profile)?;

    let mut engine = presets::preset(&profile);

    if let Some(gate) = overrides
        .fail_on_conflicts
        .as_deref()
        .or(cfg.fail_on_conflicts.as_deref())
    {
        engine.fail_on_conflicts = parse_conflict_gate(gate)?;
    }

    if let Some(threshold) = overrides.parallel_threshold.or(cfg.parallel_threshold) {
        engine.parallel_threshold = threshold as usize;
    }

    let ctx = &mut engine.practice_context;
    if let Some(group) = cfg.break_glass_group {
        ctx.break_glass_group = group;
    }
    if let Some(types) = cfg.legacy_client_app_types {
        ctx.legacy_client_app_types = types;
    }
    if let Some(controls) = cfg.blocking_controls {
        ctx.blocking_controls = controls;
    }
    if let Some(prefix) = cfg.new_ticket_prefix {
        ctx.new_ticket_prefix = prefix;
    }

    if let Some(patterns) = cfg.system_group_patterns {
        engine.system_groups = SystemGroupFilter::new(&patterns)
            .with_context(|| format!("invalid system_group_patterns: {patterns:?}"))?;
    }

    Ok(ResolvedConfig { profile, engine })
}

pub fn resolve_naming(doc: NamingRulesDoc) -> anyhow::Result<NamingRules> {
    let pattern = Regex::new(&doc.pattern)
        .with_context(|| format!("invalid naming pattern: {}", doc.pattern))?;
    let names: BTreeSet<&str> = pattern.capture_names().flatten().collect();
    for group in REQUIRED_NAMING_GROUPS {
        if !names.contains(group) {
            anyhow::bail!("naming pattern must define a named group `{group}`");
        }
    }
    let NumberRangeDoc { min, max } = doc.number_range;
    if min > max {
        anyhow::bail!("numberRange.min ({min}) must not exceed numberRange.max ({max})");
    }
    Ok(NamingRules {
        pattern,
        environments: doc.environments,
        scopes: doc.scopes,
        controls: doc.controls,
        number_range: NumberRange { min, max },
    })
}

pub fn resolve_compliance(
    doc: ComplianceRulesDoc,
    naming_pattern: Option<&Regex>,
) -> anyhow::Result<ComplianceRules> {
    let scope_requirements = doc
        .scope_requirements
        .into_iter()
        .map(|(scope, req)| {
            (
                scope,
                ScopeRequirement {
                    mandatory_controls: req.mandatory_controls,
                    forbidden_states: req.forbidden_states,
                    forbidden_client_app_types: req.forbidden_client_app_types,
                    minimum_controls: req.minimum_controls.map(|n| n as usize),
                },
            )
        })
        .collect();
    Ok(ComplianceRules {
        required_exclusion_groups: doc.required_exclusions.groups,
        scope_requirements,
        allowed_states: doc.allowed_states,
        pattern: naming_pattern.cloned(),
    })
}

/// Bind catalog entries to registered predicates. Unknown or repeated ids fail.
pub fn resolve_best_practices(docs: Vec<BestPracticeDoc>) -> anyhow::Result<Vec<BestPractice>> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::with_capacity(docs.len());
    for doc in docs {
        if !seen.insert(doc.id.clone()) {
            anyhow::bail!("best practice '{}' is defined more than once", doc.id);
        }
        let predicate = PracticeCheck::from_id(&doc.id).context("resolve best-practice catalog")?;
        out.push(BestPractice {
            id: doc.id,
            name: doc.name,
            severity: doc.severity,
            check: doc.check,
            remediation: doc.remediation,
            predicate,
        });
    }
    Ok(out)
}

pub fn resolve_baseline(docs: BaselineDocs) -> anyhow::Result<Baseline> {
    let naming = docs.naming.map(resolve_naming).transpose()?;
    let pattern = naming.as_ref().map(|n| &n.pattern);
    let compliance = docs
        .compliance
        .map(|c| resolve_compliance(c, pattern))
        .transpose()?;
    let best_practices = docs
        .best_practices
        .map(resolve_best_practices)
        .transpose()?
        .unwrap_or_default();
    Ok(Baseline {
        naming,
        compliance,
        best_practices,
    })
}

fn validate_profile(v: &str) -> anyhow::Result<()> {
    match v {
        PROFILE_STANDARD | PROFILE_STRICT => Ok(()),
        other => anyhow::bail!("unknown profile: {other} (expected standard|strict)"),
    }
}

fn parse_conflict_gate(v: &str) -> anyhow::Result<ConflictGate> {
    match v {
        "never" => Ok(ConflictGate::Never),
        "high" => Ok(ConflictGate::High),
        "any" => Ok(ConflictGate::Any),
        other => anyhow::bail!("unknown fail_on_conflicts: {other} (expected never|high|any)"),
    }
}
