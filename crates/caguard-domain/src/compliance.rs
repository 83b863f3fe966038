//! Compliance evaluation: required exclusions, scope requirements and the
//! global allowed-state gate. All checks run; nothing short-circuits.

use crate::model::{Policy, PolicyState};
use crate::rules::{ComplianceRules, ScopeRequirement};
use crate::scope::extract_scope;
use caguard_types::{Violation, ViolationKind};

pub fn validate(policy: &Policy, rules: &ComplianceRules) -> Vec<Violation> {
    let mut out = Vec::new();
    check_required_exclusions(policy, rules, &mut out);

    let scope = extract_scope(&policy.name, rules.pattern.as_ref());
    if let Some(req) = rules.requirement_for(&scope) {
        check_scope_requirement(policy, &scope, req, &mut out);
    }

    check_allowed_state(policy, rules, &mut out);
    out
}

fn check_required_exclusions(policy: &Policy, rules: &ComplianceRules, out: &mut Vec<Violation>) {
    let excluded = &policy.conditions.users.exclude_groups;
    for group in &rules.required_exclusion_groups {
        if !excluded.contains(group) {
            out.push(Violation::new(
                ViolationKind::MissingRequiredExclusion,
                format!("missing required exclusion group '{group}'"),
            ));
        }
    }
}

fn check_scope_requirement(
    policy: &Policy,
    scope: &str,
    req: &ScopeRequirement,
    out: &mut Vec<Violation>,
) {
    let controls = &policy.grant_controls.built_in_controls;

    for control in &req.mandatory_controls {
        if !controls.contains(control) {
            out.push(Violation::new(
                ViolationKind::MissingMandatoryControl,
                format!("scope '{scope}' requires control '{control}'"),
            ));
        }
    }

    if req.forbidden_states.contains(&policy.state) {
        out.push(Violation::new(
            ViolationKind::ForbiddenState,
            format!("state '{}' is forbidden for scope '{scope}'", policy.state),
        ));
    }

    let client_apps = &policy.conditions.client_app_types;
    for forbidden in &req.forbidden_client_app_types {
        if client_apps.contains(forbidden) {
            out.push(Violation::new(
                ViolationKind::ForbiddenClientAppType,
                format!("client app type '{forbidden}' is forbidden for scope '{scope}'"),
            ));
        }
    }

    if let Some(min) = req.minimum_controls
        && controls.len() < min
    {
        out.push(Violation::new(
            ViolationKind::BelowMinimumControls,
            format!(
                "scope '{scope}' requires at least {min} control(s), found {}",
                controls.len()
            ),
        ));
    }
}

fn check_allowed_state(policy: &Policy, rules: &ComplianceRules, out: &mut Vec<Violation>) {
    if !rules.allowed_states.contains(&policy.state) {
        out.push(Violation::new(
            ViolationKind::DisallowedState,
            format!(
                "policy state '{}' not in allowed states: {}",
                policy.state,
                join_states(&rules.allowed_states)
            ),
        ));
    }
}

fn join_states(states: &[PolicyState]) -> String {
    states
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
