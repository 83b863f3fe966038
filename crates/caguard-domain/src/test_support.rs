use crate::model::{
    ApplicationConditions, Conditions, GrantControls, Policy, PolicyMetadata, PolicyState,
    SessionControls, SignInFrequency,
};
use crate::practices::PracticeCheck;
use crate::rules::{
    BestPractice, ComplianceRules, NamingRules, NumberRange, ScopeRequirement,
};
use caguard_types::Severity;
use regex::Regex;
use std::collections::BTreeMap;

pub const BREAK_GLASS: &str = "AAD-BreakGlass-Accounts";

pub const NAMING_PATTERN: &str = r"^(?P<lang>[a-z]{2})-(?P<env>[a-z]+)-ca-(?P<scope>app-[a-z0-9]+|[a-z]+)-(?P<control>[a-z]+)-(?P<number>\d+)$";

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn naming_rules() -> NamingRules {
    NamingRules {
        pattern: Regex::new(NAMING_PATTERN).expect("valid regex"),
        environments: strings(&["prd", "tst", "acc"]),
        scopes: strings(&["admins", "users", "guests", "externals", "devices"]),
        controls: strings(&["mfa", "block", "device", "session", "risk"]),
        number_range: NumberRange { min: 1, max: 999 },
    }
}

pub fn compliance_rules() -> ComplianceRules {
    let mut scope_requirements = BTreeMap::new();
    scope_requirements.insert(
        "admins".to_string(),
        ScopeRequirement {
            mandatory_controls: strings(&["mfa"]),
            forbidden_states: vec![PolicyState::Disabled],
            forbidden_client_app_types: strings(&["other", "exchangeActiveSync"]),
            minimum_controls: Some(1),
        },
    );
    scope_requirements.insert(
        "users".to_string(),
        ScopeRequirement {
            mandatory_controls: strings(&["mfa"]),
            ..ScopeRequirement::default()
        },
    );
    scope_requirements.insert(
        "app".to_string(),
        ScopeRequirement {
            mandatory_controls: strings(&["mfa"]),
            ..ScopeRequirement::default()
        },
    );
    ComplianceRules {
        required_exclusion_groups: strings(&[BREAK_GLASS]),
        scope_requirements,
        allowed_states: vec![
            PolicyState::Enabled,
            PolicyState::Disabled,
            PolicyState::ReportOnly,
        ],
        pattern: None,
    }
}

pub fn practice(check: PracticeCheck, severity: Severity) -> BestPractice {
    BestPractice {
        id: check.id().to_string(),
        name: format!("{check:?}"),
        severity,
        check: String::new(),
        remediation: format!("fix {}", check.id()),
        predicate: check,
    }
}

/// Every registered practice at high severity.
pub fn full_catalog() -> Vec<BestPractice> {
    PracticeCheck::ALL
        .into_iter()
        .map(|c| practice(c, Severity::High))
        .collect()
}

pub fn policy(name: &str) -> PolicyBuilder {
    PolicyBuilder {
        policy: Policy {
            name: name.to_string(),
            display_name: name.to_uppercase(),
            state: PolicyState::Enabled,
            metadata: PolicyMetadata {
                owner: "secops".to_string(),
                created_by: "tester".to_string(),
                ticket_id: "CHG-1".to_string(),
                justification: "test".to_string(),
                expiration_date: None,
            },
            conditions: Conditions {
                applications: ApplicationConditions {
                    include: strings(&["All"]),
                    exclude: Vec::new(),
                },
                ..Conditions::default()
            },
            grant_controls: GrantControls::default(),
            session_controls: SessionControls::default(),
        },
    }
}

pub struct PolicyBuilder {
    policy: Policy,
}

impl PolicyBuilder {
    pub fn state(mut self, state: PolicyState) -> Self {
        self.policy.state = state;
        self
    }

    pub fn ticket(mut self, ticket: &str) -> Self {
        self.policy.metadata.ticket_id = ticket.to_string();
        self
    }

    pub fn include_groups(mut self, groups: &[&str]) -> Self {
        self.policy.conditions.users.include_groups = strings(groups);
        self
    }

    pub fn exclude_groups(mut self, groups: &[&str]) -> Self {
        self.policy.conditions.users.exclude_groups = strings(groups);
        self
    }

    pub fn include_users(mut self, users: &[&str]) -> Self {
        self.policy.conditions.users.include_users = strings(users);
        self
    }

    pub fn include_apps(mut self, apps: &[&str]) -> Self {
        self.policy.conditions.applications.include = strings(apps);
        self
    }

    pub fn client_app_types(mut self, types: &[&str]) -> Self {
        self.policy.conditions.client_app_types = strings(types);
        self
    }

    pub fn user_risk(mut self, levels: &[&str]) -> Self {
        self.policy.conditions.user_risk_levels = strings(levels);
        self
    }

    pub fn controls(mut self, controls: &[&str]) -> Self {
        self.policy.grant_controls.built_in_controls = strings(controls);
        self
    }

    pub fn sign_in_frequency(mut self, value: u32) -> Self {
        self.policy.session_controls.sign_in_frequency = SignInFrequency {
            value: Some(value),
            unit: Some("hours".to_string()),
        };
        self
    }

    pub fn build(self) -> Policy {
        self.policy
    }
}
