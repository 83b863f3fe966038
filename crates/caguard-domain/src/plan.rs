//! Deployment planning: decide, by display-name lookup, whether each policy
//! would be created or updated. No remote calls happen here.

use crate::model::Policy;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PlanAction {
    Create,
    Update,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PlannedChange {
    pub policy: String,
    pub display_name: String,
    pub action: PlanAction,
}

/// One change per policy, in input order. Display-name matching is exact.
pub fn plan<'a, I>(policies: I, existing_display_names: &[String]) -> Vec<PlannedChange>
where
    I: IntoIterator<Item = &'a Policy>,
{
    let existing: BTreeSet<&str> = existing_display_names.iter().map(String::as_str).collect();
    policies
        .into_iter()
        .map(|p| PlannedChange {
            policy: p.name.clone(),
            display_name: p.display_name.clone(),
            action: if existing.contains(p.display_name.as_str()) {
                PlanAction::Update
            } else {
                PlanAction::Create
            },
        })
        .collect()
}
