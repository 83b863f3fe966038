//! Repository adapters: discover and parse policy documents, load baseline
//! rule documents and directory name lists.
//!
//! This crate is allowed to do filesystem IO. It never talks to the network;
//! directory data (groups, existing policies) is supplied as files by the caller.

#![forbid(unsafe_code)]

mod baseline;
mod discover;
mod parse;

use anyhow::Context;
use caguard_domain::model::{PolicyDocument, PolicySet};
use caguard_types::{EvaluationError, ids};
use camino::Utf8Path;
use rayon::prelude::*;
use tracing::{debug, warn};

pub use baseline::{
    BEST_PRACTICE_STEMS, BaselineNeeds, COMPLIANCE_STEMS, NAMING_STEMS, baseline_document_exists,
    load_baseline_docs,
};
pub use discover::discover_policy_files;

/// Fuzz-friendly API for testing parsing robustness without filesystem access.
/// These functions are designed to never panic on any input.
pub mod fuzz {
    use super::*;

    /// Parse arbitrary text as a YAML policy document. **Never panics.**
    pub fn parse_policy_yaml(text: &str) -> anyhow::Result<()> {
        let _ = parse::parse_policy(text, caguard_settings::DocFormat::Yaml)?;
        Ok(())
    }

    /// Parse arbitrary text as a JSON policy document. **Never panics.**
    pub fn parse_policy_json(text: &str) -> anyhow::Result<()> {
        let _ = parse::parse_policy(text, caguard_settings::DocFormat::Json)?;
        Ok(())
    }

    /// Filter candidate group names through a system-group denylist built from
    /// arbitrary glob patterns. Returns the groups that are *not* system groups.
    /// **Never panics.**
    pub fn filter_system_groups(
        patterns: &[String],
        candidates: &[String],
    ) -> anyhow::Result<Vec<String>> {
        let filter = caguard_domain::conflicts::SystemGroupFilter::new(patterns)?;
        Ok(candidates
            .iter()
            .filter(|c| !filter.is_system_group(c))
            .cloned()
            .collect())
    }
}

/// Load every policy document under `root` (a directory or a single file).
///
/// Unreadable or malformed documents become evaluation errors keyed by their
/// relative path; the remaining documents are still returned.
pub fn load_policy_set(root: &Utf8Path) -> anyhow::Result<PolicySet> {
    let docs = discover::discover_policy_files(root).context("discover policy documents")?;
    debug!(root = %root, count = docs.len(), "discovered policy documents");

    let parsed: Vec<Result<PolicyDocument, EvaluationError>> = docs
        .par_iter()
        .map(|doc| {
            let abs = discover::document_path(root, doc);
            let source = doc.as_str().to_string();
            std::fs::read_to_string(&abs)
                .with_context(|| format!("read {abs}"))
                .and_then(|text| parse::parse_policy(&text, parse::format_for(doc.as_str())))
                .map(|policy| PolicyDocument {
                    source: source.clone(),
                    policy,
                })
                .map_err(|err| EvaluationError {
                    source,
                    code: ids::CODE_MALFORMED_POLICY.to_string(),
                    message: format!("{err:#}"),
                })
        })
        .collect();

    let mut set = PolicySet::default();
    for item in parsed {
        match item {
            Ok(doc) => set.documents.push(doc),
            Err(err) => {
                warn!(source = %err.source, error = %err.message, "skipping malformed policy");
                set.errors.push(err);
            }
        }
    }
    Ok(set)
}

/// Read a list of names (directory groups, existing display names).
pub fn load_name_list(path: &Utf8Path) -> anyhow::Result<Vec<String>> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read {path}"))?;
    let names = parse::parse_name_list(&text, path.as_str()).with_context(|| format!("parse {path}"))?;
    debug!(path = %path, count = names.len(), "loaded name list");
    Ok(names)
}
