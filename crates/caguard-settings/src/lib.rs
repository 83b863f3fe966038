//! Rule-document and config parsing, profile presets, and resolution into
//! engine types.
//!
//! This crate is intentionally IO-free: it parses and resolves documents
//! provided as strings.

#![forbid(unsafe_code)]

mod model;
mod presets;
mod resolve;

pub use model::{
    BestPracticeCatalogDoc, BestPracticeDoc, CATALOG_WRAPPER_KEY, CaguardConfigV1, ComplianceRulesDoc,
    NamingRulesDoc, NumberRangeDoc, RequiredExclusionsDoc, SCHEMA_CONFIG_V1, ScopeRequirementDoc,
};
pub use presets::{PROFILE_STANDARD, PROFILE_STRICT};
pub use resolve::{BaselineDocs, Overrides, ResolvedConfig};

use anyhow::Context;
use caguard_domain::rules::{Baseline, BestPractice, ComplianceRules, NamingRules};
use regex::Regex;
use serde::de::DeserializeOwned;

/// Serialization format of a rule document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocFormat {
    Yaml,
    Json,
}

impl DocFormat {
    /// `yaml`/`yml` and `json`, case-insensitive.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Some(DocFormat::Yaml),
            "json" => Some(DocFormat::Json),
            _ => None,
        }
    }
}

fn parse_doc<T: DeserializeOwned>(input: &str, format: DocFormat) -> anyhow::Result<T> {
    match format {
        DocFormat::Yaml => Ok(serde_yaml::from_str(input)?),
        DocFormat::Json => Ok(serde_json::from_str(input)?),
    }
}

/// Parse `caguard.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<CaguardConfigV1> {
    let cfg: CaguardConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

pub fn parse_naming_rules(input: &str, format: DocFormat) -> anyhow::Result<NamingRulesDoc> {
    parse_doc(input, format).context("parse naming rules")
}

pub fn parse_compliance_rules(
    input: &str,
    format: DocFormat,
) -> anyhow::Result<ComplianceRulesDoc> {
    parse_doc(input, format).context("parse compliance rules")
}

/// Accepts a bare list or the `{ bestPractices: [...] }` wrapper.
pub fn parse_best_practices(
    input: &str,
    format: DocFormat,
) -> anyhow::Result<Vec<BestPracticeDoc>> {
    let mut value: serde_json::Value =
        parse_doc(input, format).context("parse best-practice catalog")?;
    if let Some(entries) = value
        .as_object_mut()
        .and_then(|obj| obj.remove(CATALOG_WRAPPER_KEY))
    {
        value = entries;
    }
    serde_json::from_value(value).context("parse best-practice catalog")
}

pub fn resolve_naming(doc: NamingRulesDoc) -> anyhow::Result<NamingRules> {
    resolve::resolve_naming(doc)
}

pub fn resolve_compliance(
    doc: ComplianceRulesDoc,
    naming_pattern: Option<&Regex>,
) -> anyhow::Result<ComplianceRules> {
    resolve::resolve_compliance(doc, naming_pattern)
}

pub fn resolve_best_practices(docs: Vec<BestPracticeDoc>) -> anyhow::Result<Vec<BestPractice>> {
    resolve::resolve_best_practices(docs)
}

/// Resolve whichever rule documents were loaded into a [`Baseline`].
pub fn resolve_baseline(docs: BaselineDocs) -> anyhow::Result<Baseline> {
    resolve::resolve_baseline(docs)
}

/// Resolve the engine config (profile preset, then config file, then overrides).
pub fn resolve_config(
    cfg: CaguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}

#[cfg(test)]
mod tests;
