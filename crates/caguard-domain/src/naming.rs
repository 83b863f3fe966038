//! Naming convention validation.
//!
//! One error per name: components are checked in a fixed order
//! (environment, scope, control, number) and the first failure wins.

use crate::rules::{APP_SCOPE_PREFIX, NamingRules, NumberRange};
use crate::scope::{captures_at_start, extract_scope};
use caguard_types::NamingCode;
use std::num::IntErrorKind;
use thiserror::Error;

/// Capture value used when the pattern has no `number` group.
const DEFAULT_NUMBER: &str = "0";

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum NamingError {
    #[error("name does not match pattern: {pattern}")]
    PatternMismatch { pattern: String },

    #[error("invalid environment '{value}'; allowed: {}", .allowed.join(", "))]
    InvalidEnvironment { value: String, allowed: Vec<String> },

    #[error("invalid scope '{value}'; allowed: {} or app-*", .allowed.join(", "))]
    InvalidScope { value: String, allowed: Vec<String> },

    #[error("invalid control '{value}'; allowed: {}", .allowed.join(", "))]
    InvalidControl { value: String, allowed: Vec<String> },

    #[error("invalid policy number '{value}'")]
    InvalidNumberFormat { value: String },

    #[error("policy number {value} out of range [{min}-{max}]")]
    NumberOutOfRange { value: i64, min: i64, max: i64 },
}

impl NamingError {
    pub fn code(&self) -> NamingCode {
        match self {
            NamingError::PatternMismatch { .. } => NamingCode::PatternMismatch,
            NamingError::InvalidEnvironment { .. } => NamingCode::InvalidEnvironment,
            NamingError::InvalidScope { .. } => NamingCode::InvalidScope,
            NamingError::InvalidControl { .. } => NamingCode::InvalidControl,
            NamingError::InvalidNumberFormat { .. } => NamingCode::InvalidNumberFormat,
            NamingError::NumberOutOfRange { .. } => NamingCode::NumberOutOfRange,
        }
    }
}

/// Validate a policy name against the naming rules.
pub fn validate(name: &str, rules: &NamingRules) -> Result<(), NamingError> {
    let caps = captures_at_start(&rules.pattern, name).ok_or_else(|| {
        NamingError::PatternMismatch {
            pattern: rules.pattern.as_str().to_string(),
        }
    })?;

    let group = |key: &str| caps.name(key).map(|m| m.as_str()).unwrap_or_default();

    let env = group("env");
    if !contains(&rules.environments, env) {
        return Err(NamingError::InvalidEnvironment {
            value: env.to_string(),
            allowed: rules.environments.clone(),
        });
    }

    let scope = extract_scope(name, Some(&rules.pattern));
    if !is_valid_scope(&scope, &rules.scopes) {
        return Err(NamingError::InvalidScope {
            value: scope,
            allowed: rules.scopes.clone(),
        });
    }

    let control = group("control");
    if !contains(&rules.controls, control) {
        return Err(NamingError::InvalidControl {
            value: control.to_string(),
            allowed: rules.controls.clone(),
        });
    }

    let raw_number = caps
        .name("number")
        .map(|m| m.as_str())
        .unwrap_or(DEFAULT_NUMBER);
    let number = parse_number(raw_number, &rules.number_range)?;
    if !rules.number_range.contains(number) {
        return Err(NamingError::NumberOutOfRange {
            value: number,
            min: rules.number_range.min,
            max: rules.number_range.max,
        });
    }

    Ok(())
}

/// Digit strings too large for `i64` are out of range whatever the bounds.
fn parse_number(raw: &str, range: &NumberRange) -> Result<i64, NamingError> {
    raw.parse::<i64>().map_err(|err| match err.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => NamingError::NumberOutOfRange {
            value: if raw.starts_with('-') { i64::MIN } else { i64::MAX },
            min: range.min,
            max: range.max,
        },
        _ => NamingError::InvalidNumberFormat {
            value: raw.to_string(),
        },
    })
}

fn contains(allowed: &[String], value: &str) -> bool {
    !value.is_empty() && allowed.iter().any(|a| a == value)
}

fn is_valid_scope(scope: &str, allowed: &[String]) -> bool {
    allowed.iter().any(|a| a == scope) || scope.starts_with(APP_SCOPE_PREFIX)
}
