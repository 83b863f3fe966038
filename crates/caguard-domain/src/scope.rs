//! Scope extraction shared by the naming, compliance and best-practice checks.
//!
//! Primary strategy: the naming pattern's `scope` group. Fallback: a positional
//! split on `-`, so compliance can still be evaluated for names that do not
//! match the current pattern.

use crate::rules::APP_SCOPE_PREFIX;
use regex::{Captures, Regex};

/// Returned when neither strategy yields a scope.
pub const UNKNOWN_SCOPE: &str = "unknown";

const SEPARATOR: char = '-';
const SCOPE_INDEX: usize = 3;
const APP_NAME_INDEX: usize = 4;
const MIN_PARTS_FOR_SCOPE: usize = 5;
const MIN_PARTS_FOR_APP_SCOPE: usize = 6;

/// Derive the scope tag for a policy name.
pub fn extract_scope(name: &str, pattern: Option<&Regex>) -> String {
    if let Some(scope) = pattern.and_then(|re| scope_from_pattern(name, re)) {
        return scope;
    }
    positional_scope(name)
}

/// Positional heuristic: segment 3, or `app-<segment 4>` when segment 3 is `app`.
pub fn positional_scope(name: &str) -> String {
    let parts: Vec<&str> = name.split(SEPARATOR).collect();
    if parts.len() < MIN_PARTS_FOR_SCOPE {
        return UNKNOWN_SCOPE.to_string();
    }
    if parts[SCOPE_INDEX] == "app" && parts.len() >= MIN_PARTS_FOR_APP_SCOPE {
        return format!("{APP_SCOPE_PREFIX}{}", parts[APP_NAME_INDEX]);
    }
    parts[SCOPE_INDEX].to_string()
}

fn scope_from_pattern(name: &str, re: &Regex) -> Option<String> {
    let caps = captures_at_start(re, name)?;
    caps.name("scope").map(|m| m.as_str().to_string())
}

/// Match anchored at the start of `haystack` (the end is left to the pattern).
pub(crate) fn captures_at_start<'h>(re: &Regex, haystack: &'h str) -> Option<Captures<'h>> {
    re.captures(haystack)
        .filter(|caps| caps.get(0).is_some_and(|m| m.start() == 0))
}
