use camino::Utf8Path;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Canonical path of a policy document relative to the scanned policy root.
///
/// Normalization rules:
/// - always forward slashes (`/`)
/// - no leading `./`
/// - empty input becomes `.`
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct DocPath(String);

impl Default for DocPath {
    fn default() -> Self {
        DocPath::new(".")
    }
}

impl DocPath {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        let mut v = s.as_ref().replace('\\', "/");
        while v.starts_with("./") {
            v = v.trim_start_matches("./").to_string();
        }
        if v.is_empty() {
            v = ".".to_string();
        }
        Self(v)
    }

    /// Path of `abs` relative to `root`, falling back to `abs` itself.
    pub fn relative_to(abs: &Utf8Path, root: &Utf8Path) -> Self {
        DocPath::new(abs.strip_prefix(root).unwrap_or(abs).as_str())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
