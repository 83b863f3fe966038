use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use caguard_types::DocPath;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::PathBuf;
use walkdir::WalkDir;

/// File patterns treated as policy documents.
const POLICY_GLOBS: &[&str] = &["**/*.yaml", "**/*.yml", "**/*.json"];

/// Discover policy documents under `root`.
///
/// Behavior:
/// - if `root` is a file, it is the only document
/// - otherwise walk `root` recursively, skipping hidden entries, and keep
///   `*.yaml`, `*.yml` and `*.json` files
/// - paths are relative to `root`, sorted and deduplicated
pub fn discover_policy_files(root: &Utf8Path) -> anyhow::Result<Vec<DocPath>> {
    if root.is_file() {
        let name = root.file_name().unwrap_or(root.as_str());
        return Ok(vec![DocPath::new(name)]);
    }
    if !root.is_dir() {
        anyhow::bail!("policy path does not exist: {root}");
    }

    let set = build_globset(POLICY_GLOBS).context("compile policy globset")?;

    let mut out: Vec<DocPath> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| pathbuf_to_utf8(e.path().to_path_buf()))
        .map(|abs| DocPath::relative_to(&abs, root))
        .filter(|rel| set.is_match(rel.as_str()))
        .collect();

    // Stable order.
    out.sort();
    out.dedup();

    Ok(out)
}

/// Resolve a discovered path back to an absolute location.
pub fn document_path(root: &Utf8Path, doc: &DocPath) -> Utf8PathBuf {
    if root.is_file() {
        root.to_path_buf()
    } else {
        root.join(doc.as_str())
    }
}

fn build_globset(patterns: &[&str]) -> anyhow::Result<GlobSet> {
    let mut b = GlobSetBuilder::new();
    for p in patterns {
        b.add(Glob::new(p)?);
    }
    Ok(b.build()?)
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|s| s.starts_with('.'))
}

fn pathbuf_to_utf8(path: PathBuf) -> Option<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn utf8_root(tmp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path")
    }

    fn write_file(path: &Utf8Path, contents: &str) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(path, contents).expect("write file");
    }

    #[test]
    fn discovers_policy_extensions_sorted() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);
        write_file(&root.join("prd/users.yml"), "");
        write_file(&root.join("admins.yaml"), "");
        write_file(&root.join("prd/guests.json"), "");
        write_file(&root.join("README.md"), "");
        write_file(&root.join(".git/config.yaml"), "");

        let docs = discover_policy_files(&root).expect("discover");
        let paths: Vec<&str> = docs.iter().map(|p| p.as_str()).collect();
        assert_eq!(paths, vec!["admins.yaml", "prd/guests.json", "prd/users.yml"]);
    }

    #[test]
    fn single_file_root_is_its_own_document() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);
        let file = root.join("one.yaml");
        write_file(&file, "");

        let docs = discover_policy_files(&file).expect("discover");
        assert_eq!(docs, vec![DocPath::new("one.yaml")]);
        assert_eq!(document_path(&file, &docs[0]), file);
    }

    #[test]
    fn missing_root_is_an_error() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp).join("absent");
        assert!(discover_policy_files(&root).is_err());
    }
}
