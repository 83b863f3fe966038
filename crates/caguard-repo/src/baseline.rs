use anyhow::Context;
use caguard_settings::{
    BaselineDocs, DocFormat, parse_best_practices, parse_compliance_rules, parse_naming_rules,
};
use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

pub const NAMING_STEMS: &[&str] = &["naming-rules"];
pub const COMPLIANCE_STEMS: &[&str] = &["compliance-rules"];
/// `ms-best-practices` is the legacy catalog file name.
pub const BEST_PRACTICE_STEMS: &[&str] = &["best-practices", "ms-best-practices"];

const EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

/// Which rule documents a run needs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BaselineNeeds {
    pub naming: bool,
    pub compliance: bool,
    pub best_practices: bool,
}

/// First existing `<stem>.<ext>` in stem-then-extension order.
fn locate(dir: &Utf8Path, stems: &[&str]) -> Option<(Utf8PathBuf, DocFormat)> {
    stems.iter().find_map(|stem| {
        EXTENSIONS.iter().find_map(|ext| {
            let path = dir.join(format!("{stem}.{ext}"));
            let format = DocFormat::from_extension(ext)?;
            path.is_file().then_some((path, format))
        })
    })
}

/// True when any `<stem>.<ext>` rule document exists in `dir`.
pub fn baseline_document_exists(dir: &Utf8Path, stems: &[&str]) -> bool {
    locate(dir, stems).is_some()
}

fn read_required(dir: &Utf8Path, stems: &[&str]) -> anyhow::Result<(Utf8PathBuf, String, DocFormat)> {
    let (path, format) = locate(dir, stems).with_context(|| {
        format!(
            "baseline document not found in {dir} (expected {}.yaml|yml|json)",
            stems.join(" or ")
        )
    })?;
    let text = std::fs::read_to_string(&path).with_context(|| format!("read {path}"))?;
    debug!(path = %path, "loaded baseline document");
    Ok((path, text, format))
}

/// Load and parse the rule documents named by `needs`. A missing or
/// malformed document is an error for the whole run.
pub fn load_baseline_docs(dir: &Utf8Path, needs: BaselineNeeds) -> anyhow::Result<BaselineDocs> {
    if !dir.is_dir() {
        anyhow::bail!("baseline directory does not exist: {dir}");
    }
    let mut docs = BaselineDocs::default();

    if needs.naming {
        let (path, text, format) = read_required(dir, NAMING_STEMS)?;
        docs.naming =
            Some(parse_naming_rules(&text, format).with_context(|| format!("in {path}"))?);
    }
    if needs.compliance {
        let (path, text, format) = read_required(dir, COMPLIANCE_STEMS)?;
        docs.compliance =
            Some(parse_compliance_rules(&text, format).with_context(|| format!("in {path}"))?);
    }
    if needs.best_practices {
        let (path, text, format) = read_required(dir, BEST_PRACTICE_STEMS)?;
        docs.best_practices =
            Some(parse_best_practices(&text, format).with_context(|| format!("in {path}"))?);
    }

    Ok(docs)
}
