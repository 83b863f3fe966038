//! Developer tasks (schema generation, fixture conformance, explain coverage).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use caguard_test_util::normalize_nondeterministic;
use schemars::schema_for;
use std::fs;
use std::path::PathBuf;

/// Get the project root (parent of xtask directory).
fn project_root() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .or_else(|_| std::env::current_dir())
        .unwrap_or_else(|_| PathBuf::from("."));

    // If we're in the xtask directory, go up one level
    if manifest_dir.ends_with("xtask")
        && let Some(parent) = manifest_dir.parent()
    {
        parent.to_path_buf()
    } else {
        manifest_dir
    }
}

fn schemas_dir() -> PathBuf {
    project_root().join("schemas")
}

fn fixtures_dir() -> PathBuf {
    project_root().join("tests").join("fixtures")
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

/// List of schemas to generate.
fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "caguard.report.v1.json",
            generate: || schema_for!(caguard_types::ReportEnvelope),
        },
        SchemaSpec {
            filename: "caguard.config.v1.json",
            generate: || schema_for!(caguard_settings::CaguardConfigV1),
        },
        SchemaSpec {
            filename: "caguard.naming-rules.v1.json",
            generate: || schema_for!(caguard_settings::NamingRulesDoc),
        },
        SchemaSpec {
            filename: "caguard.compliance-rules.v1.json",
            generate: || schema_for!(caguard_settings::ComplianceRulesDoc),
        },
        SchemaSpec {
            filename: "caguard.best-practices.v1.json",
            generate: || schema_for!(caguard_settings::BestPracticeCatalogDoc),
        },
        SchemaSpec {
            filename: "caguard.policy.v1.json",
            generate: || schema_for!(caguard_domain::model::Policy),
        },
    ]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

/// Emit schemas to the schemas/ directory.
fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    fs::create_dir_all(&dir).context("Failed to create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json)
            .with_context(|| format!("Failed to write schema to {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    println!("\nSchemas emitted successfully.");
    Ok(())
}

/// Validate that schemas in the repo match what would be generated.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    let mut missing = Vec::new();
    let mut mismatched = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        if !path.exists() {
            missing.push(spec.filename);
            continue;
        }

        let expected = serialize_schema(&(spec.generate)())?;
        let actual = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if expected != actual {
            mismatched.push(spec.filename);
        }
    }

    if missing.is_empty() && mismatched.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }
    if !missing.is_empty() {
        eprintln!("Missing schemas:");
        for name in &missing {
            eprintln!("  - {name}");
        }
    }
    if !mismatched.is_empty() {
        eprintln!("Schemas out of date:");
        for name in &mismatched {
            eprintln!("  - {name}");
        }
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("Schema validation failed")
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  conform           Run the built caguard binary on tests/fixtures and validate output");
    eprintln!("  explain-coverage  Validate all codes and best-practice ids have explanations");
}

/// Run the caguard binary on every fixture, validate each report against the
/// generated report schema and compare against `expected.report.json` when present.
fn conform() -> anyhow::Result<()> {
    let schema = serde_json::to_value(schema_for!(caguard_types::ReportEnvelope))
        .context("Failed to serialize report schema")?;
    let compiled = jsonschema::validator_for(&schema)
        .map_err(|e| anyhow::anyhow!("Failed to compile schema: {e}"))?;

    let caguard_bin = project_root().join("target").join("debug").join("caguard");
    #[cfg(target_os = "windows")]
    let caguard_bin = caguard_bin.with_extension("exe");

    if !caguard_bin.exists() {
        bail!(
            "caguard binary not found at {}.\n\
            Run `cargo build -p caguard-cli` first.",
            caguard_bin.display()
        );
    }

    let mut errors = Vec::new();
    let mut fixture_count = 0;

    let mut entries: Vec<PathBuf> = fs::read_dir(fixtures_dir())
        .context("Failed to read tests/fixtures/")?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.join("policies").is_dir() && p.join("baseline").is_dir())
        .collect();
    entries.sort();

    for fixture_dir in entries {
        let fixture_name = fixture_dir
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        fixture_count += 1;

        let temp_dir = tempfile::tempdir().context("Failed to create temp dir")?;
        let report_out = temp_dir.path().join("report.json");

        let output = std::process::Command::new(&caguard_bin)
            .arg("--policies")
            .arg(fixture_dir.join("policies"))
            .arg("--baseline")
            .arg(fixture_dir.join("baseline"))
            .arg("--config")
            .arg(fixture_dir.join("caguard.toml"))
            .arg("check")
            .arg("--report-out")
            .arg(&report_out)
            .output()
            .with_context(|| format!("Failed to run caguard on fixture '{fixture_name}'"))?;

        if !matches!(output.status.code(), Some(0) | Some(2)) {
            errors.push(format!(
                "fixture '{fixture_name}': unexpected exit {:?}: {}",
                output.status.code(),
                String::from_utf8_lossy(&output.stderr)
            ));
            continue;
        }

        let report_content = fs::read_to_string(&report_out)
            .with_context(|| format!("fixture '{fixture_name}': no report output generated"))?;
        let report_value: serde_json::Value = serde_json::from_str(&report_content)
            .with_context(|| format!("Failed to parse report for fixture '{fixture_name}'"))?;

        for err in compiled.iter_errors(&report_value) {
            errors.push(format!("fixture '{fixture_name}': schema validation: {err}"));
        }

        let golden_path = fixture_dir.join("expected.report.json");
        if golden_path.exists() {
            let golden_value: serde_json::Value =
                serde_json::from_str(&fs::read_to_string(&golden_path)?)?;
            if normalize_nondeterministic(report_value) != normalize_nondeterministic(golden_value)
            {
                errors.push(format!(
                    "fixture '{fixture_name}': output differs from expected.report.json"
                ));
            } else {
                println!("  ✓ fixture '{fixture_name}' matches golden report");
            }
        } else {
            println!("  ✓ fixture '{fixture_name}' produces a valid report (no golden file)");
        }
    }

    if !errors.is_empty() {
        eprintln!("\nConformance errors:");
        for err in &errors {
            eprintln!("  - {err}");
        }
        bail!("Conformance validation failed with {} errors", errors.len());
    }

    println!("\n✓ {fixture_count} fixtures conform");
    Ok(())
}

/// Validate that all codes and best-practice ids have explanations.
fn explain_coverage() -> anyhow::Result<()> {
    let codes = caguard_types::explain::all_codes();
    let practice_ids = caguard_types::explain::all_practice_ids();

    let mut errors = Vec::new();

    for id in codes.iter().chain(practice_ids) {
        match caguard_types::explain::lookup_explanation(id) {
            Some(exp) => {
                if exp.title.is_empty() {
                    errors.push(format!("'{id}' has empty title"));
                }
                if exp.description.is_empty() {
                    errors.push(format!("'{id}' has empty description"));
                }
                if exp.remediation.is_empty() {
                    errors.push(format!("'{id}' has empty remediation"));
                }
            }
            None => errors.push(format!("'{id}' has no explanation")),
        }
    }

    // Every registered predicate must be documented.
    for check in caguard_domain::practices::PracticeCheck::ALL {
        if !practice_ids.contains(&check.id()) {
            errors.push(format!("predicate '{}' missing from explain registry", check.id()));
        }
    }

    if errors.is_empty() {
        println!("✓ {} codes have explanations", codes.len());
        println!("✓ {} best-practice ids have explanations", practice_ids.len());
        println!("\n✓ All explain coverage checks passed!");
        Ok(())
    } else {
        for error in &errors {
            eprintln!("  - {error}");
        }
        bail!(
            "Explain coverage validation failed with {} errors",
            errors.len()
        )
    }
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "conform" => conform(),
        "explain-coverage" => explain_coverage(),
        "print-schema-ids" => {
            for spec in schema_specs() {
                println!("{}", spec.filename.trim_end_matches(".json"));
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
