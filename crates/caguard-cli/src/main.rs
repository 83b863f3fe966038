//! CLI entry point for caguard.
//!
//! This module is intentionally thin: it handles argument parsing, logging setup, I/O, and exit
//! codes. All business logic lives in the `caguard-app` crate.

use anyhow::Context;
use caguard_app::{
    CheckInput, ExplainOutput, PlanInput, format_plan, parse_report_json, render_annotations,
    render_markdown, run_check, run_explain, run_plan, runtime_error_report, serialize_report,
    to_renderable, verdict_exit_code,
};
use caguard_settings::Overrides;
use caguard_types::{CheckCategory, ReportEnvelope};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "caguard",
    version,
    about = "Pre-deployment validation for conditional access policy-as-code"
)]
struct Cli {
    /// Policy directory (or a single policy file).
    #[arg(long, default_value = "policies")]
    policies: Utf8PathBuf,

    /// Directory holding naming-rules, compliance-rules and best-practices documents.
    #[arg(long, default_value = "baseline")]
    baseline: Utf8PathBuf,

    /// Path to caguard config TOML.
    #[arg(long, default_value = "caguard.toml")]
    config: Utf8PathBuf,

    /// Override profile (standard|strict).
    #[arg(long)]
    profile: Option<String>,

    /// Override conflict promotion (never|high|any).
    #[arg(long)]
    fail_on_conflicts: Option<String>,

    /// Override the policy count at which the conflict scan runs in parallel.
    #[arg(long)]
    parallel_threshold: Option<u32>,

    /// Log at debug level (RUST_LOG takes precedence).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate policies and write artifacts.
    Check {
        /// naming|compliance|best-practices|conflicts|all
        #[arg(long, default_value = "all")]
        category: CheckCategory,

        /// Directory group list for the coverage-gap pass (.json, .yaml or .txt).
        #[arg(long)]
        groups: Option<Utf8PathBuf>,

        /// Where to write the JSON report.
        #[arg(long, default_value = "artifacts/caguard/report.json")]
        report_out: Utf8PathBuf,

        /// Write a Markdown report alongside the JSON.
        #[arg(long)]
        write_markdown: bool,

        /// Where to write the Markdown report (if enabled).
        #[arg(long, default_value = "artifacts/caguard/comment.md")]
        markdown_out: Utf8PathBuf,
    },

    /// Validate everything, then print what a deployment would create or update.
    Plan {
        /// Display names already present in the tenant (.json, .yaml or .txt).
        #[arg(long)]
        existing: Option<Utf8PathBuf>,

        /// Directory group list for the coverage-gap pass.
        #[arg(long)]
        groups: Option<Utf8PathBuf>,

        /// Where to write the JSON report.
        #[arg(long, default_value = "artifacts/caguard/report.json")]
        report_out: Utf8PathBuf,
    },

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/caguard/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Render GitHub Actions annotations from an existing JSON report.
    Annotations {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/caguard/report.json")]
        report: Utf8PathBuf,

        /// Maximum number of annotations to emit (default 10, per GHA best practices).
        #[arg(long, default_value = "10")]
        max: usize,
    },

    /// Explain a finding code or best-practice id with remediation guidance.
    Explain {
        /// The code (e.g., "missing_required_exclusion") or id (e.g., "BP001") to explain.
        identifier: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.cmd {
        Commands::Check {
            category,
            ref groups,
            ref report_out,
            write_markdown,
            ref markdown_out,
        } => cmd_check(
            &cli,
            category,
            groups.as_deref(),
            report_out,
            write_markdown.then_some(markdown_out.as_path()),
        ),
        Commands::Plan {
            ref existing,
            ref groups,
            ref report_out,
        } => cmd_plan(&cli, existing.as_deref(), groups.as_deref(), report_out),
        Commands::Md {
            ref report,
            ref output,
        } => cmd_md(report, output.as_deref()),
        Commands::Annotations { ref report, max } => cmd_annotations(report, max),
        Commands::Explain { ref identifier } => cmd_explain(identifier),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn overrides(cli: &Cli) -> Overrides {
    Overrides {
        profile: cli.profile.clone(),
        fail_on_conflicts: cli.fail_on_conflicts.clone(),
        parallel_threshold: cli.parallel_threshold,
    }
}

/// Missing config file is allowed (defaults apply).
fn read_config(path: &Utf8Path) -> anyhow::Result<String> {
    if !path.exists() {
        debug!(path = %path, "no config file; using defaults");
        return Ok(String::new());
    }
    std::fs::read_to_string(path).with_context(|| format!("read config: {path}"))
}

fn cmd_check(
    cli: &Cli,
    category: CheckCategory,
    groups: Option<&Utf8Path>,
    report_out: &Utf8Path,
    markdown_out: Option<&Utf8Path>,
) -> anyhow::Result<()> {
    let result = (|| -> anyhow::Result<i32> {
        let cfg_text = read_config(&cli.config)?;
        let input = CheckInput {
            policies: &cli.policies,
            baseline_dir: &cli.baseline,
            config_text: &cfg_text,
            overrides: overrides(cli),
            category,
            groups_file: groups,
        };

        let output = run_check(input)?;

        write_report_file(report_out, &output.report).context("write report json")?;

        if let Some(markdown_out) = markdown_out {
            let md = render_markdown(&to_renderable(&output.report));
            write_text_file(markdown_out, &md).context("write markdown")?;
        }

        Ok(verdict_exit_code(output.report.verdict))
    })();

    finish(result, category, report_out)
}

fn cmd_plan(
    cli: &Cli,
    existing: Option<&Utf8Path>,
    groups: Option<&Utf8Path>,
    report_out: &Utf8Path,
) -> anyhow::Result<()> {
    let result = (|| -> anyhow::Result<i32> {
        let cfg_text = read_config(&cli.config)?;
        let input = PlanInput {
            check: CheckInput {
                policies: &cli.policies,
                baseline_dir: &cli.baseline,
                config_text: &cfg_text,
                overrides: overrides(cli),
                category: CheckCategory::All,
                groups_file: groups,
            },
            existing,
        };

        let output = run_plan(input)?;
        write_report_file(report_out, &output.report).context("write report json")?;
        print!("{}", format_plan(&output));

        Ok(if output.changes.is_some() { 0 } else { 2 })
    })();

    finish(result, CheckCategory::All, report_out)
}

fn finish(
    result: anyhow::Result<i32>,
    category: CheckCategory,
    report_out: &Utf8Path,
) -> anyhow::Result<()> {
    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            let report = runtime_error_report(category, &format!("{err:#}"));
            let _ = write_report_file(report_out, &report);
            eprintln!("caguard error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn write_report_file(path: &Utf8Path, report: &ReportEnvelope) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    let data = serialize_report(report).context("serialize report")?;
    std::fs::write(path, data).with_context(|| format!("write report: {path}"))?;
    Ok(())
}

fn write_text_file(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    std::fs::write(path, text).with_context(|| format!("write text: {path}"))?;
    Ok(())
}

fn read_report(path: &Utf8Path) -> anyhow::Result<ReportEnvelope> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read report: {path}"))?;
    parse_report_json(&text)
}

fn cmd_md(report_path: &Utf8Path, output: Option<&Utf8Path>) -> anyhow::Result<()> {
    let report = read_report(report_path)?;
    let md = render_markdown(&to_renderable(&report));

    if let Some(out_path) = output {
        write_text_file(out_path, &md).context("write markdown output")?;
    } else {
        print!("{md}");
    }

    Ok(())
}

fn cmd_annotations(report_path: &Utf8Path, max: usize) -> anyhow::Result<()> {
    let report = read_report(report_path)?;
    for annotation in render_annotations(&to_renderable(&report), max) {
        println!("{annotation}");
    }
    Ok(())
}

fn cmd_explain(identifier: &str) -> anyhow::Result<()> {
    match run_explain(identifier) {
        ExplainOutput::Found(exp) => {
            print!("{}", caguard_app::format_explanation(&exp));
            Ok(())
        }
        ExplainOutput::NotFound {
            identifier,
            available_codes,
            available_practice_ids,
        } => {
            eprint!(
                "{}",
                caguard_app::format_not_found(&identifier, available_codes, available_practice_ids)
            );
            std::process::exit(1);
        }
    }
}
