//! # Coverage Gate
//!
//! Enforces a "zero uncovered regions" policy on a Rust workspace by running
//! the test suite under `cargo llvm-cov` and listing whatever is left untested
//! as compact line ranges:
//!
//! ```text
//! Uncovered regions (file:path line ranges):
//! src/config.rs:41-42,87
//! ```
//!
//! ## Usage Examples
//!
//! ```bash
//! # Run tests with coverage and report gaps
//! coverage_gate check
//!
//! # Pass extra flags through to cargo llvm-cov
//! coverage_gate check -- --workspace --all-features
//!
//! # Report from an export produced elsewhere
//! cargo llvm-cov --json --output-path cov.json
//! coverage_gate report cov.json --exclude 'tests/**'
//!
//! # Remove stale profile data
//! coverage_gate clean
//! ```
//!
//! ## Exit Codes
//!
//! - `0`: no uncovered regions
//! - `1`: uncovered regions reported, or `doctor` found a missing tool
//! - `2`: the export could not be produced or decoded
//!
//! ## Environment Variables
//!
//! - `COVERAGE_GATE_ROOT`: project root used to relativize paths
//! - `COVERAGE_GATE_FORMAT`: `text` or `json`
//! - `RUST_LOG`: log filter for diagnostics written to stderr

use anyhow::{Context, Result};
use clap::Parser;
use coverage_gaps::{CoverageReport, GapReport};
use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::Path;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

mod config;
mod toolchains;

use config::{Args, Commands, GateConfig};

/// What a finished command means for the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Passed,
    Failed,
}

impl From<Outcome> for ExitCode {
    fn from(value: Outcome) -> Self {
        match value {
            Outcome::Passed => ExitCode::SUCCESS,
            Outcome::Failed => ExitCode::from(1),
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    let config = GateConfig::from(&args);
    init_tracing(config.verbose);

    match run(&config, args.command) {
        Ok(outcome) => outcome.into(),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

/// Diagnostics go to stderr so stdout carries only the report.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn run(config: &GateConfig, command: Commands) -> Result<Outcome> {
    match command {
        Commands::Check { cargo_args } => check(config, &cargo_args),
        Commands::Report { input } => {
            let report = if input.as_os_str() == "-" {
                decode(io::stdin().lock(), "stdin")?
            } else {
                let file = File::open(&input)
                    .with_context(|| format!("Failed to open {}", input.display()))?;
                decode(BufReader::new(file), &input.display().to_string())?
            };
            report_gaps(config, &config.resolve_root()?, &report)
        }
        Commands::Clean => {
            let root = config.resolve_root()?;
            let removed = clean_profiles(&root.join("target"))?;
            println!("Removed {removed} stale profile file(s).");
            Ok(Outcome::Passed)
        }
        Commands::Doctor => Ok(doctor()),
    }
}

/// Run tests under `cargo llvm-cov`, then report from the temporary export.
fn check(config: &GateConfig, cargo_args: &[String]) -> Result<Outcome> {
    toolchains::ensure_tools()?;
    let root = config.resolve_root()?;

    // Removed on drop, including when any step below fails.
    let export = tempfile::Builder::new()
        .prefix("coverage-gate-")
        .suffix(".json")
        .tempfile()
        .context("Failed to create temporary coverage file")?;

    let start = std::time::Instant::now();
    toolchains::export_json(&root, export.path(), cargo_args)?;
    info!(
        elapsed_secs = start.elapsed().as_secs_f32(),
        "Coverage run completed"
    );

    let file = export
        .reopen()
        .context("Failed to reopen temporary coverage file")?;
    let report = decode(BufReader::new(file), "cargo llvm-cov output")?;
    report_gaps(config, &root, &report)
}

fn decode<R: Read>(reader: R, source: &str) -> Result<CoverageReport> {
    let report = CoverageReport::from_reader(reader)
        .with_context(|| format!("Failed to decode coverage export from {source}"))?;
    info!(source, files = report.file_count(), "Decoded coverage export");
    Ok(report)
}

fn report_gaps(config: &GateConfig, root: &Path, report: &CoverageReport) -> Result<Outcome> {
    let filter = config.filter()?;
    let gaps = GapReport::collect(report, root, &filter)
        .with_context(|| format!("Failed to collect gaps relative to {}", root.display()))?;

    println!("{}", gaps.render(config.format));

    Ok(if gaps.is_clean() {
        Outcome::Passed
    } else {
        Outcome::Failed
    })
}

/// Delete `.profraw` and `.profdata` files below `target_dir`.
fn clean_profiles(target_dir: &Path) -> Result<usize> {
    if !target_dir.exists() {
        info!(dir = %target_dir.display(), "Nothing to clean");
        return Ok(0);
    }

    let mut removed = 0;
    for entry in WalkDir::new(target_dir)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        let is_profile = path
            .extension()
            .is_some_and(|ext| ext == "profraw" || ext == "profdata");
        if !entry.file_type().is_file() || !is_profile {
            continue;
        }
        match fs::remove_file(path) {
            Ok(()) => removed += 1,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => warn!(path = %path.display(), error = %err, "Failed to remove profile file"),
        }
    }

    info!(removed, "Coverage data cleaned");
    Ok(removed)
}

fn doctor() -> Outcome {
    let statuses = toolchains::detect_tools();

    println!("Coverage Gate Doctor");
    println!("====================\n");
    for status in &statuses {
        match &status.path {
            Some(path) => println!("  \u{2713} {}: {}", status.tool.name, path.display()),
            None => {
                println!("  \u{2717} {}: not found", status.tool.name);
                println!("    \u{2192} {}", status.tool.fix);
            }
        }
    }
    println!();

    let issues_count = statuses.iter().filter(|s| !s.ok()).count();
    if issues_count == 0 {
        println!("Status: All checks passed");
        Outcome::Passed
    } else {
        println!(
            "Status: {} issue{} found",
            issues_count,
            if issues_count == 1 { "" } else { "s" }
        );
        Outcome::Failed
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use tempfile::TempDir;

    #[test]
    fn clean_profiles__mixed_files__then_removes_only_profile_data() {
        let temp = TempDir::new().expect("temp dir");
        let target = temp.path().join("target");
        let nested = target.join("llvm-cov-target");
        fs::create_dir_all(&nested).expect("dirs");
        fs::write(target.join("a.profraw"), b"raw").expect("profraw");
        fs::write(nested.join("b.profdata"), b"data").expect("profdata");
        fs::write(nested.join("keep.rs"), b"fn main() {}").expect("source");

        let removed = clean_profiles(&target).expect("clean");

        assert_eq!(removed, 2);
        assert!(!target.join("a.profraw").exists());
        assert!(!nested.join("b.profdata").exists());
        assert!(nested.join("keep.rs").exists());
    }

    #[test]
    fn clean_profiles__missing_target__then_nothing_removed() {
        let temp = TempDir::new().expect("temp dir");
        assert_eq!(clean_profiles(&temp.path().join("target")).unwrap(), 0);
    }

    #[test]
    fn decode__malformed_json__then_error_names_source() {
        let err = decode(&b"{\"data\": [1]}"[..], "fixture.json").unwrap_err();
        assert!(format!("{err:#}").contains("fixture.json"));
    }
}
