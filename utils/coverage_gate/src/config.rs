//! Command line arguments and the resolved gate configuration.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use coverage_gaps::{GapFilter, OutputFormat};

use crate::toolchains;

#[derive(Parser, Debug)]
#[command(
    name = "coverage_gate",
    author,
    version,
    about = "Report uncovered regions from an llvm-cov JSON export",
    long_about = None
)]
#[command(propagate_version = true)]
pub struct Args {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project root that reported paths are made relative to
    /// (defaults to the cargo workspace root)
    #[arg(long, global = true, value_name = "PATH", env = "COVERAGE_GATE_ROOT")]
    pub root: Option<PathBuf>,

    /// Output format (text or json)
    #[arg(
        short,
        long,
        global = true,
        default_value = "text",
        env = "COVERAGE_GATE_FORMAT"
    )]
    pub format: OutputFormat,

    /// Glob of relative paths to leave out of the report (repeatable)
    #[arg(long, global = true, value_name = "GLOB")]
    pub exclude: Vec<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the test suite under cargo llvm-cov and report uncovered regions
    Check {
        /// Extra arguments passed through to `cargo llvm-cov`
        #[arg(last = true)]
        cargo_args: Vec<String>,
    },
    /// Report uncovered regions from an existing export (`-` reads stdin)
    Report {
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
    /// Remove stale .profraw and .profdata files under target/
    Clean,
    /// Check that the required external tools are installed
    Doctor,
}

#[derive(Debug, Clone)]
pub struct GateConfig {
    pub verbose: bool,
    pub root: Option<PathBuf>,
    pub format: OutputFormat,
    pub exclude: Vec<String>,
}

impl From<&Args> for GateConfig {
    fn from(value: &Args) -> Self {
        Self {
            verbose: value.verbose,
            root: value.root.clone(),
            format: value.format,
            exclude: value.exclude.clone(),
        }
    }
}

impl GateConfig {
    /// Absolute project root: the explicit `--root`, else the cargo workspace.
    ///
    /// Absolute roots are kept verbatim so they match the paths llvm-cov
    /// recorded; relative roots are canonicalized against the current directory.
    pub fn resolve_root(&self) -> Result<PathBuf> {
        match &self.root {
            Some(root) if root.is_absolute() => Ok(root.clone()),
            Some(root) => root
                .canonicalize()
                .with_context(|| format!("Failed to resolve project root {}", root.display())),
            None => toolchains::workspace_root(),
        }
    }

    pub fn filter(&self) -> Result<GapFilter> {
        GapFilter::with_excludes(&self.exclude).context("Invalid --exclude pattern")
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;

    #[test]
    fn args__report_with_globals__then_config_carries_them() {
        let args = Args::try_parse_from([
            "coverage_gate",
            "report",
            "cov.json",
            "--root",
            "/work/proj",
            "--format",
            "json",
            "--exclude",
            "tests/**",
            "--exclude",
            "benches/**",
            "-v",
        ])
        .expect("parse");

        let config = GateConfig::from(&args);
        assert!(config.verbose);
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.exclude, vec!["tests/**", "benches/**"]);
        assert_eq!(config.resolve_root().unwrap(), PathBuf::from("/work/proj"));
        match args.command {
            Commands::Report { input } => assert_eq!(input, PathBuf::from("cov.json")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn args__check_with_passthrough__then_collects_cargo_args() {
        let args =
            Args::try_parse_from(["coverage_gate", "check", "--", "--workspace", "--all-features"])
                .expect("parse");
        match args.command {
            Commands::Check { cargo_args } => {
                assert_eq!(cargo_args, vec!["--workspace", "--all-features"])
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn args__unknown_format__then_parse_error() {
        let result = Args::try_parse_from(["coverage_gate", "--format", "xml", "clean"]);
        assert!(result.is_err());
    }

    #[test]
    fn gate_config__invalid_exclude__then_filter_error() {
        let config = GateConfig {
            verbose: false,
            root: None,
            format: OutputFormat::Text,
            exclude: vec!["src/[".to_string()],
        };
        let err = config.filter().unwrap_err();
        assert!(format!("{err:#}").contains("Invalid --exclude pattern"));
    }
}
