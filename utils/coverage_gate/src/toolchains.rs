//! External tool discovery and invocation.
//!
//! The gate relies on two tools being reachable through `PATH`:
//! - `cargo`, to locate the workspace and drive the test run
//! - `cargo-llvm-cov`, to build instrumented tests and export JSON coverage

use anyhow::{Context, Result};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// A tool the gate shells out to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredTool {
    pub name: &'static str,
    pub binary: &'static str,
    pub fix: &'static str,
}

pub const REQUIRED_TOOLS: [RequiredTool; 2] = [
    RequiredTool {
        name: "cargo",
        binary: "cargo",
        fix: "Install Rust via rustup: https://rustup.rs",
    },
    RequiredTool {
        name: "cargo-llvm-cov",
        binary: "cargo-llvm-cov",
        fix: "Run: cargo install cargo-llvm-cov && rustup component add llvm-tools-preview",
    },
];

/// Result of looking up one required tool
#[derive(Debug, Clone)]
pub struct ToolStatus {
    pub tool: RequiredTool,
    pub path: Option<PathBuf>,
}

impl ToolStatus {
    pub fn ok(&self) -> bool {
        self.path.is_some()
    }
}

/// Look up every required tool in `PATH`.
pub fn detect_tools() -> Vec<ToolStatus> {
    REQUIRED_TOOLS
        .iter()
        .map(|tool| {
            let path = which::which(tool.binary).ok();
            debug!(tool = tool.name, found = path.is_some(), "tool lookup");
            ToolStatus { tool: *tool, path }
        })
        .collect()
}

/// Fail with the install hint of the first missing tool.
pub fn ensure_tools() -> Result<()> {
    for status in detect_tools() {
        if !status.ok() {
            anyhow::bail!("{} not found in PATH. {}", status.tool.name, status.tool.fix);
        }
    }
    Ok(())
}

/// Directory holding the workspace `Cargo.toml`.
pub fn workspace_root() -> Result<PathBuf> {
    let output = Command::new("cargo")
        .args(["locate-project", "--workspace", "--message-format=plain"])
        .output()
        .context("Failed to locate workspace root")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("cargo locate-project failed: {}", stderr.trim());
    }

    let cargo_toml = PathBuf::from(String::from_utf8_lossy(&output.stdout).trim());
    cargo_toml
        .parent()
        .map(Path::to_path_buf)
        .with_context(|| format!("Manifest path has no parent: {}", cargo_toml.display()))
}

/// Run the test suite under `cargo llvm-cov` and write the JSON export to `output`.
///
/// The child's stdout is redirected to our stderr; stdout is reserved for the report.
pub fn export_json(root: &Path, output: &Path, cargo_args: &[String]) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("llvm-cov")
        .arg("--json")
        .arg("--output-path")
        .arg(output)
        .args(cargo_args)
        .current_dir(root)
        .stdout(Stdio::from(io::stderr()));

    info!(root = %root.display(), args = ?cargo_args, "Running cargo llvm-cov");

    let status = cmd
        .status()
        .context("Failed to run cargo llvm-cov")?;

    if !status.success() {
        anyhow::bail!("cargo llvm-cov failed ({})", status);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;

    #[test]
    fn required_tools__then_cover_cargo_and_llvm_cov() {
        let names: Vec<_> = REQUIRED_TOOLS.iter().map(|tool| tool.name).collect();
        assert_eq!(names, vec!["cargo", "cargo-llvm-cov"]);
        assert!(REQUIRED_TOOLS.iter().all(|tool| !tool.fix.is_empty()));
    }

    #[test]
    fn detect_tools__then_reports_every_required_tool() {
        let statuses = detect_tools();
        assert_eq!(statuses.len(), REQUIRED_TOOLS.len());
        for (status, tool) in statuses.iter().zip(REQUIRED_TOOLS.iter()) {
            assert_eq!(&status.tool, tool);
            assert_eq!(status.ok(), status.path.is_some());
        }
    }
}
