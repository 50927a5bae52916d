//! Gap collection and report rendering.

use std::{fmt, path::Path, str::FromStr};

use serde::Serialize;
use tracing::debug;

use crate::{
    error::Result,
    model::CoverageReport,
    paths::relative_path,
    ranges::{compress, join_ranges, LineRange},
};

pub const ALL_COVERED: &str = "Coverage OK: no uncovered regions.";
pub const HEADER: &str = "Uncovered regions (file:path line ranges):";

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format '{}'. Use 'text' or 'json'", s)),
        }
    }
}

/// Uncovered ranges of one file, keyed by its project-relative path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileGapEntry {
    pub path: String,
    pub ranges: Vec<LineRange>,
}

impl fmt::Display for FileGapEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path, join_ranges(&self.ranges))
    }
}

/// Files whose relative path matches any of these globs are left out.
#[derive(Debug, Clone, Default)]
pub struct GapFilter {
    exclude: Vec<glob::Pattern>,
}

impl GapFilter {
    pub fn with_excludes<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let exclude = patterns
            .into_iter()
            .map(|pattern| glob::Pattern::new(pattern.as_ref()))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { exclude })
    }

    pub fn excludes(&self, relative: &str) -> bool {
        self.exclude.iter().any(|pattern| pattern.matches(relative))
    }
}

/// Walk every dataset in order and collect one entry per file with gaps.
///
/// Returns `None` when the report has no `data` at all.
pub fn collect_entries(
    report: &CoverageReport,
    root: &Path,
    filter: &GapFilter,
) -> Result<Option<Vec<FileGapEntry>>> {
    let Some(datasets) = report.data.as_ref() else {
        debug!("coverage export carries no datasets");
        return Ok(None);
    };

    let mut entries = Vec::new();
    for file in datasets.iter().flat_map(|dataset| &dataset.files) {
        let Some(lines) = file.uncovered_lines() else {
            debug!(file = %file.filename, percent = ?file.region_percent, "skipping file");
            continue;
        };
        if lines.is_empty() {
            continue;
        }

        let path = relative_path(root, Path::new(&file.filename))?;
        if filter.excludes(&path) {
            debug!(file = %path, "excluded by pattern");
            continue;
        }

        let ranges = compress(lines);
        debug!(file = %path, ranges = ranges.len(), "collected uncovered ranges");
        entries.push(FileGapEntry { path, ranges });
    }

    Ok(Some(entries))
}

/// Render collected entries as the plain-text report, without a trailing newline.
pub fn render_text(entries: &[FileGapEntry]) -> String {
    if entries.is_empty() {
        return ALL_COVERED.to_string();
    }

    let mut output = String::from(HEADER);
    for entry in entries {
        output.push('\n');
        output.push_str(&entry.to_string());
    }
    output
}

/// Result of scanning one coverage export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GapReport {
    /// The export contained no datasets.
    NoData,
    Entries(Vec<FileGapEntry>),
}

impl GapReport {
    pub fn collect(report: &CoverageReport, root: &Path, filter: &GapFilter) -> Result<Self> {
        Ok(match collect_entries(report, root, filter)? {
            Some(entries) => GapReport::Entries(entries),
            None => GapReport::NoData,
        })
    }

    pub fn entries(&self) -> &[FileGapEntry] {
        match self {
            GapReport::NoData => &[],
            GapReport::Entries(entries) => entries,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn render(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Text => self.to_text(),
            OutputFormat::Json => self.to_json(),
        }
    }

    pub fn to_text(&self) -> String {
        match self {
            GapReport::NoData => ALL_COVERED.to_string(),
            GapReport::Entries(entries) => render_text(entries),
        }
    }

    pub fn to_json(&self) -> String {
        let status = if self.is_clean() { "ok" } else { "uncovered" };
        serde_json::json!({
            "status": status,
            "files": self.entries(),
        })
        .to_string()
    }
}

/// Render `report` as text with every file relative to `root`.
pub fn render(report: &CoverageReport, root: &Path) -> Result<String> {
    Ok(GapReport::collect(report, root, &GapFilter::default())?.to_text())
}
