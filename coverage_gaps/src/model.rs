//! In-memory form of an `llvm-cov export` JSON document.
//!
//! Only the fields needed to locate uncovered regions are decoded; everything
//! else in the export (`totals`, `functions`, branch data) is ignored.

use std::io::Read;

use serde::Deserialize;

use crate::error::Result;

/// A decoded coverage export.
///
/// `data` stays `None` when the export carried no `data` key at all, which is
/// reported differently from a present but empty dataset list.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CoverageReport {
    #[serde(default)]
    pub data: Option<Vec<Dataset>>,
}

impl CoverageReport {
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Total number of file records across every dataset.
    pub fn file_count(&self) -> usize {
        self.data
            .iter()
            .flatten()
            .map(|dataset| dataset.files.len())
            .sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub files: Vec<FileRecord>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawFileRecord")]
pub struct FileRecord {
    pub filename: String,
    /// `summary.regions.percent`, 0 to 100.
    pub region_percent: Option<f64>,
    pub segments: Option<Vec<Segment>>,
}

impl FileRecord {
    pub fn new(
        filename: impl Into<String>,
        region_percent: Option<f64>,
        segments: Option<Vec<Segment>>,
    ) -> Self {
        Self {
            filename: filename.into(),
            region_percent,
            segments,
        }
    }
}

/// One execution-boundary marker, decoded from the positional array
/// `[line, column, count, hasCount, isRegionEntry, isGapRegion]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "SegmentTuple")]
pub struct Segment {
    pub line: u32,
    pub column: u32,
    pub execution_count: u64,
    pub has_count: bool,
    pub is_region_entry: bool,
    pub is_gap_region: bool,
}

impl Segment {
    pub fn new(
        line: u32,
        column: u32,
        execution_count: u64,
        has_count: bool,
        is_region_entry: bool,
        is_gap_region: bool,
    ) -> Self {
        Self {
            line,
            column,
            execution_count,
            has_count,
            is_region_entry,
            is_gap_region,
        }
    }
}

type SegmentTuple = (u32, u32, u64, bool, bool, bool);

impl From<SegmentTuple> for Segment {
    fn from(value: SegmentTuple) -> Self {
        let (line, column, execution_count, has_count, is_region_entry, is_gap_region) = value;
        Self::new(
            line,
            column,
            execution_count,
            has_count,
            is_region_entry,
            is_gap_region,
        )
    }
}

#[derive(Deserialize)]
struct RawFileRecord {
    filename: String,
    #[serde(default)]
    summary: Option<RawSummary>,
    #[serde(default)]
    segments: Option<Vec<Segment>>,
}

#[derive(Deserialize)]
struct RawSummary {
    #[serde(default)]
    regions: Option<RawRegions>,
}

#[derive(Deserialize)]
struct RawRegions {
    #[serde(default)]
    percent: Option<f64>,
}

impl From<RawFileRecord> for FileRecord {
    fn from(raw: RawFileRecord) -> Self {
        let region_percent = raw
            .summary
            .and_then(|summary| summary.regions)
            .and_then(|regions| regions.percent);
        Self {
            filename: raw.filename,
            region_percent,
            segments: raw.segments,
        }
    }
}
