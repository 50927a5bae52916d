//! # Coverage gaps
//!
//! Turns an `llvm-cov export` JSON document (what `cargo llvm-cov --json`
//! writes) into a short list of uncovered line ranges per file:
//!
//! ```text
//! Uncovered regions (file:path line ranges):
//! src/lib.rs:2-3,9
//! ```
//!
//! or `Coverage OK: no uncovered regions.` when nothing is left untested.
//!
//! ## Pipeline
//!
//! 1. [`CoverageReport`] - decoded export, datasets of file records
//! 2. [`FileRecord::uncovered_lines`] - start lines of zero-count, counted,
//!    non-gap regions
//! 3. [`compress`] - minimal ascending [`LineRange`]s
//! 4. [`relative_path`] - project-relative path with `/` separators
//! 5. [`GapReport`] / [`render`] - final text or JSON
//!
//! The crate performs no I/O beyond decoding from a caller-supplied reader;
//! running the tests and owning temporary files is left to the caller.

pub mod error;
pub mod extract;
pub mod model;
pub mod paths;
pub mod ranges;
pub mod render;

pub use error::{GapError, Result};
pub use extract::uncovered_lines;
pub use model::{CoverageReport, Dataset, FileRecord, Segment};
pub use paths::relative_path;
pub use ranges::{compress, join_ranges, LineRange};
pub use render::{
    collect_entries, render, render_text, FileGapEntry, GapFilter, GapReport, OutputFormat,
    ALL_COVERED, HEADER,
};
