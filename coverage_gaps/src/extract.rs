//! Uncovered-line extraction for a single file record.
//!
//! A line is reported when a segment starts a counted, non-gap region that ran
//! zero times. Only the segment's start line is recorded: a region spanning
//! several lines before the next boundary contributes its first line alone.

use std::collections::BTreeSet;

use crate::model::{FileRecord, Segment};

impl Segment {
    /// True when this segment opens a counted, non-gap region with zero hits.
    pub fn marks_uncovered(&self) -> bool {
        self.execution_count == 0 && self.has_count && !self.is_gap_region
    }
}

/// Start lines of every uncovered region in `segments`.
pub fn uncovered_lines<'a, I>(segments: I) -> BTreeSet<u32>
where
    I: IntoIterator<Item = &'a Segment>,
{
    segments
        .into_iter()
        .filter(|segment| segment.marks_uncovered())
        .map(|segment| segment.line)
        .collect()
}

impl FileRecord {
    /// Uncovered start lines for this file, or `None` when the file is skipped.
    ///
    /// Files without a region percent, at 100% or above, or without segments are
    /// skipped before any segment is inspected. An empty set means the file was
    /// inspected and nothing qualified.
    pub fn uncovered_lines(&self) -> Option<BTreeSet<u32>> {
        let percent = self.region_percent?;
        if percent >= 100.0 {
            return None;
        }
        let segments = self.segments.as_deref().filter(|s| !s.is_empty())?;
        Some(uncovered_lines(segments))
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;

    fn file(percent: Option<f64>, segments: Option<Vec<Segment>>) -> FileRecord {
        FileRecord::new("/work/src/lib.rs", percent, segments)
    }

    #[test]
    fn marks_uncovered__zero_count_counted_non_gap__then_true() {
        assert!(Segment::new(10, 1, 0, true, true, false).marks_uncovered());
    }

    #[test]
    fn marks_uncovered__gap_region__then_false() {
        assert!(!Segment::new(10, 1, 0, true, true, true).marks_uncovered());
    }

    #[test]
    fn marks_uncovered__nonzero_count__then_false() {
        assert!(!Segment::new(10, 1, 3, true, true, false).marks_uncovered());
    }

    #[test]
    fn marks_uncovered__no_count__then_false() {
        assert!(!Segment::new(10, 1, 0, false, false, false).marks_uncovered());
    }

    #[test]
    fn marks_uncovered__region_exit_with_zero_count__then_true() {
        // The region-entry flag plays no part in the predicate.
        assert!(Segment::new(10, 1, 0, true, false, false).marks_uncovered());
    }

    #[test]
    fn uncovered_lines__mixed_segments__then_collects_qualifying_lines_once() {
        let segments = [
            Segment::new(3, 1, 0, true, true, false),
            Segment::new(3, 9, 0, true, true, false),
            Segment::new(5, 1, 2, true, true, false),
            Segment::new(7, 1, 0, true, true, true),
            Segment::new(9, 1, 0, true, true, false),
        ];
        let lines = uncovered_lines(&segments);
        assert_eq!(lines.into_iter().collect::<Vec<_>>(), vec![3, 9]);
    }

    #[test]
    fn uncovered_lines__multi_line_region__then_reports_start_line_only() {
        // Region opened on line 20 runs until the boundary on line 25; lines
        // 21 through 24 are not reported.
        let segments = [
            Segment::new(20, 5, 0, true, true, false),
            Segment::new(25, 2, 4, true, false, false),
        ];
        let lines = uncovered_lines(&segments);
        assert_eq!(lines.into_iter().collect::<Vec<_>>(), vec![20]);
    }

    #[test]
    fn file_uncovered_lines__percent_at_100__then_skipped_despite_segments() {
        let record = file(Some(100.0), Some(vec![Segment::new(1, 1, 0, true, true, false)]));
        assert_eq!(record.uncovered_lines(), None);
    }

    #[test]
    fn file_uncovered_lines__percent_absent__then_skipped() {
        let record = file(None, Some(vec![Segment::new(1, 1, 0, true, true, false)]));
        assert_eq!(record.uncovered_lines(), None);
    }

    #[test]
    fn file_uncovered_lines__segments_absent_or_empty__then_skipped() {
        assert_eq!(file(Some(50.0), None).uncovered_lines(), None);
        assert_eq!(file(Some(50.0), Some(Vec::new())).uncovered_lines(), None);
    }

    #[test]
    fn file_uncovered_lines__below_100_with_gaps__then_returns_lines() {
        let record = file(
            Some(66.6),
            Some(vec![
                Segment::new(2, 1, 0, true, true, false),
                Segment::new(4, 1, 1, true, true, false),
            ]),
        );
        let lines = record.uncovered_lines().expect("inspected");
        assert_eq!(lines.into_iter().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn file_uncovered_lines__below_100_nothing_qualifies__then_empty_set() {
        let record = file(Some(90.0), Some(vec![Segment::new(4, 1, 0, true, true, true)]));
        assert_eq!(record.uncovered_lines(), Some(BTreeSet::new()));
    }
}
