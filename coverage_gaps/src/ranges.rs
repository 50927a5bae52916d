use std::fmt;

use serde::{Serialize, Serializer};

/// Closed interval of line numbers; `start == end` is a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

impl LineRange {
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end, "range start {start} exceeds end {end}");
        Self { start, end }
    }

    pub fn single(line: u32) -> Self {
        Self::new(line, line)
    }

    pub fn is_single(&self) -> bool {
        self.start == self.end
    }

    /// Every line number inside the range.
    pub fn lines(&self) -> impl Iterator<Item = u32> {
        self.start..=self.end
    }
}

impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

impl Serialize for LineRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Compress line numbers into the fewest ascending, non-adjacent ranges.
///
/// Input order and duplicates do not matter.
pub fn compress<I>(lines: I) -> Vec<LineRange>
where
    I: IntoIterator<Item = u32>,
{
    let mut sorted: Vec<u32> = lines.into_iter().collect();
    sorted.sort_unstable();
    sorted.dedup();

    let mut iter = sorted.into_iter();
    let Some(first) = iter.next() else {
        return Vec::new();
    };

    let mut ranges = Vec::new();
    let (mut start, mut previous) = (first, first);
    for line in iter {
        if previous.checked_add(1) == Some(line) {
            previous = line;
            continue;
        }
        ranges.push(LineRange::new(start, previous));
        start = line;
        previous = line;
    }
    ranges.push(LineRange::new(start, previous));
    ranges
}

/// Comma-join ranges with no spaces, e.g. `2-3,9`.
pub fn join_ranges(ranges: &[LineRange]) -> String {
    ranges
        .iter()
        .map(LineRange::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
