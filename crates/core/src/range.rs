use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A half-open interval of positions, `[start, end)`.
///
/// `start <= end` always holds. Constructing with `start > end` yields the
/// empty range `[start, start)`; no constructor fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Range {
    pub start: usize,
    pub end: usize,
}

impl Range {
    /// Create a new range. An inverted pair collapses to an empty range at `start`.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    /// Range covering exactly one position. Saturates at `usize::MAX`.
    pub fn single(position: usize) -> Self {
        Self::with_len(position, 1)
    }

    /// Range of `len` positions starting at `start`, cut short at `usize::MAX`.
    pub fn with_len(start: usize, len: usize) -> Self {
        Self {
            start,
            end: start.saturating_add(len),
        }
    }

    pub fn contains(&self, position: usize) -> bool {
        self.start <= position && position < self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True if the two ranges share at least one position.
    pub fn overlaps(&self, other: &Range) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Positions present in both ranges, if any.
    pub fn intersection(&self, other: &Range) -> Option<Range> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start < end).then_some(Range { start, end })
    }

    pub fn iter(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }

    /// Materialize every member position.
    pub fn to_set(&self) -> BTreeSet<usize> {
        self.iter().collect()
    }

    /// Stable sort by `start` only; ranges with equal starts keep their input order.
    pub fn sort_by_start(ranges: &mut [Range]) {
        ranges.sort_by_key(|r| r.start);
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

impl From<std::ops::Range<usize>> for Range {
    fn from(r: std::ops::Range<usize>) -> Self {
        Range::new(r.start, r.end)
    }
}

/// Coalesce overlapping or touching ranges into a sorted, disjoint list.
/// Empty ranges are dropped.
pub fn merge_ranges(mut ranges: Vec<Range>) -> Vec<Range> {
    ranges.retain(|r| !r.is_empty());
    ranges.sort();

    let mut merged: Vec<Range> = Vec::with_capacity(ranges.len());
    for r in ranges {
        match merged.last_mut() {
            Some(last) if r.start <= last.end => last.end = last.end.max(r.end),
            _ => merged.push(r),
        }
    }
    merged
}

/// Remove `removed` from every range in `ranges`, splitting where needed.
pub fn subtract_range(ranges: &[Range], removed: Range) -> Vec<Range> {
    let mut out = Vec::with_capacity(ranges.len() + 1);
    for r in ranges {
        if !r.overlaps(&removed) {
            out.push(*r);
            continue;
        }
        if r.start < removed.start {
            out.push(Range::new(r.start, removed.start));
        }
        if removed.end < r.end {
            out.push(Range::new(removed.end, r.end));
        }
    }
    out
}

/// True if the disjoint, sorted `ranges` cover every position in `target`.
pub fn covers(ranges: &[Range], target: Range) -> bool {
    if target.is_empty() {
        return false;
    }
    ranges
        .iter()
        .any(|r| r.start <= target.start && target.end <= r.end)
}

/// Group sorted positions into contiguous ranges: `[1, 2, 3, 7]` -> `[1, 4), [7, 8)`.
pub fn ranges_from_positions(positions: impl IntoIterator<Item = usize>) -> Vec<Range> {
    let mut sorted: Vec<usize> = positions.into_iter().collect();
    sorted.sort_unstable();
    sorted.dedup();
    merge_ranges(sorted.into_iter().map(Range::single).collect())
}
