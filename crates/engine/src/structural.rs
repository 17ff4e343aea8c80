//! Structural change bookkeeping.
//!
//! `AxisDiff` describes one insertion or deletion along an axis. A list of
//! diffs is applied in order: a `Deleted` range is expressed in positions
//! before that diff, an `Inserted` range in positions after it. Everything
//! the selection models need to repair their state (mapping positions,
//! ranges and rectangles through diffs, re-resolving rows by identity) lives
//! here.

use std::collections::HashMap;

use gridsel_core::{merge_ranges, Range, Rectangle};
use serde::{Deserialize, Serialize};

use crate::layer::{Layer, RowId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisDiff {
    Deleted(Range),
    Inserted(Range),
}

impl AxisDiff {
    /// Where `position` ends up after this diff. `None` if it was deleted.
    pub fn map_position(&self, position: usize) -> Option<usize> {
        match *self {
            AxisDiff::Deleted(r) => {
                if r.contains(position) {
                    None
                } else if position >= r.end {
                    Some(position - r.len())
                } else {
                    Some(position)
                }
            }
            AxisDiff::Inserted(r) => {
                if position >= r.start {
                    Some(position + r.len())
                } else {
                    Some(position)
                }
            }
        }
    }

    /// Where the members of `range` end up. Deletion shrinks the range;
    /// insertion inside it splits it so the new positions are not covered.
    pub fn map_range(&self, range: Range) -> Vec<Range> {
        if range.is_empty() {
            return Vec::new();
        }
        match *self {
            AxisDiff::Deleted(d) => {
                let removed = range.intersection(&d).map_or(0, |r| r.len());
                let start = if range.start >= d.end {
                    range.start - d.len()
                } else if range.start >= d.start {
                    d.start
                } else {
                    range.start
                };
                let len = range.len() - removed;
                if len == 0 {
                    Vec::new()
                } else {
                    vec![Range::with_len(start, len)]
                }
            }
            AxisDiff::Inserted(i) => {
                if range.start >= i.start {
                    vec![Range::with_len(range.start + i.len(), range.len())]
                } else if range.end > i.start {
                    vec![
                        Range::new(range.start, i.start),
                        Range::new(i.end, range.end + i.len()),
                    ]
                } else {
                    vec![range]
                }
            }
        }
    }
}

/// Map a position through every diff in order.
pub fn map_position_through(diffs: &[AxisDiff], position: usize) -> Option<usize> {
    diffs
        .iter()
        .try_fold(position, |pos, diff| diff.map_position(pos))
}

/// Map a range through every diff in order.
pub fn map_range_through(diffs: &[AxisDiff], range: Range) -> Vec<Range> {
    diffs.iter().fold(vec![range], |ranges, diff| {
        ranges.into_iter().flat_map(|r| diff.map_range(r)).collect()
    })
}

/// Map a set of disjoint ranges through the diffs, keeping them merged.
pub fn map_ranges_through(diffs: &[AxisDiff], ranges: &[Range]) -> Vec<Range> {
    merge_ranges(
        ranges
            .iter()
            .flat_map(|r| map_range_through(diffs, *r))
            .collect(),
    )
}

/// Apply row diffs to a rectangle. Returns zero or more pieces.
pub fn transform_rows(rect: &Rectangle, diffs: &[AxisDiff]) -> Vec<Rectangle> {
    map_range_through(diffs, rect.row_range())
        .into_iter()
        .map(|rows| Rectangle::from_ranges(rect.column_range(), rows))
        .collect()
}

/// Apply column diffs to a rectangle. Returns zero or more pieces.
pub fn transform_columns(rect: &Rectangle, diffs: &[AxisDiff]) -> Vec<Rectangle> {
    map_range_through(diffs, rect.column_range())
        .into_iter()
        .map(|columns| Rectangle::from_ranges(columns, rect.row_range()))
        .collect()
}

/// Group positions into maximal contiguous runs, ordered for sequential
/// application as deletions (highest run first).
pub fn deletion_diffs(positions: impl IntoIterator<Item = usize>) -> Vec<AxisDiff> {
    let mut runs = gridsel_core::ranges_from_positions(positions);
    runs.reverse();
    runs.into_iter().map(AxisDiff::Deleted).collect()
}

/// Group final positions into contiguous runs, ordered for sequential
/// application as insertions (lowest run first).
pub fn insertion_diffs(positions: impl IntoIterator<Item = usize>) -> Vec<AxisDiff> {
    gridsel_core::ranges_from_positions(positions)
        .into_iter()
        .map(AxisDiff::Inserted)
        .collect()
}

/// Bidirectional row identity index: position -> identity and identity ->
/// last known position, snapshotted from a layer.
///
/// Identity-keyed selection models hold one of these and rebuild it after
/// every row structural change. Between rebuilds it still describes the
/// positions the model last saw, which is what lets a model translate its
/// stored positions into identities before re-resolving them.
#[derive(Debug, Clone, Default)]
pub struct RowIdentityIndex {
    ids: Vec<Option<RowId>>,
    positions: HashMap<RowId, usize>,
    column_count: usize,
}

impl RowIdentityIndex {
    pub fn build(grid: &dyn Layer) -> Self {
        let row_count = grid.row_count();
        let mut ids = Vec::with_capacity(row_count);
        let mut positions = HashMap::with_capacity(row_count);
        for row in 0..row_count {
            let id = grid.row_id_at(row);
            if let Some(id) = &id {
                // First occurrence wins for duplicated identities
                if let Some(first) = positions.get(id) {
                    log::debug!("row identity {id} at {row} duplicates row {first}, ignored");
                } else {
                    positions.insert(id.clone(), row);
                }
            }
            ids.push(id);
        }
        Self {
            ids,
            positions,
            column_count: grid.column_count(),
        }
    }

    pub fn id_at(&self, row_position: usize) -> Option<&RowId> {
        self.ids.get(row_position).and_then(|id| id.as_ref())
    }

    pub fn position_of(&self, id: &RowId) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn row_count(&self) -> usize {
        self.ids.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    pub fn set_column_count(&mut self, column_count: usize) {
        self.column_count = column_count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_position_mapping() {
        let diff = AxisDiff::Deleted(Range::single(3));
        assert_eq!(diff.map_position(2), Some(2));
        assert_eq!(diff.map_position(3), None);
        assert_eq!(diff.map_position(5), Some(4));
    }

    #[test]
    fn test_insert_position_mapping() {
        let diff = AxisDiff::Inserted(Range::new(0, 2));
        assert_eq!(diff.map_position(0), Some(2));
        assert_eq!(diff.map_position(4), Some(6));
    }

    #[test]
    fn test_delete_shrinks_range() {
        let diff = AxisDiff::Deleted(Range::new(4, 6));
        assert_eq!(diff.map_range(Range::new(3, 8)), vec![Range::new(3, 6)]);
        assert_eq!(diff.map_range(Range::new(5, 9)), vec![Range::new(4, 7)]);
        assert!(diff.map_range(Range::new(4, 6)).is_empty());
        assert_eq!(diff.map_range(Range::new(8, 9)), vec![Range::new(6, 7)]);
    }

    #[test]
    fn test_insert_splits_range() {
        let diff = AxisDiff::Inserted(Range::new(4, 6));
        assert_eq!(
            diff.map_range(Range::new(2, 7)),
            vec![Range::new(2, 4), Range::new(6, 9)]
        );
        assert_eq!(diff.map_range(Range::new(0, 4)), vec![Range::new(0, 4)]);
    }

    #[test]
    fn test_sequential_deletions() {
        // Rows 1 and 3 deleted, highest first
        let diffs = deletion_diffs(vec![1, 3]);
        assert_eq!(
            diffs,
            vec![AxisDiff::Deleted(Range::single(3)), AxisDiff::Deleted(Range::single(1))]
        );
        assert_eq!(map_position_through(&diffs, 0), Some(0));
        assert_eq!(map_position_through(&diffs, 2), Some(1));
        assert_eq!(map_position_through(&diffs, 4), Some(2));
        assert_eq!(map_position_through(&diffs, 3), None);
    }

    #[test]
    fn test_sequential_insertions() {
        let diffs = insertion_diffs(vec![5, 2]);
        // Old rows 0..5 map to 0,1,3,4,6
        let mapped: Vec<_> = (0..5).filter_map(|p| map_position_through(&diffs, p)).collect();
        assert_eq!(mapped, vec![0, 1, 3, 4, 6]);
    }

    #[test]
    fn test_transform_rows() {
        let rect = Rectangle::new(2, 3, 3, 3);
        let moved = transform_rows(&rect, &[AxisDiff::Deleted(Range::single(0))]);
        assert_eq!(moved, vec![Rectangle::new(2, 2, 3, 3)]);
        let untouched = transform_rows(&rect, &[AxisDiff::Deleted(Range::single(8))]);
        assert_eq!(untouched, vec![rect]);
    }

    #[test]
    fn test_identity_index_duplicate_resolves_to_first() {
        use crate::data::DataLayer;
        use crate::harness::NumberRow;

        let rows = vec![NumberRow::new(4, 2), NumberRow::new(7, 2), NumberRow::new(4, 2)];
        let index = RowIdentityIndex::build(&DataLayer::new(rows, 2));

        assert_eq!(index.row_count(), 3);
        assert_eq!(index.id_at(2), Some(&RowId::from(4)));
        assert_eq!(index.position_of(&RowId::from(4)), Some(0));
        assert_eq!(index.position_of(&RowId::from(7)), Some(1));
    }
}
