//! The selection model contract.
//!
//! A model stores which cells are selected and owns the selection markers
//! (anchor, last selected cell, last selected region). The selection layer
//! keeps no copy of any of these: it always reads and writes them through the
//! installed model.

use std::fmt;

use gridsel_config::SelectionModelKind;
use gridsel_core::{PositionCoordinate, Rectangle};

use crate::layer::{Layer, LayerEvent, RowId};
use crate::structural::{
    map_position_through, transform_columns, transform_rows, AxisDiff, RowIdentityIndex,
};

/// Storage for the selection markers.
pub trait MarkerProvider {
    /// Fixed end of shift-extend gestures.
    fn selection_anchor(&self) -> Option<PositionCoordinate>;
    fn set_selection_anchor(&mut self, anchor: Option<PositionCoordinate>);

    /// Moving end of shift-extend gestures.
    fn last_selected_cell(&self) -> Option<PositionCoordinate>;
    fn set_last_selected_cell(&mut self, cell: Option<PositionCoordinate>);

    /// Block added by the most recent gesture; replaced by the next shift gesture.
    fn last_selected_region(&self) -> Option<Rectangle>;
    fn set_last_selected_region(&mut self, region: Option<Rectangle>);
}

pub trait SelectionModel: MarkerProvider + fmt::Debug {
    fn kind(&self) -> SelectionModelKind;

    fn is_multiple_selection_allowed(&self) -> bool;
    fn set_multiple_selection_allowed(&mut self, allowed: bool);

    /// Called when the model is installed on a layer. Models that need to
    /// know the grid's rows snapshot them here.
    fn attach(&mut self, _grid: &dyn Layer) {}

    fn add_selection(&mut self, column_position: usize, row_position: usize) {
        self.add_region(Rectangle::cell(column_position, row_position));
    }

    fn add_region(&mut self, region: Rectangle);

    /// Deselect everything. Markers are untouched.
    fn clear_selection(&mut self);

    fn clear_cell(&mut self, column_position: usize, row_position: usize) {
        self.clear_region(Rectangle::cell(column_position, row_position));
    }

    fn clear_region(&mut self, region: Rectangle);

    fn is_empty(&self) -> bool;

    /// Selected blocks. Blocks may overlap; callers dedupe cells.
    fn selections(&self) -> Vec<Rectangle>;

    fn is_cell_selected(&self, column_position: usize, row_position: usize) -> bool;

    /// Every cell of the row in `0..column_count` is selected.
    fn is_row_fully_selected(&self, row_position: usize, column_count: usize) -> bool;

    /// Every cell of the column in `0..row_count` is selected.
    fn is_column_fully_selected(&self, column_position: usize, row_count: usize) -> bool;

    /// Repair selection and markers after the grid changed. `grid` already
    /// reflects the change; `event` is in the selection layer's position space.
    fn handle_structural_change(&mut self, grid: &dyn Layer, event: &LayerEvent);
}

/// Position-keyed markers, used by models that do not track row identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionMarkers {
    pub anchor: Option<PositionCoordinate>,
    pub last_selected_cell: Option<PositionCoordinate>,
    pub last_selected_region: Option<Rectangle>,
}

impl PositionMarkers {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// A marker on a deleted row is cleared; markers below shift.
    pub fn apply_row_diffs(&mut self, diffs: &[AxisDiff]) {
        let map = |c: PositionCoordinate| {
            map_position_through(diffs, c.row_position)
                .map(|row| PositionCoordinate::new(c.column_position, row))
        };
        self.anchor = self.anchor.and_then(map);
        self.last_selected_cell = self.last_selected_cell.and_then(map);
        self.last_selected_region = self
            .last_selected_region
            .and_then(|r| transform_rows(&r, diffs).into_iter().reduce(|a, b| a.bounding(&b)));
    }

    pub fn apply_column_diffs(&mut self, diffs: &[AxisDiff]) {
        let map = |c: PositionCoordinate| {
            map_position_through(diffs, c.column_position)
                .map(|column| PositionCoordinate::new(column, c.row_position))
        };
        self.anchor = self.anchor.and_then(map);
        self.last_selected_cell = self.last_selected_cell.and_then(map);
        self.last_selected_region = self
            .last_selected_region
            .and_then(|r| transform_columns(&r, diffs).into_iter().reduce(|a, b| a.bounding(&b)));
    }

    /// Drop markers that fall outside a grid of the given size.
    pub fn clamp_to(&mut self, column_count: usize, row_count: usize) {
        let inside =
            |c: &PositionCoordinate| c.column_position < column_count && c.row_position < row_count;
        self.anchor = self.anchor.filter(inside);
        self.last_selected_cell = self.last_selected_cell.filter(inside);
        self.last_selected_region = self.last_selected_region.and_then(|r| {
            r.intersection(&Rectangle::new(0, 0, column_count, row_count))
        });
    }
}

/// A cell whose row is remembered by identity.
#[derive(Debug, Clone, PartialEq, Eq)]
struct IdentityCoordinate {
    column_position: usize,
    row_id: RowId,
}

/// Identity-keyed markers: they follow their row through reorders and are
/// dropped when the row disappears. The last selected region is positional:
/// it shifts with row diffs and does not survive a refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityMarkers {
    anchor: Option<IdentityCoordinate>,
    last_selected_cell: Option<IdentityCoordinate>,
    last_selected_region: Option<Rectangle>,
}

impl IdentityMarkers {
    fn capture(
        index: &RowIdentityIndex,
        cell: Option<PositionCoordinate>,
    ) -> Option<IdentityCoordinate> {
        let cell = cell?;
        let row_id = index.id_at(cell.row_position)?.clone();
        Some(IdentityCoordinate {
            column_position: cell.column_position,
            row_id,
        })
    }

    fn resolve(
        index: &RowIdentityIndex,
        cell: &Option<IdentityCoordinate>,
    ) -> Option<PositionCoordinate> {
        let cell = cell.as_ref()?;
        let row = index.position_of(&cell.row_id)?;
        Some(PositionCoordinate::new(cell.column_position, row))
    }

    pub fn anchor(&self, index: &RowIdentityIndex) -> Option<PositionCoordinate> {
        Self::resolve(index, &self.anchor)
    }

    pub fn set_anchor(&mut self, index: &RowIdentityIndex, anchor: Option<PositionCoordinate>) {
        self.anchor = Self::capture(index, anchor);
    }

    pub fn last_selected_cell(&self, index: &RowIdentityIndex) -> Option<PositionCoordinate> {
        Self::resolve(index, &self.last_selected_cell)
    }

    pub fn set_last_selected_cell(
        &mut self,
        index: &RowIdentityIndex,
        cell: Option<PositionCoordinate>,
    ) {
        self.last_selected_cell = Self::capture(index, cell);
    }

    pub fn last_selected_region(&self) -> Option<Rectangle> {
        self.last_selected_region
    }

    pub fn set_last_selected_region(&mut self, region: Option<Rectangle>) {
        self.last_selected_region = region;
    }

    /// After the index was rebuilt for a row change. The last selected region
    /// follows `row_diffs`; without diffs (a refresh) it is dropped.
    pub fn retain_rows(&mut self, index: &RowIdentityIndex, row_diffs: Option<&[AxisDiff]>) {
        let present = |c: &IdentityCoordinate| index.position_of(&c.row_id).is_some();
        if self.anchor.as_ref().is_some_and(|c| !present(c)) {
            self.anchor = None;
        }
        if self.last_selected_cell.as_ref().is_some_and(|c| !present(c)) {
            self.last_selected_cell = None;
        }
        self.last_selected_region = match row_diffs {
            Some(diffs) => self
                .last_selected_region
                .and_then(|r| transform_rows(&r, diffs).into_iter().reduce(|a, b| a.bounding(&b))),
            None => None,
        };
    }

    pub fn apply_column_diffs(&mut self, diffs: &[AxisDiff]) {
        let map = |c: Option<IdentityCoordinate>| {
            let c = c?;
            let column_position = map_position_through(diffs, c.column_position)?;
            Some(IdentityCoordinate { column_position, ..c })
        };
        self.anchor = map(self.anchor.take());
        self.last_selected_cell = map(self.last_selected_cell.take());
        self.last_selected_region = self
            .last_selected_region
            .and_then(|r| transform_columns(&r, diffs).into_iter().reduce(|a, b| a.bounding(&b)));
    }

    /// Drop markers whose column no longer exists.
    pub fn clamp_columns(&mut self, column_count: usize) {
        if self.anchor.as_ref().is_some_and(|c| c.column_position >= column_count) {
            self.anchor = None;
        }
        if self.last_selected_cell.as_ref().is_some_and(|c| c.column_position >= column_count) {
            self.last_selected_cell = None;
        }
    }
}

/// Implements `MarkerProvider` for a model with `markers: IdentityMarkers`
/// and `index: RowIdentityIndex` fields.
macro_rules! delegate_identity_markers {
    ($model:ty) => {
        impl $crate::selection::model::MarkerProvider for $model {
            fn selection_anchor(&self) -> Option<gridsel_core::PositionCoordinate> {
                self.markers.anchor(&self.index)
            }

            fn set_selection_anchor(&mut self, anchor: Option<gridsel_core::PositionCoordinate>) {
                self.markers.set_anchor(&self.index, anchor);
            }

            fn last_selected_cell(&self) -> Option<gridsel_core::PositionCoordinate> {
                self.markers.last_selected_cell(&self.index)
            }

            fn set_last_selected_cell(&mut self, cell: Option<gridsel_core::PositionCoordinate>) {
                self.markers.set_last_selected_cell(&self.index, cell);
            }

            fn last_selected_region(&self) -> Option<gridsel_core::Rectangle> {
                self.markers.last_selected_region()
            }

            fn set_last_selected_region(&mut self, region: Option<gridsel_core::Rectangle>) {
                self.markers.set_last_selected_region(region);
            }
        }
    };
}

pub(crate) use delegate_identity_markers;

/// Implements `MarkerProvider` for a model with a `markers: PositionMarkers` field.
macro_rules! delegate_position_markers {
    ($model:ty) => {
        impl $crate::selection::model::MarkerProvider for $model {
            fn selection_anchor(&self) -> Option<gridsel_core::PositionCoordinate> {
                self.markers.anchor
            }

            fn set_selection_anchor(&mut self, anchor: Option<gridsel_core::PositionCoordinate>) {
                self.markers.anchor = anchor;
            }

            fn last_selected_cell(&self) -> Option<gridsel_core::PositionCoordinate> {
                self.markers.last_selected_cell
            }

            fn set_last_selected_cell(&mut self, cell: Option<gridsel_core::PositionCoordinate>) {
                self.markers.last_selected_cell = cell;
            }

            fn last_selected_region(&self) -> Option<gridsel_core::Rectangle> {
                self.markers.last_selected_region
            }

            fn set_last_selected_region(&mut self, region: Option<gridsel_core::Rectangle>) {
                self.markers.last_selected_region = region;
            }
        }
    };
}

pub(crate) use delegate_position_markers;

#[cfg(test)]
mod tests {
    use super::*;
    use gridsel_core::Range;

    #[test]
    fn test_markers_follow_row_delete() {
        let mut markers = PositionMarkers {
            anchor: Some(PositionCoordinate::new(2, 5)),
            last_selected_cell: Some(PositionCoordinate::new(2, 3)),
            last_selected_region: Some(Rectangle::new(2, 3, 1, 3)),
        };
        markers.apply_row_diffs(&[AxisDiff::Deleted(Range::single(3))]);

        assert_eq!(markers.anchor, Some(PositionCoordinate::new(2, 4)));
        assert_eq!(markers.last_selected_cell, None);
        assert_eq!(markers.last_selected_region, Some(Rectangle::new(2, 3, 1, 2)));
    }

    #[test]
    fn test_identity_region_follows_row_diffs() {
        let mut grid = crate::harness::numbers_layer(3, 7);
        let mut markers = IdentityMarkers::default();
        let index = RowIdentityIndex::build(&grid);
        markers.set_anchor(&index, Some(PositionCoordinate::new(0, 4)));
        markers.set_last_selected_region(Some(Rectangle::new(0, 2, 3, 3)));

        let (_, event) = grid.remove_row(6).unwrap();
        let LayerEvent::RowStructural(diffs) = event else {
            panic!("row removal must be a row event");
        };
        let index = RowIdentityIndex::build(&grid);
        markers.retain_rows(&index, Some(diffs.as_slice()));
        assert_eq!(markers.last_selected_region(), Some(Rectangle::new(0, 2, 3, 3)));

        let (_, event) = grid.remove_row(0).unwrap();
        let LayerEvent::RowStructural(diffs) = event else {
            panic!("row removal must be a row event");
        };
        let index = RowIdentityIndex::build(&grid);
        markers.retain_rows(&index, Some(diffs.as_slice()));
        assert_eq!(markers.last_selected_region(), Some(Rectangle::new(0, 1, 3, 3)));
        assert_eq!(markers.anchor(&index), Some(PositionCoordinate::new(0, 3)));

        markers.retain_rows(&index, None);
        assert_eq!(markers.last_selected_region(), None);
        assert_eq!(markers.anchor(&index), Some(PositionCoordinate::new(0, 3)));
    }

    #[test]
    fn test_markers_clamp() {
        let mut markers = PositionMarkers {
            anchor: Some(PositionCoordinate::new(4, 1)),
            last_selected_cell: Some(PositionCoordinate::new(1, 1)),
            last_selected_region: Some(Rectangle::new(0, 0, 6, 2)),
        };
        markers.clamp_to(3, 3);

        assert_eq!(markers.anchor, None);
        assert_eq!(markers.last_selected_cell, Some(PositionCoordinate::new(1, 1)));
        assert_eq!(markers.last_selected_region, Some(Rectangle::new(0, 0, 3, 2)));
    }
}
