use std::collections::HashSet;

use gridsel_config::SelectionModelKind;
use gridsel_core::{ranges_from_positions, Range, Rectangle};

use super::model::{delegate_identity_markers, IdentityMarkers, SelectionModel};
use crate::layer::{Layer, LayerEvent, RowId};
use crate::structural::RowIdentityIndex;

/// Whole-row selection keyed by row identity.
///
/// Any cell address selects or deselects its entire row. Selected rows are
/// remembered by `RowId`, so they stay selected when the data is reordered
/// and are dropped once their identity is no longer visible.
#[derive(Debug, Clone)]
pub struct RowSelectionModel {
    selected: HashSet<RowId>,
    index: RowIdentityIndex,
    multiple_selection_allowed: bool,
    markers: IdentityMarkers,
}

impl Default for RowSelectionModel {
    fn default() -> Self {
        Self::new()
    }
}

impl RowSelectionModel {
    pub fn new() -> Self {
        Self {
            selected: HashSet::new(),
            index: RowIdentityIndex::default(),
            multiple_selection_allowed: true,
            markers: IdentityMarkers::default(),
        }
    }

    /// Identities of the selected rows, in no particular order.
    pub fn selected_row_ids(&self) -> impl Iterator<Item = &RowId> {
        self.selected.iter()
    }

    fn is_row_selected(&self, row_position: usize) -> bool {
        self.index
            .id_at(row_position)
            .is_some_and(|id| self.selected.contains(id))
    }

    fn selected_positions(&self) -> Vec<usize> {
        self.selected
            .iter()
            .filter_map(|id| self.index.position_of(id))
            .collect()
    }
}

delegate_identity_markers!(RowSelectionModel);

impl SelectionModel for RowSelectionModel {
    fn kind(&self) -> SelectionModelKind {
        SelectionModelKind::Row
    }

    fn is_multiple_selection_allowed(&self) -> bool {
        self.multiple_selection_allowed
    }

    fn set_multiple_selection_allowed(&mut self, allowed: bool) {
        self.multiple_selection_allowed = allowed;
    }

    fn attach(&mut self, grid: &dyn Layer) {
        self.index = RowIdentityIndex::build(grid);
    }

    fn add_region(&mut self, region: Rectangle) {
        if region.is_empty() {
            return;
        }
        if !self.multiple_selection_allowed {
            self.selected.clear();
        }
        for row in region.row_range().iter() {
            match self.index.id_at(row) {
                Some(id) => {
                    self.selected.insert(id.clone());
                }
                None => log::debug!("row selection: no row identity at position {row}"),
            }
        }
    }

    fn clear_selection(&mut self) {
        self.selected.clear();
    }

    fn clear_region(&mut self, region: Rectangle) {
        for row in region.row_range().iter() {
            if let Some(id) = self.index.id_at(row) {
                self.selected.remove(id);
            }
        }
    }

    fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    fn selections(&self) -> Vec<Rectangle> {
        let columns = Range::new(0, self.index.column_count());
        ranges_from_positions(self.selected_positions())
            .into_iter()
            .map(|rows| Rectangle::from_ranges(columns, rows))
            .collect()
    }

    fn is_cell_selected(&self, _column_position: usize, row_position: usize) -> bool {
        self.is_row_selected(row_position)
    }

    fn is_row_fully_selected(&self, row_position: usize, column_count: usize) -> bool {
        column_count > 0 && self.is_row_selected(row_position)
    }

    fn is_column_fully_selected(&self, _column_position: usize, row_count: usize) -> bool {
        row_count > 0 && (0..row_count).all(|row| self.is_row_selected(row))
    }

    fn handle_structural_change(&mut self, grid: &dyn Layer, event: &LayerEvent) {
        match event {
            LayerEvent::RowStructural(_) | LayerEvent::StructuralRefresh => {
                self.index = RowIdentityIndex::build(grid);
                let before = self.selected.len();
                let index = &self.index;
                self.selected.retain(|id| index.position_of(id).is_some());
                if self.selected.len() < before {
                    log::debug!(
                        "row selection: dropped {} row(s) no longer present",
                        before - self.selected.len()
                    );
                }
                let row_diffs = match event {
                    LayerEvent::RowStructural(diffs) => Some(diffs.as_slice()),
                    _ => None,
                };
                self.markers.retain_rows(&self.index, row_diffs);
                self.markers.clamp_columns(self.index.column_count());
            }
            LayerEvent::ColumnStructural(diffs) => {
                self.index.set_column_count(grid.column_count());
                self.markers.apply_column_diffs(diffs);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::{numbers_layer, NumberRow};
    use crate::selection::model::MarkerProvider;
    use gridsel_core::PositionCoordinate;

    fn attached(
        columns: usize,
        rows: usize,
    ) -> (crate::data::DataLayer<NumberRow>, RowSelectionModel) {
        let grid = numbers_layer(columns, rows);
        let mut model = RowSelectionModel::new();
        model.attach(&grid);
        (grid, model)
    }

    #[test]
    fn test_cell_selects_whole_row() {
        let (_grid, mut model) = attached(4, 5);
        model.add_selection(2, 1);

        assert!(model.is_cell_selected(0, 1));
        assert!(model.is_cell_selected(3, 1));
        assert!(model.is_row_fully_selected(1, 4));
        assert_eq!(model.selections(), vec![Rectangle::new(0, 1, 4, 1)]);
    }

    #[test]
    fn test_contiguous_rows_merge() {
        let (_grid, mut model) = attached(4, 6);
        model.add_region(Rectangle::new(1, 1, 1, 2));
        model.add_selection(0, 3);
        model.add_selection(0, 5);

        assert_eq!(
            model.selections(),
            vec![Rectangle::new(0, 1, 4, 3), Rectangle::new(0, 5, 4, 1)]
        );
    }

    #[test]
    fn test_clear_cell_deselects_row() {
        let (_grid, mut model) = attached(4, 5);
        model.add_region(Rectangle::new(0, 0, 4, 3));
        model.clear_cell(3, 1);

        assert!(model.is_cell_selected(0, 0));
        assert!(!model.is_cell_selected(0, 1));
        assert!(model.is_cell_selected(0, 2));
    }

    #[test]
    fn test_rows_follow_identity_after_insert() {
        let (mut grid, mut model) = attached(3, 4);
        model.add_selection(0, 1);
        model.set_selection_anchor(Some(PositionCoordinate::new(2, 1)));

        let event = grid.insert_row(0, NumberRow::new(100, 3));
        model.handle_structural_change(&grid, &event);

        assert!(!model.is_cell_selected(0, 1));
        assert!(model.is_cell_selected(0, 2));
        assert_eq!(model.selection_anchor(), Some(PositionCoordinate::new(2, 2)));
    }

    #[test]
    fn test_removed_row_is_dropped() {
        let (mut grid, mut model) = attached(3, 4);
        model.add_selection(0, 1);
        model.add_selection(0, 3);

        let (_, event) = grid.remove_row(1).unwrap();
        model.handle_structural_change(&grid, &event);

        assert_eq!(model.selected_row_ids().count(), 1);
        assert!(model.is_cell_selected(0, 2));
    }
}
