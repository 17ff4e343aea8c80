use std::collections::HashMap;

use gridsel_config::SelectionModelKind;
use gridsel_core::{covers, merge_ranges, subtract_range, Range, Rectangle};

use super::model::{delegate_identity_markers, IdentityMarkers, SelectionModel};
use crate::layer::{Layer, LayerEvent, RowId};
use crate::structural::{map_ranges_through, RowIdentityIndex};

/// Cell selection that survives data reshuffles.
///
/// Selected column ranges are stored per row identity. When rows move, the
/// selection moves with them; rows whose identity disappears are dropped.
/// Anchor and last selected cell follow their row the same way.
#[derive(Debug, Clone)]
pub struct PreserveSelectionModel {
    /// Disjoint, sorted column ranges per selected row
    cells: HashMap<RowId, Vec<Range>>,
    index: RowIdentityIndex,
    multiple_selection_allowed: bool,
    markers: IdentityMarkers,
}

impl Default for PreserveSelectionModel {
    fn default() -> Self {
        Self::new()
    }
}

impl PreserveSelectionModel {
    pub fn new() -> Self {
        Self {
            cells: HashMap::new(),
            index: RowIdentityIndex::default(),
            multiple_selection_allowed: true,
            markers: IdentityMarkers::default(),
        }
    }

    /// Selected column ranges of a row, looked up by identity.
    pub fn selected_columns_of(&self, row_id: &RowId) -> &[Range] {
        self.cells.get(row_id).map(Vec::as_slice).unwrap_or(&[])
    }

    fn columns_at(&self, row_position: usize) -> &[Range] {
        self.index
            .id_at(row_position)
            .map(|id| self.selected_columns_of(id))
            .unwrap_or(&[])
    }

    fn prune_empty(&mut self) {
        self.cells.retain(|_, ranges| !ranges.is_empty());
    }
}

delegate_identity_markers!(PreserveSelectionModel);

impl SelectionModel for PreserveSelectionModel {
    fn kind(&self) -> SelectionModelKind {
        SelectionModelKind::Preserve
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
            self.cells.clear();
        }
        let columns = region.column_range();
        for row in region.row_range().iter() {
            let Some(id) = self.index.id_at(row) else {
                log::debug!("preserve selection: no row identity at position {row}");
                continue;
            };
            let ranges = self.cells.entry(id.clone()).or_default();
            let mut updated = std::mem::take(ranges);
            updated.push(columns);
            *ranges = merge_ranges(updated);
        }
    }

    fn clear_selection(&mut self) {
        self.cells.clear();
    }

    fn clear_region(&mut self, region: Rectangle) {
        let columns = region.column_range();
        for row in region.row_range().iter() {
            if let Some(id) = self.index.id_at(row) {
                if let Some(ranges) = self.cells.get_mut(id) {
                    *ranges = subtract_range(ranges, columns);
                }
            }
        }
        self.prune_empty();
    }

    fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn selections(&self) -> Vec<Rectangle> {
        let mut rects: Vec<Rectangle> = self
            .cells
            .iter()
            .filter_map(|(id, ranges)| Some((self.index.position_of(id)?, ranges)))
            .flat_map(|(row, ranges)| {
                ranges
                    .iter()
                    .map(move |columns| Rectangle::from_ranges(*columns, Range::single(row)))
            })
            .collect();
        rects.sort_by_key(|r| (r.y, r.x));
        rects
    }

    fn is_cell_selected(&self, column_position: usize, row_position: usize) -> bool {
        self.columns_at(row_position)
            .iter()
            .any(|r| r.contains(column_position))
    }

    fn is_row_fully_selected(&self, row_position: usize, column_count: usize) -> bool {
        covers(self.columns_at(row_position), Range::new(0, column_count))
    }

    fn is_column_fully_selected(&self, column_position: usize, row_count: usize) -> bool {
        row_count > 0 && (0..row_count).all(|row| self.is_cell_selected(column_position, row))
    }

    fn handle_structural_change(&mut self, grid: &dyn Layer, event: &LayerEvent) {
        match event {
            LayerEvent::RowStructural(_) | LayerEvent::StructuralRefresh => {
                self.index = RowIdentityIndex::build(grid);
                let before = self.cells.len();
                let index = &self.index;
                self.cells.retain(|id, _| index.position_of(id).is_some());
                if self.cells.len() < before {
                    log::debug!(
                        "preserve selection: dropped {} row(s) no longer present",
                        before - self.cells.len()
                    );
                }
                if matches!(event, LayerEvent::StructuralRefresh) {
                    let bounds = Range::new(0, self.index.column_count());
                    for ranges in self.cells.values_mut() {
                        *ranges = ranges.iter().filter_map(|r| r.intersection(&bounds)).collect();
                    }
                    self.prune_empty();
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
                for ranges in self.cells.values_mut() {
                    *ranges = map_ranges_through(diffs, ranges);
                }
                self.prune_empty();
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
    use crate::structural::AxisDiff;
    use gridsel_core::PositionCoordinate;

    #[test]
    fn test_cells_follow_rows_through_refresh() {
        let mut grid = numbers_layer(4, 5);
        let mut model = PreserveSelectionModel::new();
        model.attach(&grid);
        model.add_region(Rectangle::new(1, 2, 2, 1));
        model.set_selection_anchor(Some(PositionCoordinate::new(1, 2)));

        // Reverse the rows: id "2" stays in the middle, id "3" moves to 1
        let event = grid.sort_rows_by(|a, b| b.id.cmp(&a.id));
        model.handle_structural_change(&grid, &event);
        model.add_selection(0, 1);

        assert_eq!(model.selected_columns_of(&RowId::from(3)), &[Range::single(0)]);
        assert!(model.is_cell_selected(1, 2));
        assert!(model.is_cell_selected(2, 2));
        assert!(model.is_cell_selected(0, 1));
        assert_eq!(model.selection_anchor(), Some(PositionCoordinate::new(1, 2)));

        grid.insert_row(0, NumberRow::new(50, 4));
        model.handle_structural_change(&grid, &LayerEvent::StructuralRefresh);
        assert!(model.is_cell_selected(1, 3));
        assert_eq!(model.selection_anchor(), Some(PositionCoordinate::new(1, 3)));
    }

    #[test]
    fn test_clear_region_removes_columns() {
        let grid = numbers_layer(5, 3);
        let mut model = PreserveSelectionModel::new();
        model.attach(&grid);
        model.add_region(Rectangle::new(0, 0, 5, 2));
        model.clear_region(Rectangle::new(1, 0, 3, 1));

        assert!(model.is_cell_selected(0, 0));
        assert!(!model.is_cell_selected(2, 0));
        assert!(model.is_cell_selected(4, 0));
        assert!(model.is_row_fully_selected(1, 5));
        assert!(!model.is_row_fully_selected(0, 5));
    }

    #[test]
    fn test_column_delete_maps_ranges() {
        let grid = numbers_layer(5, 3);
        let mut model = PreserveSelectionModel::new();
        model.attach(&grid);
        model.add_region(Rectangle::new(2, 0, 2, 1));

        model.handle_structural_change(
            &grid,
            &LayerEvent::ColumnStructural(vec![AxisDiff::Deleted(Range::single(0))]),
        );

        assert!(model.is_cell_selected(1, 0));
        assert!(model.is_cell_selected(2, 0));
        assert!(!model.is_cell_selected(3, 0));
    }
}
