use std::collections::BTreeSet;

use gridsel_config::SelectionModelKind;
use gridsel_core::{ranges_from_positions, Range, Rectangle};

use super::model::{delegate_position_markers, PositionMarkers, SelectionModel};
use crate::layer::{Layer, LayerEvent};
use crate::structural::map_position_through;

/// Whole-column selection keyed by column position.
#[derive(Debug, Clone)]
pub struct ColumnSelectionModel {
    selected: BTreeSet<usize>,
    row_count: usize,
    column_count: usize,
    multiple_selection_allowed: bool,
    markers: PositionMarkers,
}

impl Default for ColumnSelectionModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnSelectionModel {
    pub fn new() -> Self {
        Self {
            selected: BTreeSet::new(),
            row_count: 0,
            column_count: 0,
            multiple_selection_allowed: true,
            markers: PositionMarkers::default(),
        }
    }

    pub fn selected_columns(&self) -> impl Iterator<Item = usize> + '_ {
        self.selected.iter().copied()
    }
}

delegate_position_markers!(ColumnSelectionModel);

impl SelectionModel for ColumnSelectionModel {
    fn kind(&self) -> SelectionModelKind {
        SelectionModelKind::Column
    }

    fn is_multiple_selection_allowed(&self) -> bool {
        self.multiple_selection_allowed
    }

    fn set_multiple_selection_allowed(&mut self, allowed: bool) {
        self.multiple_selection_allowed = allowed;
    }

    fn attach(&mut self, grid: &dyn Layer) {
        self.row_count = grid.row_count();
        self.column_count = grid.column_count();
    }

    fn add_region(&mut self, region: Rectangle) {
        if region.is_empty() {
            return;
        }
        if !self.multiple_selection_allowed {
            self.selected.clear();
        }
        self.selected.extend(region.column_range().iter());
    }

    fn clear_selection(&mut self) {
        self.selected.clear();
    }

    fn clear_region(&mut self, region: Rectangle) {
        for column in region.column_range().iter() {
            self.selected.remove(&column);
        }
    }

    fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    fn selections(&self) -> Vec<Rectangle> {
        let rows = Range::new(0, self.row_count);
        ranges_from_positions(self.selected.iter().copied())
            .into_iter()
            .map(|columns| Rectangle::from_ranges(columns, rows))
            .collect()
    }

    fn is_cell_selected(&self, column_position: usize, _row_position: usize) -> bool {
        self.selected.contains(&column_position)
    }

    fn is_row_fully_selected(&self, _row_position: usize, column_count: usize) -> bool {
        column_count > 0 && (0..column_count).all(|c| self.selected.contains(&c))
    }

    fn is_column_fully_selected(&self, column_position: usize, row_count: usize) -> bool {
        row_count > 0 && self.selected.contains(&column_position)
    }

    fn handle_structural_change(&mut self, grid: &dyn Layer, event: &LayerEvent) {
        self.row_count = grid.row_count();
        self.column_count = grid.column_count();
        match event {
            LayerEvent::RowStructural(diffs) => {
                self.markers.apply_row_diffs(diffs);
            }
            LayerEvent::ColumnStructural(diffs) => {
                self.selected = self
                    .selected
                    .iter()
                    .filter_map(|&c| map_position_through(diffs, c))
                    .collect();
                self.markers.apply_column_diffs(diffs);
            }
            LayerEvent::StructuralRefresh => {
                let column_count = self.column_count;
                self.selected.retain(|&c| c < column_count);
                self.markers.clamp_to(self.column_count, self.row_count);
            }
        }
    }
}
