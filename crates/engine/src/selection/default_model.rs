use gridsel_config::SelectionModelKind;
use gridsel_core::{covers, merge_ranges, Range, Rectangle};

use super::model::{delegate_position_markers, PositionMarkers, SelectionModel};
use crate::layer::{Layer, LayerEvent};
use crate::structural::{transform_columns, transform_rows};

/// Arbitrary cell selection stored as rectangles over raw positions.
///
/// No identity tracking: row and column diffs shift or drop stored regions,
/// and a structural refresh clears everything, markers included.
#[derive(Debug, Clone)]
pub struct DefaultSelectionModel {
    selections: Vec<Rectangle>,
    multiple_selection_allowed: bool,
    markers: PositionMarkers,
}

impl Default for DefaultSelectionModel {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultSelectionModel {
    pub fn new() -> Self {
        Self {
            selections: Vec::new(),
            multiple_selection_allowed: true,
            markers: PositionMarkers::default(),
        }
    }

    /// Merged column ranges selected in one row.
    fn selected_columns_in_row(&self, row_position: usize) -> Vec<Range> {
        merge_ranges(
            self.selections
                .iter()
                .filter(|r| r.row_range().contains(row_position))
                .map(Rectangle::column_range)
                .collect(),
        )
    }

    fn selected_rows_in_column(&self, column_position: usize) -> Vec<Range> {
        merge_ranges(
            self.selections
                .iter()
                .filter(|r| r.column_range().contains(column_position))
                .map(Rectangle::row_range)
                .collect(),
        )
    }
}

delegate_position_markers!(DefaultSelectionModel);

impl SelectionModel for DefaultSelectionModel {
    fn kind(&self) -> SelectionModelKind {
        SelectionModelKind::Default
    }

    fn is_multiple_selection_allowed(&self) -> bool {
        self.multiple_selection_allowed
    }

    fn set_multiple_selection_allowed(&mut self, allowed: bool) {
        self.multiple_selection_allowed = allowed;
    }

    fn add_region(&mut self, region: Rectangle) {
        if region.is_empty() {
            return;
        }
        if self.multiple_selection_allowed {
            // Regions swallowed by the new one are redundant
            self.selections.retain(|r| !region.contains_rect(r));
        } else {
            self.selections.clear();
        }
        self.selections.push(region);
    }

    fn clear_selection(&mut self) {
        self.selections.clear();
    }

    fn clear_region(&mut self, region: Rectangle) {
        self.selections = self
            .selections
            .iter()
            .flat_map(|r| r.subtract(&region))
            .collect();
    }

    fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    fn selections(&self) -> Vec<Rectangle> {
        self.selections.clone()
    }

    fn is_cell_selected(&self, column_position: usize, row_position: usize) -> bool {
        self.selections
            .iter()
            .any(|r| r.contains(column_position, row_position))
    }

    fn is_row_fully_selected(&self, row_position: usize, column_count: usize) -> bool {
        covers(
            &self.selected_columns_in_row(row_position),
            Range::new(0, column_count),
        )
    }

    fn is_column_fully_selected(&self, column_position: usize, row_count: usize) -> bool {
        covers(
            &self.selected_rows_in_column(column_position),
            Range::new(0, row_count),
        )
    }

    fn handle_structural_change(&mut self, _grid: &dyn Layer, event: &LayerEvent) {
        match event {
            LayerEvent::RowStructural(diffs) => {
                self.selections = self
                    .selections
                    .iter()
                    .flat_map(|r| transform_rows(r, diffs))
                    .collect();
                self.markers.apply_row_diffs(diffs);
            }
            LayerEvent::ColumnStructural(diffs) => {
                self.selections = self
                    .selections
                    .iter()
                    .flat_map(|r| transform_columns(r, diffs))
                    .collect();
                self.markers.apply_column_diffs(diffs);
            }
            LayerEvent::StructuralRefresh => {
                self.selections.clear();
                self.markers.clear();
            }
        }
    }
}
