use super::layer::SelectionLayer;
use crate::command::LayerCommand;
use crate::layer::{Layer, LayerEvent};

impl<L: Layer> SelectionLayer<L> {
    /// Execute a selection command. Returns `None` for commands that belong
    /// to a layer further down, otherwise the structural events produced
    /// (empty for pure selection changes).
    pub(super) fn handle_selection_command(
        &mut self,
        command: &LayerCommand,
    ) -> Option<Vec<LayerEvent>> {
        match command {
            LayerCommand::SelectCell {
                column_position,
                row_position,
                modifiers,
            } => self.select_cell(*column_position, *row_position, *modifiers),
            LayerCommand::SelectRows {
                column_position,
                row_positions,
                modifiers,
                anchor_row,
            } => self.select_rows(*column_position, row_positions, *modifiers, *anchor_row),
            LayerCommand::SelectColumns {
                row_position,
                column_positions,
                modifiers,
                anchor_column,
            } => self.select_columns(*row_position, column_positions, *modifiers, *anchor_column),
            LayerCommand::SelectRegion { region, modifiers } => {
                self.select_region(*region, *modifiers)
            }
            LayerCommand::SelectAll => self.select_all(),
            LayerCommand::ClearSelection => self.clear(),
            LayerCommand::HideSelectedRows => return Some(self.hide_selected_rows()),
            LayerCommand::HideRows { .. }
            | LayerCommand::ShowRows { .. }
            | LayerCommand::ShowAllRows => return None,
        }
        Some(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Modifiers;
    use crate::harness::selection_stack;
    use gridsel_core::PositionCoordinate;

    #[test]
    fn test_select_commands_are_consumed() {
        let mut layer = selection_stack(5, 7);
        let events = layer.do_command(&LayerCommand::select_region(1, 1, 2, 2, Modifiers::NONE));
        assert_eq!(events, Some(Vec::new()));
        assert_eq!(layer.selected_cell_positions().len(), 4);
        assert_eq!(layer.selection_anchor(), Some(PositionCoordinate::new(1, 1)));

        layer.do_command(&LayerCommand::ClearSelection);
        assert!(layer.is_empty());
    }

    #[test]
    fn test_hide_commands_pass_through() {
        let mut layer = selection_stack(5, 7);
        layer.select_cell(0, 4, Modifiers::NONE);

        let events = layer
            .do_command(&LayerCommand::HideRows { row_positions: vec![1] })
            .unwrap_or_default();
        assert_eq!(events.len(), 1);
        assert_eq!(layer.row_count(), 6);
        assert!(layer.is_cell_position_selected(0, 3));
        assert_eq!(layer.selection_anchor(), Some(PositionCoordinate::new(0, 3)));

        layer.do_command(&LayerCommand::ShowAllRows);
        assert_eq!(layer.row_count(), 7);
        assert!(layer.is_cell_position_selected(0, 4));
    }

    #[test]
    fn test_hide_selected_rows() {
        let mut layer = selection_stack(5, 7);
        layer.select_cell(2, 3, Modifiers::NONE);
        layer.select_cell(1, 5, Modifiers::CTRL);

        let events = layer.do_command(&LayerCommand::HideSelectedRows).unwrap_or_default();

        assert!(!events.is_empty());
        assert_eq!(layer.row_count(), 5);
        assert_eq!(layer.underlying().hidden_row_indexes(), vec![3, 5]);
        assert!(layer.is_empty());
    }
}
