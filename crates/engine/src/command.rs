use gridsel_core::Rectangle;

/// Keyboard modifiers held during a selection gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { shift: false, ctrl: false };
    pub const SHIFT: Modifiers = Modifiers { shift: true, ctrl: false };
    pub const CTRL: Modifiers = Modifiers { shift: false, ctrl: true };
    pub const CTRL_SHIFT: Modifiers = Modifiers { shift: true, ctrl: true };

    pub const fn new(shift: bool, ctrl: bool) -> Self {
        Self { shift, ctrl }
    }
}

/// Commands understood by layers in the stack. Positions are in the
/// position space of the layer the command is issued to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerCommand {
    SelectCell {
        column_position: usize,
        row_position: usize,
        modifiers: Modifiers,
    },
    SelectRows {
        column_position: usize,
        row_positions: Vec<usize>,
        modifiers: Modifiers,
        /// Row that becomes the anchor (plain/ctrl) or the far end (shift).
        anchor_row: Option<usize>,
    },
    SelectColumns {
        row_position: usize,
        column_positions: Vec<usize>,
        modifiers: Modifiers,
        anchor_column: Option<usize>,
    },
    SelectRegion {
        region: Rectangle,
        modifiers: Modifiers,
    },
    SelectAll,
    ClearSelection,
    /// Hide every row that contains a selected cell.
    HideSelectedRows,
    /// Hide rows by position.
    HideRows { row_positions: Vec<usize> },
    /// Show rows by the hide/show layer's underlying index.
    ShowRows { row_indexes: Vec<usize> },
    ShowAllRows,
}

impl LayerCommand {
    /// Single-row convenience form of `SelectRows`.
    pub fn select_row(column_position: usize, row_position: usize, modifiers: Modifiers) -> Self {
        LayerCommand::SelectRows {
            column_position,
            row_positions: vec![row_position],
            modifiers,
            anchor_row: Some(row_position),
        }
    }

    /// Single-column convenience form of `SelectColumns`.
    pub fn select_column(
        column_position: usize,
        row_position: usize,
        modifiers: Modifiers,
    ) -> Self {
        LayerCommand::SelectColumns {
            row_position,
            column_positions: vec![column_position],
            modifiers,
            anchor_column: Some(column_position),
        }
    }

    pub fn select_region(
        column_position: usize,
        row_position: usize,
        width: usize,
        height: usize,
        modifiers: Modifiers,
    ) -> Self {
        LayerCommand::SelectRegion {
            region: Rectangle::new(column_position, row_position, width, height),
            modifiers,
        }
    }
}
