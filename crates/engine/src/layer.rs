//! The layer contract shared by every level of the grid stack.
//!
//! A stack is built bottom-up (data -> row hide/show -> selection). Each layer
//! owns the layer beneath it and works in its own *position* space: positions
//! are contiguous `0..row_count()` after the transformations of every layer
//! below have been applied.
//!
//! Commands travel down: a layer handles the commands it understands and
//! forwards the rest. Events travel up: `handle_layer_event` is called on the
//! top layer with an event expressed in data space; each layer lets its
//! underlying layer process the event first, then translates it into its own
//! position space before acting on it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::command::LayerCommand;
use crate::structural::AxisDiff;

/// Stable identity of a data row, independent of where the row is displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RowId(pub String);

impl RowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RowId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<u64> for RowId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

/// Structural notifications flowing up the stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayerEvent {
    /// Rows were inserted and/or deleted. Diffs apply in order.
    RowStructural(Vec<AxisDiff>),
    /// Columns were inserted and/or deleted. Diffs apply in order.
    ColumnStructural(Vec<AxisDiff>),
    /// The data changed wholesale; positions carry no relation to before.
    StructuralRefresh,
}

pub trait Layer {
    fn column_count(&self) -> usize;

    fn row_count(&self) -> usize;

    /// Identity of the row shown at `row_position`, if the position exists.
    fn row_id_at(&self, row_position: usize) -> Option<RowId>;

    /// Handle a command or forward it downward. `None` means no layer in the
    /// stack understood the command; `Some` carries the events it produced,
    /// already translated into this layer's position space.
    fn do_command(&mut self, command: &LayerCommand) -> Option<Vec<LayerEvent>>;

    /// Process a data-space event through the stack and return it as seen by
    /// this layer. `None` means the change is invisible from here.
    fn handle_layer_event(&mut self, event: LayerEvent) -> Option<LayerEvent>;
}
