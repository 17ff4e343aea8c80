//! Grid selection engine.
//!
//! A stack of layers (data, row hide/show, selection) where commands travel
//! down and structural events travel up. The selection layer delegates
//! storage to a pluggable [`SelectionModel`] and repairs it whenever rows or
//! columns change underneath.

pub mod command;
pub mod data;
pub mod events;
pub mod hide_show;
pub mod layer;
pub mod selection;
pub mod structural;

#[cfg(test)]
pub mod harness;

pub use command::{LayerCommand, Modifiers};
pub use data::{DataLayer, RowRecord};
pub use events::{EventCollector, SelectionEvent, SelectionListener};
pub use hide_show::RowHideShowLayer;
pub use layer::{Layer, LayerEvent, RowId};
pub use selection::{
    selection_model_for, selection_model_of_kind, ColumnSelectionModel, DefaultSelectionModel,
    MarkerProvider, PreserveSelectionModel, RowSelectionModel, SelectionLayer, SelectionModel,
};
pub use structural::{AxisDiff, RowIdentityIndex};
