//! Selection: pluggable models and the layer that drives them.

mod column_model;
mod command_handler;
mod default_model;
mod layer;
pub mod model;
mod preserve_model;
mod row_model;

pub use column_model::ColumnSelectionModel;
pub use default_model::DefaultSelectionModel;
pub use layer::SelectionLayer;
pub use model::{IdentityMarkers, MarkerProvider, PositionMarkers, SelectionModel};
pub use preserve_model::PreserveSelectionModel;
pub use row_model::RowSelectionModel;

use gridsel_config::{SelectionModelKind, SelectionSettings};

/// Fresh, unattached model for a kind.
pub fn selection_model_of_kind(kind: SelectionModelKind) -> Box<dyn SelectionModel> {
    match kind {
        SelectionModelKind::Default => Box::new(DefaultSelectionModel::new()),
        SelectionModelKind::Row => Box::new(RowSelectionModel::new()),
        SelectionModelKind::Column => Box::new(ColumnSelectionModel::new()),
        SelectionModelKind::Preserve => Box::new(PreserveSelectionModel::new()),
    }
}

/// Model described by the settings, with its multiple-selection flag applied.
pub fn selection_model_for(settings: &SelectionSettings) -> Box<dyn SelectionModel> {
    let mut model = selection_model_of_kind(settings.model);
    model.set_multiple_selection_allowed(settings.multiple_selection);
    model
}
