//! Row hide/show layer
//!
//! Maps between:
//! - Position space (what layers above see: visible rows only, 0..visible_count)
//! - Index space (the underlying layer's row positions)
//!
//! Key invariants:
//! - visible_mask is indexed by underlying INDEX (not position)
//! - visible_rows is the ordered list of visible indexes; position p shows index visible_rows[p]
//! - Hiding is reported upward as row deletion, showing as row insertion

use crate::command::LayerCommand;
use crate::layer::{Layer, LayerEvent, RowId};
use crate::structural::{deletion_diffs, insertion_diffs, AxisDiff};
use gridsel_core::Range;

#[derive(Debug, Clone)]
pub struct RowHideShowLayer<L> {
    underlying: L,

    /// true = visible, false = hidden. Indexed by underlying row index.
    visible_mask: Vec<bool>,

    /// Cached visible underlying indexes, in order. Rebuilt on every change.
    visible_rows: Vec<usize>,

    /// Inverse map: underlying index -> position (None when hidden)
    index_to_position: Vec<Option<usize>>,
}

impl<L: Layer> RowHideShowLayer<L> {
    pub fn new(underlying: L) -> Self {
        let row_count = underlying.row_count();
        let mut layer = Self {
            underlying,
            visible_mask: vec![true; row_count],
            visible_rows: Vec::new(),
            index_to_position: Vec::new(),
        };
        layer.rebuild_caches();
        layer
    }

    pub fn underlying(&self) -> &L {
        &self.underlying
    }

    pub fn underlying_mut(&mut self) -> &mut L {
        &mut self.underlying
    }

    /// Map position to underlying index - O(1)
    pub fn row_index_by_position(&self, row_position: usize) -> Option<usize> {
        self.visible_rows.get(row_position).copied()
    }

    /// Map underlying index to position - O(1). None if hidden.
    pub fn row_position_by_index(&self, row_index: usize) -> Option<usize> {
        self.index_to_position.get(row_index).copied().flatten()
    }

    pub fn is_row_index_hidden(&self, row_index: usize) -> bool {
        self.visible_mask.get(row_index).is_some_and(|visible| !visible)
    }

    pub fn hidden_row_indexes(&self) -> Vec<usize> {
        self.visible_mask
            .iter()
            .enumerate()
            .filter_map(|(index, &visible)| (!visible).then_some(index))
            .collect()
    }

    /// Any rows hidden?
    pub fn has_hidden_rows(&self) -> bool {
        self.visible_rows.len() < self.visible_mask.len()
    }

    // -------------------------------------------------------------------------
    // Mutators
    // -------------------------------------------------------------------------

    /// Hide rows by position. Returns the events as seen from this layer.
    pub fn hide_rows(&mut self, row_positions: &[usize]) -> Vec<LayerEvent> {
        let positions: Vec<usize> = row_positions
            .iter()
            .copied()
            .filter(|&p| p < self.visible_rows.len())
            .collect();
        if positions.is_empty() {
            return Vec::new();
        }

        for &position in &positions {
            let index = self.visible_rows[position];
            self.visible_mask[index] = false;
        }
        self.rebuild_caches();
        log::debug!("hid {} row(s)", positions.len());

        vec![LayerEvent::RowStructural(deletion_diffs(positions))]
    }

    /// Show rows by underlying index. Already visible indexes are ignored.
    pub fn show_rows(&mut self, row_indexes: &[usize]) -> Vec<LayerEvent> {
        let mut shown = Vec::new();
        for &index in row_indexes {
            if let Some(visible) = self.visible_mask.get_mut(index) {
                if !*visible {
                    *visible = true;
                    shown.push(index);
                }
            }
        }
        if shown.is_empty() {
            return Vec::new();
        }
        self.rebuild_caches();
        log::debug!("showed {} row(s)", shown.len());

        let positions = shown
            .into_iter()
            .filter_map(|index| self.row_position_by_index(index));
        vec![LayerEvent::RowStructural(insertion_diffs(positions))]
    }

    pub fn show_all_rows(&mut self) -> Vec<LayerEvent> {
        let hidden = self.hidden_row_indexes();
        self.show_rows(&hidden)
    }

    // -------------------------------------------------------------------------
    // Internal rebuilders
    // -------------------------------------------------------------------------

    fn rebuild_caches(&mut self) {
        self.visible_rows = self
            .visible_mask
            .iter()
            .enumerate()
            .filter_map(|(index, &visible)| visible.then_some(index))
            .collect();

        self.index_to_position = vec![None; self.visible_mask.len()];
        for (position, &index) in self.visible_rows.iter().enumerate() {
            self.index_to_position[index] = Some(position);
        }
    }

    /// Translate one underlying row diff into local diffs, updating the mask.
    fn apply_underlying_diff(&mut self, diff: AxisDiff) -> Option<AxisDiff> {
        match diff {
            AxisDiff::Deleted(r) => {
                let end = r.end.min(self.visible_mask.len());
                if r.start >= end {
                    return None;
                }
                let local: Vec<usize> = (r.start..end)
                    .filter_map(|index| self.row_position_by_index(index))
                    .collect();
                self.visible_mask.drain(r.start..end);
                self.rebuild_caches();

                // Visible members of a contiguous index run are contiguous positions
                let first = *local.first()?;
                Some(AxisDiff::Deleted(Range::with_len(first, local.len())))
            }
            AxisDiff::Inserted(r) => {
                let at = r.start.min(self.visible_mask.len());
                self.visible_mask
                    .splice(at..at, std::iter::repeat(true).take(r.len()));
                self.rebuild_caches();

                let first = self.row_position_by_index(at)?;
                Some(AxisDiff::Inserted(Range::with_len(first, r.len())))
            }
        }
    }
}

impl<L: Layer> Layer for RowHideShowLayer<L> {
    fn column_count(&self) -> usize {
        self.underlying.column_count()
    }

    fn row_count(&self) -> usize {
        self.visible_rows.len()
    }

    fn row_id_at(&self, row_position: usize) -> Option<RowId> {
        let index = self.row_index_by_position(row_position)?;
        self.underlying.row_id_at(index)
    }

    fn do_command(&mut self, command: &LayerCommand) -> Option<Vec<LayerEvent>> {
        match command {
            LayerCommand::HideRows { row_positions } => Some(self.hide_rows(row_positions)),
            LayerCommand::ShowRows { row_indexes } => Some(self.show_rows(row_indexes)),
            LayerCommand::ShowAllRows => Some(self.show_all_rows()),
            _ => {
                // Underlying events are index space; translate them on the way up
                let events = self.underlying.do_command(command)?;
                Some(events.into_iter().filter_map(|e| self.translate_event(e)).collect())
            }
        }
    }

    fn handle_layer_event(&mut self, event: LayerEvent) -> Option<LayerEvent> {
        let event = self.underlying.handle_layer_event(event)?;
        self.translate_event(event)
    }
}

impl<L: Layer> RowHideShowLayer<L> {
    fn translate_event(&mut self, event: LayerEvent) -> Option<LayerEvent> {
        match event {
            LayerEvent::RowStructural(diffs) => {
                let local: Vec<AxisDiff> = diffs
                    .into_iter()
                    .filter_map(|d| self.apply_underlying_diff(d))
                    .collect();
                (!local.is_empty()).then_some(LayerEvent::RowStructural(local))
            }
            LayerEvent::ColumnStructural(diffs) => Some(LayerEvent::ColumnStructural(diffs)),
            LayerEvent::StructuralRefresh => {
                // Hidden flags stay attached to their index, like a resize
                let row_count = self.underlying.row_count();
                self.visible_mask.resize(row_count, true);
                self.rebuild_caches();
                Some(LayerEvent::StructuralRefresh)
            }
        }
    }
}
