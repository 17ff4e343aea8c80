//! Data layer: the bottom of the stack, a list of row objects.

use gridsel_core::Range;

use crate::command::LayerCommand;
use crate::layer::{Layer, LayerEvent, RowId};
use crate::structural::AxisDiff;

/// A row object the data layer can display.
pub trait RowRecord {
    /// Stable identity of this row, used by identity-keyed selection models.
    /// Must be unique within the data: a repeated identity resolves to its
    /// first row only.
    fn row_id(&self) -> RowId;

    /// Display value of a column, `None` past the last column.
    fn field(&self, column: usize) -> Option<String>;
}

/// Row objects in data order. Position == index at this level.
#[derive(Debug, Clone)]
pub struct DataLayer<T> {
    rows: Vec<T>,
    column_count: usize,
}

impl<T: RowRecord> DataLayer<T> {
    pub fn new(rows: Vec<T>, column_count: usize) -> Self {
        Self { rows, column_count }
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn row(&self, row_index: usize) -> Option<&T> {
        self.rows.get(row_index)
    }

    pub fn data_value(&self, column: usize, row_index: usize) -> Option<String> {
        if column >= self.column_count {
            return None;
        }
        self.rows.get(row_index).and_then(|r| r.field(column))
    }

    /// Insert a row and return the matching data-space event.
    /// An index past the end appends.
    pub fn insert_row(&mut self, row_index: usize, row: T) -> LayerEvent {
        let index = row_index.min(self.rows.len());
        self.rows.insert(index, row);
        LayerEvent::RowStructural(vec![AxisDiff::Inserted(Range::single(index))])
    }

    /// Remove a row and return it with the matching data-space event.
    pub fn remove_row(&mut self, row_index: usize) -> Option<(T, LayerEvent)> {
        if row_index >= self.rows.len() {
            return None;
        }
        let row = self.rows.remove(row_index);
        Some((row, LayerEvent::RowStructural(vec![AxisDiff::Deleted(Range::single(row_index))])))
    }

    /// Replace every row. Positions before and after are unrelated.
    pub fn replace_rows(&mut self, rows: Vec<T>) -> LayerEvent {
        self.rows = rows;
        LayerEvent::StructuralRefresh
    }

    /// Reorder rows in place (e.g. a sort). Reported as a refresh.
    pub fn sort_rows_by<F>(&mut self, compare: F) -> LayerEvent
    where
        F: FnMut(&T, &T) -> std::cmp::Ordering,
    {
        self.rows.sort_by(compare);
        LayerEvent::StructuralRefresh
    }
}

impl<T: RowRecord> Layer for DataLayer<T> {
    fn column_count(&self) -> usize {
        self.column_count
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn row_id_at(&self, row_position: usize) -> Option<RowId> {
        self.rows.get(row_position).map(RowRecord::row_id)
    }

    fn do_command(&mut self, _command: &LayerCommand) -> Option<Vec<LayerEvent>> {
        None
    }

    fn handle_layer_event(&mut self, event: LayerEvent) -> Option<LayerEvent> {
        Some(event)
    }
}
