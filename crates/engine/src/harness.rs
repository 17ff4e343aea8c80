//! Test harness for layer stacks with event tracking.
//!
//! This module provides:
//! - `NumberRow`, a row object whose identity is its id and whose cells
//!   read `"<id>:<column>"`
//! - `numbers_layer`, a data layer of `NumberRow`s with ids `0..rows`
//! - `selection_stack`, the full selection / hide-show / data stack
//!
//! Use this harness to test selection behaviour without a UI.

use crate::data::{DataLayer, RowRecord};
use crate::hide_show::RowHideShowLayer;
use crate::layer::RowId;
use crate::selection::SelectionLayer;

pub type TestStack = SelectionLayer<RowHideShowLayer<DataLayer<NumberRow>>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberRow {
    pub id: u64,
    pub values: Vec<String>,
}

impl NumberRow {
    pub fn new(id: u64, columns: usize) -> Self {
        Self {
            id,
            values: (0..columns).map(|c| format!("{id}:{c}")).collect(),
        }
    }
}

impl RowRecord for NumberRow {
    fn row_id(&self) -> RowId {
        RowId::from(self.id)
    }

    fn field(&self, column: usize) -> Option<String> {
        self.values.get(column).cloned()
    }
}

pub fn numbers_layer(columns: usize, rows: usize) -> DataLayer<NumberRow> {
    let rows = (0..rows as u64).map(|id| NumberRow::new(id, columns)).collect();
    DataLayer::new(rows, columns)
}

pub fn selection_stack(columns: usize, rows: usize) -> TestStack {
    SelectionLayer::new(RowHideShowLayer::new(numbers_layer(columns, rows)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::Layer;

    #[test]
    fn test_numbers_layer_values() {
        let grid = numbers_layer(3, 4);
        assert_eq!(grid.row_count(), 4);
        assert_eq!(grid.data_value(2, 1), Some("1:2".to_string()));
        assert_eq!(grid.data_value(3, 1), None);
        assert_eq!(grid.row_id_at(3), Some(RowId::from(3)));
    }
}
