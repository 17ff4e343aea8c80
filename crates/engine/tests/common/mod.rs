#![allow(dead_code)]

use gridsel_config::SelectionSettings;
use gridsel_core::PositionCoordinate;
use gridsel_engine::{DataLayer, RowHideShowLayer, RowId, RowRecord, SelectionLayer};

pub type Stack = SelectionLayer<RowHideShowLayer<DataLayer<FundRow>>>;

/// A fund holding. Identity is the security code, not the row position.
#[derive(Debug, Clone, PartialEq)]
pub struct FundRow {
    pub code: String,
    pub description: String,
    pub rating: String,
    pub ask_price: f64,
    pub bid_price: f64,
}

pub const COLUMN_COUNT: usize = 5;

impl FundRow {
    pub fn new(
        code: &str,
        description: &str,
        rating: &str,
        ask_price: f64,
        bid_price: f64,
    ) -> Self {
        Self {
            code: code.to_string(),
            description: description.to_string(),
            rating: rating.to_string(),
            ask_price,
            bid_price,
        }
    }
}

impl RowRecord for FundRow {
    fn row_id(&self) -> RowId {
        RowId::new(self.code.clone())
    }

    fn field(&self, column: usize) -> Option<String> {
        match column {
            0 => Some(self.code.clone()),
            1 => Some(self.description.clone()),
            2 => Some(self.rating.clone()),
            3 => Some(format!("{:.2}", self.ask_price)),
            4 => Some(format!("{:.2}", self.bid_price)),
            _ => None,
        }
    }
}

pub fn fund_rows() -> Vec<FundRow> {
    vec![
        FundRow::new("US02079K3059", "A Alphabet Co.", "AAA", 1.00, 0.98),
        FundRow::new("US3453708600", "B Ford Motor", "AA", 2.10, 2.05),
        FundRow::new("US3696043013", "C General Electric", "AAA", 3.40, 3.35),
        FundRow::new("US4282361033", "D Hewlett Packard", "B", 4.75, 4.70),
        FundRow::new("US4592001014", "E IBM Corp", "AA", 5.00, 4.90),
        FundRow::new("US46625H1005", "F JP Morgan", "BBB", 6.20, 6.10),
        FundRow::new("US50076Q1067", "G Kraft Foods", "A", 7.15, 7.05),
    ]
}

/// 7 rows by 5 columns, default model.
pub fn fund_stack() -> Stack {
    SelectionLayer::new(RowHideShowLayer::new(DataLayer::new(fund_rows(), COLUMN_COUNT)))
}

pub fn fund_stack_with(settings: &SelectionSettings) -> Stack {
    SelectionLayer::with_settings(
        RowHideShowLayer::new(DataLayer::new(fund_rows(), COLUMN_COUNT)),
        settings,
    )
}

/// Plain numbered row for the 10 x 10 grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRow(pub usize);

impl RowRecord for GridRow {
    fn row_id(&self) -> RowId {
        RowId::from(self.0 as u64)
    }

    fn field(&self, column: usize) -> Option<String> {
        (column < 10).then(|| format!("{},{}", column, self.0))
    }
}

pub type GridStack = SelectionLayer<RowHideShowLayer<DataLayer<GridRow>>>;

/// 10 x 10 grid for region arithmetic.
pub fn grid_stack() -> GridStack {
    let rows = (0..10).map(GridRow).collect();
    SelectionLayer::new(RowHideShowLayer::new(DataLayer::new(rows, 10)))
}

pub fn at(column: usize, row: usize) -> PositionCoordinate {
    PositionCoordinate::new(column, row)
}

/// Row position whose description column reads `description`.
pub fn position_of(stack: &Stack, description: &str) -> Option<usize> {
    let hide_show = stack.underlying();
    (0..gridsel_engine::Layer::row_count(hide_show)).find(|&position| {
        hide_show
            .row_index_by_position(position)
            .and_then(|index| hide_show.underlying().data_value(1, index))
            .is_some_and(|value| value == description)
    })
}
