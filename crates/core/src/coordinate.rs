use serde::{Deserialize, Serialize};

use crate::range::Range;

/// A cell position in a layer's own position space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PositionCoordinate {
    pub column_position: usize,
    pub row_position: usize,
}

impl PositionCoordinate {
    pub const fn new(column_position: usize, row_position: usize) -> Self {
        Self {
            column_position,
            row_position,
        }
    }
}

impl From<(usize, usize)> for PositionCoordinate {
    /// `(column, row)`.
    fn from((column_position, row_position): (usize, usize)) -> Self {
        Self::new(column_position, row_position)
    }
}

/// An axis-aligned block of cells: columns `[x, x + width)`, rows `[y, y + height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Rectangle {
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self { x, y, width, height }
    }

    /// Single-cell rectangle.
    pub const fn cell(column: usize, row: usize) -> Self {
        Self::new(column, row, 1, 1)
    }

    /// Smallest rectangle containing both corner cells (inclusive), in any order.
    pub fn from_corners(a: PositionCoordinate, b: PositionCoordinate) -> Self {
        let x = a.column_position.min(b.column_position);
        let y = a.row_position.min(b.row_position);
        let right = a.column_position.max(b.column_position);
        let bottom = a.row_position.max(b.row_position);
        Self::new(x, y, (right - x).saturating_add(1), (bottom - y).saturating_add(1))
    }

    pub fn from_ranges(columns: Range, rows: Range) -> Self {
        Self::new(columns.start, rows.start, columns.len(), rows.len())
    }

    /// One past the last column, saturating.
    fn right(&self) -> usize {
        self.x.saturating_add(self.width)
    }

    /// One past the last row, saturating.
    fn bottom(&self) -> usize {
        self.y.saturating_add(self.height)
    }

    pub fn column_range(&self) -> Range {
        Range::with_len(self.x, self.width)
    }

    pub fn row_range(&self) -> Range {
        Range::with_len(self.y, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn cell_count(&self) -> usize {
        self.width.saturating_mul(self.height)
    }

    pub fn contains(&self, column: usize, row: usize) -> bool {
        self.column_range().contains(column) && self.row_range().contains(row)
    }

    /// True if every cell of `other` lies inside `self`.
    pub fn contains_rect(&self, other: &Rectangle) -> bool {
        !other.is_empty()
            && self.x <= other.x
            && self.y <= other.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// The bottom-right cell. Meaningless for an empty rectangle.
    pub fn far_corner(&self) -> PositionCoordinate {
        PositionCoordinate::new(
            self.right().saturating_sub(1),
            self.bottom().saturating_sub(1),
        )
    }

    pub fn origin(&self) -> PositionCoordinate {
        PositionCoordinate::new(self.x, self.y)
    }

    pub fn intersection(&self, other: &Rectangle) -> Option<Rectangle> {
        let columns = self.column_range().intersection(&other.column_range())?;
        let rows = self.row_range().intersection(&other.row_range())?;
        Some(Rectangle::from_ranges(columns, rows))
    }

    /// Smallest rectangle containing both.
    pub fn bounding(&self, other: &Rectangle) -> Rectangle {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rectangle::new(x, y, right - x, bottom - y)
    }

    /// Cells of `self` not in `removed`, as at most four disjoint rectangles
    /// (full-width bands above and below, then the left and right remainders).
    pub fn subtract(&self, removed: &Rectangle) -> Vec<Rectangle> {
        let Some(hole) = self.intersection(removed) else {
            return vec![*self];
        };

        let mut pieces = Vec::with_capacity(4);
        if hole.y > self.y {
            pieces.push(Rectangle::new(self.x, self.y, self.width, hole.y - self.y));
        }
        let self_bottom = self.bottom();
        let hole_bottom = hole.bottom();
        if hole_bottom < self_bottom {
            pieces.push(Rectangle::new(self.x, hole_bottom, self.width, self_bottom - hole_bottom));
        }
        if hole.x > self.x {
            pieces.push(Rectangle::new(self.x, hole.y, hole.x - self.x, hole.height));
        }
        let self_right = self.right();
        let hole_right = hole.right();
        if hole_right < self_right {
            pieces.push(Rectangle::new(hole_right, hole.y, self_right - hole_right, hole.height));
        }
        pieces
    }

    /// Iterate over all cells (row-major order).
    pub fn cells(&self) -> impl Iterator<Item = PositionCoordinate> {
        let columns = self.column_range();
        self.row_range()
            .iter()
            .flat_map(move |row| columns.iter().map(move |col| PositionCoordinate::new(col, row)))
    }
}
