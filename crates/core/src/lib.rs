//! Core types shared by the selection engine: half-open ranges, cell
//! coordinates and rectangles.

pub mod coordinate;
pub mod range;

pub use coordinate::{PositionCoordinate, Rectangle};
pub use range::{covers, merge_ranges, ranges_from_positions, subtract_range, Range};
