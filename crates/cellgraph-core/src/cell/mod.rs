//! Cell-related types
//!
//! This module contains:
//! - [`CellAddress`] - A cell's location within one sheet (e.g., "A1")
//! - [`CellCoord`] and [`CellRange`] - Sheet-qualified locations and blocks
//! - [`Cell`] and [`CellKind`] - What a cell holds

mod address;
mod coord;
mod value;

pub use address::CellAddress;
pub use coord::{CellCoord, CellRange};
pub use value::{Cell, CellKind};
