//! Grid error type.

use thiserror::Error;

use gn_core::{GridPoint, Size};

/// Errors produced by `gn-grid`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("cell {cell} is outside the {size} grid")]
    OutOfRange { cell: GridPoint, size: Size<i32> },

    #[error("grid size {0} has zero area")]
    InvalidSize(Size<i32>),

    #[error("release of cell {0} without a matching reserve")]
    ReservationMismatch(GridPoint),
}

pub type GridResult<T> = Result<T, GridError>;
