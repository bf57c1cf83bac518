use thiserror::Error;

use crate::{CellCount, Point2D};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("Coordinates {0} are outside the grid")]
    OutOfBounds(Point2D),
    #[error("Mine count does not fit in the grid")]
    InvalidMineCount,
    #[error("Mine layout placed {actual} mines, {expected} were requested")]
    InconsistentMineCount { expected: CellCount, actual: CellCount },
    #[error("Close-mine count is undefined for a mined cell")]
    InvalidOperation,
    #[error("Grid is already filled with mines")]
    AlreadyFilled,
    #[error("Grid must be at least 1x1")]
    InvalidSize,
    #[error("Stored cells do not match the grid size")]
    InvalidShape,
}

pub type Result<T> = core::result::Result<T, GridError>;
