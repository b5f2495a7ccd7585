use std::fmt;

use crate::models::Pos;

/// Errors returned by board construction and cell operations.
///
/// Mutating calls on a finished game are not errors: they return successfully
/// without changing anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    /// Width or height is zero.
    EmptyGrid { width: usize, height: usize },
    /// The mine count leaves no room for a safe cell, or exceeds the number
    /// of cells eligible for placement.
    TooManyMines { mines: usize, capacity: usize },
    /// Coordinate outside the grid.
    OutOfBounds { pos: Pos },
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::EmptyGrid { width, height } => {
                write!(f, "Grid dimensions must be positive, got {width}x{height}")
            }
            BoardError::TooManyMines { mines, capacity } => {
                write!(
                    f,
                    "Cannot place {mines} mines on {capacity} mine-eligible cells"
                )
            }
            BoardError::OutOfBounds { pos } => {
                write!(f, "Position ({}, {}) is outside the grid", pos.x, pos.y)
            }
        }
    }
}

impl std::error::Error for BoardError {}
