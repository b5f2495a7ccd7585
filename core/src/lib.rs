//! Board model and game rules for single-player minesweeper.
//!
//! A [`Board`] owns the grid: mine layout, per-cell reveal/flag state,
//! adjacency counts, and the derived [`GameStatus`]. The presentation layer
//! drives it one operation at a time and redraws from the returned
//! [`CellUpdate`]s or a full [`Board::snapshot`].
//!
//! ```rust
//! use minesweeper_core::{Board, GameParams, GameStatus, Pos};
//!
//! let params = GameParams {
//!     width: 5,
//!     height: 5,
//!     mines: 0,
//!     ..GameParams::default()
//! };
//! let mut board = Board::new(params)?;
//! let result = board.reveal(Pos { x: 2, y: 2 })?;
//! assert_eq!(result.status, GameStatus::Won);
//! # Ok::<(), minesweeper_core::BoardError>(())
//! ```

pub mod data;
pub mod error;
pub mod logic;
pub mod models;

pub use data::{Board, Cell, CellState};
pub use error::BoardError;
pub use models::{CellUpdate, CellView, GameParams, GameStatus, Pos, RevealResult};
