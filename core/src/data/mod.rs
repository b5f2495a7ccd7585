use crate::models::GameStatus;

/// Reveal/flag state of a cell. Revealed and flagged are mutually exclusive
/// by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Hidden,
    Flagged,
    Revealed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Set once at board creation, never changed afterwards.
    pub mine: bool,
    /// Mines among the up to 8 neighbors. Meaningless for mine cells.
    pub adjacent: u8,
    pub state: CellState,
}

/// The board owns the grid: mine layout, per-cell state, adjacency counts,
/// and the derived game status. Cells are stored row-major, index
/// `x + y * width`. A new game is a new `Board` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) mines: usize,
    pub(crate) revealed: usize,
    pub(crate) status: GameStatus,
    pub(crate) cells: Vec<Cell>,
}
