use std::collections::VecDeque;

use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{debug, info, instrument, warn};

use crate::data::{Board, Cell, CellState};
use crate::error::BoardError;
use crate::models::{CellUpdate, CellView, GameParams, GameStatus, Pos, RevealResult};

fn validate_params(params: &GameParams) -> Result<(), BoardError> {
    if params.width == 0 || params.height == 0 {
        return Err(BoardError::EmptyGrid {
            width: params.width,
            height: params.height,
        });
    }
    Ok(())
}

/// Cells barred from holding a mine: the safe cell and its neighbors.
fn excluded_cells(params: &GameParams) -> Vec<bool> {
    let mut excluded = vec![false; params.width * params.height];
    if let Some(safe) = params.safe_cell
        && safe.x < params.width
        && safe.y < params.height
    {
        excluded[safe.index(params.width)] = true;
        for neighbor in safe.neighbors(params.width, params.height) {
            excluded[neighbor.index(params.width)] = true;
        }
    }
    excluded
}

/// Walk the grid once, placing a mine at each eligible cell with probability
/// (mines left / eligible cells left). Yields exactly `params.mines` mines,
/// uniformly distributed over the eligible cells.
fn generate_mines<R: Rng>(rng: &mut R, params: &GameParams) -> Result<Vec<bool>, BoardError> {
    let length = params.width * params.height;
    let excluded = excluded_cells(params);
    let capacity = excluded.iter().filter(|e| !**e).count();

    // A full grid leaves no safe cell to start from; with a safe zone the
    // zone itself is that guarantee, so only placeability binds.
    if params.mines >= length || params.mines > capacity {
        return Err(BoardError::TooManyMines {
            mines: params.mines,
            capacity,
        });
    }

    let mut mines = Vec::with_capacity(length);
    let mut mines_left = params.mines as u32;
    let mut eligible_left = capacity as u32;
    for index in 0..length {
        if excluded[index] {
            mines.push(false);
            continue;
        }
        let value = rng.random_ratio(mines_left, eligible_left);
        mines.push(value);
        if value {
            mines_left -= 1;
        }
        eligible_left -= 1;
    }

    Ok(mines)
}

fn count_adjacent_mines(mines: &[bool], pos: Pos, width: usize, height: usize) -> u8 {
    pos.neighbors(width, height)
        .filter(|neighbor| mines[neighbor.index(width)])
        .count() as u8
}

fn generate_cells(mines: &[bool], width: usize, height: usize) -> Vec<Cell> {
    mines
        .iter()
        .enumerate()
        .map(|(index, mine)| {
            let pos = Pos {
                x: index % width,
                y: index / width,
            };
            Cell {
                mine: *mine,
                adjacent: count_adjacent_mines(mines, pos, width, height),
                state: CellState::Hidden,
            }
        })
        .collect()
}

impl From<&Cell> for CellView {
    fn from(value: &Cell) -> Self {
        match value.state {
            CellState::Hidden => Self::Hidden,
            CellState::Flagged => Self::Flagged,
            CellState::Revealed if value.mine => Self::Mine,
            CellState::Revealed => Self::Revealed {
                adjacent: value.adjacent,
            },
        }
    }
}

impl Board {
    /// Create a board, seeded from `params.seed` when set.
    pub fn new(params: GameParams) -> Result<Self, BoardError> {
        match params.seed {
            Some(seed) => Self::with_rng(params, &mut StdRng::seed_from_u64(seed)),
            None => Self::with_rng(params, &mut rand::rng()),
        }
    }

    /// Create a board with a caller-supplied RNG.
    #[instrument(level = "trace", skip(rng))]
    pub fn with_rng<R: Rng>(params: GameParams, rng: &mut R) -> Result<Self, BoardError> {
        validate_params(&params)?;
        let layout = generate_mines(rng, &params)?;
        info!(
            "Creating new board: {}x{} with {} mines",
            params.width, params.height, params.mines
        );
        Ok(Self {
            width: params.width,
            height: params.height,
            mines: params.mines,
            revealed: 0,
            status: GameStatus::InProgress,
            cells: generate_cells(&layout, params.width, params.height),
        })
    }

    /// Create a board with an explicit mine layout. Duplicate positions
    /// count once.
    pub fn with_mines(width: usize, height: usize, mines: &[Pos]) -> Result<Self, BoardError> {
        if width == 0 || height == 0 {
            return Err(BoardError::EmptyGrid { width, height });
        }
        let length = width * height;
        let mut layout = vec![false; length];
        for pos in mines {
            if pos.x >= width || pos.y >= height {
                return Err(BoardError::OutOfBounds { pos: *pos });
            }
            layout[pos.index(width)] = true;
        }
        let count = layout.iter().filter(|mine| **mine).count();
        if count >= length {
            return Err(BoardError::TooManyMines {
                mines: count,
                capacity: length,
            });
        }
        debug!("Creating {}x{} board with fixed mine layout", width, height);
        Ok(Self {
            width,
            height,
            mines: count,
            revealed: 0,
            status: GameStatus::InProgress,
            cells: generate_cells(&layout, width, height),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of mines, fixed at creation.
    pub fn mines(&self) -> usize {
        self.mines
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Snapshot of a single cell.
    pub fn cell_at(&self, pos: Pos) -> Result<CellView, BoardError> {
        if !self.validate_pos(pos) {
            return Err(BoardError::OutOfBounds { pos });
        }
        Ok(CellView::from(&self.cells[pos.index(self.width)]))
    }

    /// Full-grid snapshot, one row per inner vector.
    pub fn snapshot(&self) -> Vec<Vec<CellView>> {
        self.cells
            .iter()
            .map(|cell| cell.into())
            .collect::<Vec<CellView>>()
            .chunks(self.width)
            .map(|chunk| chunk.to_vec())
            .collect()
    }

    /// Mine coordinates, available once the game has finished. Feeds the
    /// end-of-game overlays (stray mines, wrong flags, auto-flagging on a
    /// win); during play mines stay hidden.
    pub fn mine_positions(&self) -> Option<Vec<Pos>> {
        if self.status == GameStatus::InProgress {
            return None;
        }
        Some(
            self.cells
                .iter()
                .enumerate()
                .filter(|(_, cell)| cell.mine)
                .map(|(index, _)| Pos {
                    x: index % self.width,
                    y: index / self.width,
                })
                .collect(),
        )
    }

    /// Reveal a cell. Revealing a mine loses the game; revealing a
    /// zero-adjacency cell floods the connected empty region and its
    /// numbered boundary ring. A no-op when the game is over or the cell is
    /// flagged or already revealed.
    #[instrument(level = "trace", skip(self), fields(x = pos.x, y = pos.y))]
    pub fn reveal(&mut self, pos: Pos) -> Result<RevealResult, BoardError> {
        if !self.validate_pos(pos) {
            warn!("Invalid reveal position: ({}, {})", pos.x, pos.y);
            return Err(BoardError::OutOfBounds { pos });
        }
        if self.status != GameStatus::InProgress {
            debug!(
                "Ignoring reveal action on finished game at ({}, {})",
                pos.x, pos.y
            );
            return Ok(self.no_op());
        }
        match self.cells[pos.index(self.width)].state {
            CellState::Flagged => {
                debug!("Ignoring reveal on flagged cell ({}, {})", pos.x, pos.y);
                return Ok(self.no_op());
            }
            CellState::Revealed => return Ok(self.no_op()),
            CellState::Hidden => {}
        }

        let mut updates = Vec::new();
        let mine_hit = self.reveal_hidden(pos, &mut updates);
        if mine_hit.is_none() && self.has_won() {
            info!("Game won, all safe cells revealed");
            self.status = GameStatus::Won;
        }
        Ok(RevealResult {
            updates,
            mine_hit,
            status: self.status,
        })
    }

    /// Reveal every hidden unflagged neighbor of a revealed numbered cell
    /// whose flag count satisfies its number. A wrongly placed flag can
    /// detonate a mine here.
    #[instrument(level = "trace", skip(self), fields(x = pos.x, y = pos.y))]
    pub fn chord(&mut self, pos: Pos) -> Result<RevealResult, BoardError> {
        if !self.validate_pos(pos) {
            warn!("Invalid chord position: ({}, {})", pos.x, pos.y);
            return Err(BoardError::OutOfBounds { pos });
        }
        if self.status != GameStatus::InProgress {
            debug!(
                "Ignoring chord action on finished game at ({}, {})",
                pos.x, pos.y
            );
            return Ok(self.no_op());
        }
        let cell = self.cells[pos.index(self.width)];
        if cell.state != CellState::Revealed || cell.adjacent == 0 {
            return Ok(self.no_op());
        }
        let flagged = pos
            .neighbors(self.width, self.height)
            .filter(|neighbor| self.cells[neighbor.index(self.width)].state == CellState::Flagged)
            .count();
        if flagged < cell.adjacent as usize {
            debug!(
                "Chord at ({}, {}) not satisfied: {} flags for {} mines",
                pos.x, pos.y, flagged, cell.adjacent
            );
            return Ok(self.no_op());
        }

        let mut updates = Vec::new();
        let mut mine_hit = None;
        for neighbor in pos.neighbors(self.width, self.height) {
            if self.cells[neighbor.index(self.width)].state != CellState::Hidden {
                continue;
            }
            mine_hit = self.reveal_hidden(neighbor, &mut updates);
            if mine_hit.is_some() {
                break;
            }
        }
        if mine_hit.is_none() && self.has_won() {
            info!("Game won, all safe cells revealed");
            self.status = GameStatus::Won;
        }
        Ok(RevealResult {
            updates,
            mine_hit,
            status: self.status,
        })
    }

    /// Flip a cell between hidden and flagged. Returns the change, `None`
    /// for no-ops (finished game or revealed cell). Flags never affect win
    /// detection.
    #[instrument(level = "trace", skip(self), fields(x = pos.x, y = pos.y))]
    pub fn toggle_flag(&mut self, pos: Pos) -> Result<Option<CellUpdate>, BoardError> {
        if !self.validate_pos(pos) {
            warn!("Invalid flag position: ({}, {})", pos.x, pos.y);
            return Err(BoardError::OutOfBounds { pos });
        }
        if self.status != GameStatus::InProgress {
            debug!(
                "Ignoring flag action on finished game at ({}, {})",
                pos.x, pos.y
            );
            return Ok(None);
        }
        let cell = &mut self.cells[pos.index(self.width)];
        match cell.state {
            CellState::Hidden => {
                cell.state = CellState::Flagged;
                debug!("Cell ({}, {}) flagged", pos.x, pos.y);
            }
            CellState::Flagged => {
                cell.state = CellState::Hidden;
                debug!("Cell ({}, {}) unflagged", pos.x, pos.y);
            }
            CellState::Revealed => {
                debug!(
                    "Ignoring flag action on revealed cell ({}, {})",
                    pos.x, pos.y
                );
                return Ok(None);
            }
        }
        Ok(Some(CellUpdate {
            pos,
            value: (&*cell).into(),
        }))
    }

    fn validate_pos(&self, pos: Pos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    fn no_op(&self) -> RevealResult {
        RevealResult {
            updates: Vec::new(),
            mine_hit: None,
            status: self.status,
        }
    }

    fn has_won(&self) -> bool {
        self.width * self.height == self.mines + self.revealed
    }

    /// Reveal one hidden cell, flood-filling from zero-adjacency cells.
    /// Returns the position if the cell was a mine, after marking the game
    /// lost. Other mines are left untouched; showing them is a presentation
    /// concern.
    fn reveal_hidden(&mut self, pos: Pos, updates: &mut Vec<CellUpdate>) -> Option<Pos> {
        let index = pos.index(self.width);
        if self.cells[index].mine {
            warn!("Mine hit at ({}, {}) - game over", pos.x, pos.y);
            let cell = &mut self.cells[index];
            cell.state = CellState::Revealed;
            updates.push(CellUpdate {
                pos,
                value: (&*cell).into(),
            });
            self.status = GameStatus::Lost;
            Some(pos)
        } else {
            self.flood_reveal(pos, updates);
            None
        }
    }

    /// Worklist flood fill. Each cell is revealed at most once, guarded by
    /// its own state, so re-enqueued positions fall out on pop. Flagged
    /// cells stop the flood like numbered cells do.
    fn flood_reveal(&mut self, start: Pos, updates: &mut Vec<CellUpdate>) {
        let mut queue = VecDeque::from([start]);
        while let Some(pos) = queue.pop_front() {
            let cell = &mut self.cells[pos.index(self.width)];
            if cell.state != CellState::Hidden {
                continue;
            }
            cell.state = CellState::Revealed;
            updates.push(CellUpdate {
                pos,
                value: (&*cell).into(),
            });
            let adjacent = cell.adjacent;
            self.revealed += 1;
            if adjacent == 0 {
                queue.extend(pos.neighbors(self.width, self.height));
            }
        }
    }
}
