use std::time::{Duration, Instant};

use eframe::egui;
use egui::{Color32, RichText, Stroke, Vec2};
use tracing::{debug, warn};

use minesweeper_core::{Board, BoardError, CellView, GameParams, GameStatus, Pos};

const CELL_SIZE: f32 = 26.0;
/// Upper bound on mine density when starting a new game, as in classic
/// boards; anything denser is barely playable.
const MAX_MINE_PERCENT: usize = 35;

const CLOSED_FILL: Color32 = Color32::from_gray(175);
const OPEN_FILL: Color32 = Color32::from_gray(230);
const DETONATED_FILL: Color32 = Color32::from_rgb(239, 68, 68);
const FLAG_COLOR: Color32 = Color32::from_rgb(198, 40, 40);

pub struct MinesweeperApp {
    /// Parameters edited in the controls row.
    pending: GameParams,
    /// Parameters the current board was built from.
    active: GameParams,
    board: Board,
    /// Set by the first reveal; the timer runs from here.
    started: Option<Instant>,
    finished_after: Option<Duration>,
}

impl MinesweeperApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Result<Self, BoardError> {
        let params = GameParams::default();
        Ok(Self {
            pending: params,
            active: params,
            board: Board::new(params)?,
            started: None,
            finished_after: None,
        })
    }

    fn new_game(&mut self) {
        self.pending.mines = clamp_mines(self.pending.width, self.pending.height, self.pending.mines);
        match Board::new(self.pending) {
            Ok(board) => {
                self.active = self.pending;
                self.board = board;
                self.started = None;
                self.finished_after = None;
            }
            Err(err) => warn!("Rejected game parameters: {}", err),
        }
    }

    /// The first reveal regenerates the board with a safe zone around the
    /// clicked cell, carrying over any flags placed beforehand.
    fn reseat_mines(&mut self, safe: Pos) {
        let mut params = self.active;
        params.safe_cell = Some(safe);
        match Board::new(params) {
            Ok(mut board) => {
                for (y, row) in self.board.snapshot().iter().enumerate() {
                    for (x, view) in row.iter().enumerate() {
                        if *view == CellView::Flagged {
                            let _ = board.toggle_flag(Pos { x, y });
                        }
                    }
                }
                self.board = board;
            }
            // Too many mines to clear a zone here; the eager layout stands.
            Err(err) => debug!("Keeping eager mine layout: {}", err),
        }
    }

    fn click(&mut self, pos: Pos, view: CellView) {
        let result = match view {
            CellView::Revealed { .. } => self.board.chord(pos),
            _ => {
                if self.started.is_none() && view == CellView::Hidden {
                    self.reseat_mines(pos);
                    self.started = Some(Instant::now());
                }
                self.board.reveal(pos)
            }
        };
        if let Ok(result) = result
            && result.status != GameStatus::InProgress
            && self.finished_after.is_none()
        {
            self.finished_after = Some(self.started.map(|at| at.elapsed()).unwrap_or_default());
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Width");
            ui.add(egui::DragValue::new(&mut self.pending.width).range(2..=40));
            ui.label("Height");
            ui.add(egui::DragValue::new(&mut self.pending.height).range(2..=30));
            ui.label("Mines");
            ui.add(egui::DragValue::new(&mut self.pending.mines).range(1..=400));
            if ui.button("New game").clicked() {
                self.new_game();
            }
        });
    }

    fn grid(&mut self, ui: &mut egui::Ui) {
        let snapshot = self.board.snapshot();
        let status = self.board.status();
        let mines = self.board.mine_positions();

        ui.spacing_mut().item_spacing = Vec2::splat(2.0);
        for (y, row) in snapshot.iter().enumerate() {
            ui.horizontal(|ui| {
                for (x, view) in row.iter().enumerate() {
                    let pos = Pos { x, y };
                    let (text, fill, text_color) =
                        cell_style(*view, status, mines.as_deref(), pos);
                    let button = egui::Button::new(
                        RichText::new(text).size(13.0).strong().color(text_color),
                    )
                    .min_size(Vec2::splat(CELL_SIZE))
                    .fill(fill)
                    .stroke(Stroke::new(1.0, Color32::from_gray(120)));

                    let resp = ui.add(button);
                    if resp.clicked_by(egui::PointerButton::Primary) {
                        self.click(pos, *view);
                    }
                    if resp.clicked_by(egui::PointerButton::Secondary) {
                        let _ = self.board.toggle_flag(pos);
                    }
                }
            });
        }
    }

    fn status_line(&self, ui: &mut egui::Ui) {
        let elapsed = self
            .finished_after
            .or_else(|| self.started.map(|at| at.elapsed()))
            .unwrap_or_default();
        let secs = elapsed.as_secs();

        ui.horizontal(|ui| {
            ui.label(format!(
                "{}:{:02}:{:02}",
                secs / 3600,
                (secs % 3600) / 60,
                secs % 60
            ));
            ui.separator();
            let text = match self.board.status() {
                GameStatus::InProgress => {
                    RichText::new(format!("{} mines", self.board.mines()))
                }
                GameStatus::Won => RichText::new("Cleared!").color(Color32::from_rgb(56, 142, 60)),
                GameStatus::Lost => RichText::new("Boom.").color(DETONATED_FILL),
            };
            ui.label(text);
        });
    }
}

impl eframe::App for MinesweeperApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("controls").show(ctx, |ui| self.controls(ui));
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| self.status_line(ui));
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::both().show(ui, |ui| self.grid(ui));
        });

        // Keep the clock moving while a game is running.
        if self.started.is_some() && self.board.status() == GameStatus::InProgress {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }
}

fn clamp_mines(width: usize, height: usize, mines: usize) -> usize {
    let cap = (width * height * MAX_MINE_PERCENT / 100).max(1);
    mines.clamp(1, cap)
}

/// Display text, fill and text color for one cell. End-of-game overlays live
/// here: stray mines and wrong flags after a loss, flags on every mine after
/// a win. The board itself is never touched for these.
fn cell_style(
    view: CellView,
    status: GameStatus,
    mines: Option<&[Pos]>,
    pos: Pos,
) -> (String, Color32, Color32) {
    let is_mine = mines.is_some_and(|mines| mines.contains(&pos));
    match view {
        CellView::Hidden if status == GameStatus::Lost && is_mine => {
            ("💣".to_string(), CLOSED_FILL, Color32::BLACK)
        }
        CellView::Hidden if status == GameStatus::Won && is_mine => {
            ("🚩".to_string(), CLOSED_FILL, FLAG_COLOR)
        }
        CellView::Hidden => (String::new(), CLOSED_FILL, Color32::BLACK),
        CellView::Flagged if status == GameStatus::Lost && !is_mine => {
            ("✖".to_string(), CLOSED_FILL, Color32::BLACK)
        }
        CellView::Flagged => ("🚩".to_string(), CLOSED_FILL, FLAG_COLOR),
        CellView::Revealed { adjacent: 0 } => (String::new(), OPEN_FILL, Color32::BLACK),
        CellView::Revealed { adjacent } => {
            (adjacent.to_string(), OPEN_FILL, digit_color(adjacent))
        }
        CellView::Mine => ("💣".to_string(), DETONATED_FILL, Color32::BLACK),
    }
}

/// Classic per-digit colors.
fn digit_color(adjacent: u8) -> Color32 {
    match adjacent {
        1 => Color32::from_rgb(25, 118, 210),
        2 => Color32::from_rgb(56, 142, 60),
        3 => Color32::from_rgb(211, 47, 47),
        4 => Color32::from_rgb(48, 63, 159),
        5 => Color32::from_rgb(128, 0, 0),
        6 => Color32::from_rgb(0, 128, 128),
        7 => Color32::BLACK,
        _ => Color32::from_gray(100),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mines_are_clamped_to_density_cap() {
        assert_eq!(clamp_mines(10, 10, 50), 35);
        assert_eq!(clamp_mines(10, 10, 0), 1);
        assert_eq!(clamp_mines(9, 9, 10), 10);
        // Tiny boards still allow a single mine.
        assert_eq!(clamp_mines(2, 2, 1), 1);
    }

    #[test]
    fn lost_overlay_marks_stray_mines_and_wrong_flags() {
        let mines = [Pos { x: 1, y: 1 }];
        let (text, _, _) = cell_style(
            CellView::Hidden,
            GameStatus::Lost,
            Some(&mines),
            Pos { x: 1, y: 1 },
        );
        assert_eq!(text, "💣");
        let (text, _, _) = cell_style(
            CellView::Flagged,
            GameStatus::Lost,
            Some(&mines),
            Pos { x: 0, y: 0 },
        );
        assert_eq!(text, "✖");
    }

    #[test]
    fn won_overlay_flags_remaining_mines() {
        let mines = [Pos { x: 1, y: 1 }];
        let (text, _, _) = cell_style(
            CellView::Hidden,
            GameStatus::Won,
            Some(&mines),
            Pos { x: 1, y: 1 },
        );
        assert_eq!(text, "🚩");
    }
}
