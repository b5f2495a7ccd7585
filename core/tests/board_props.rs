use std::collections::HashSet;

use minesweeper_core::{Board, CellView, GameParams, GameStatus, Pos};
use proptest::prelude::*;

fn seeded(width: usize, height: usize, mines: usize, seed: u64) -> Board {
    Board::new(GameParams {
        width,
        height,
        mines,
        seed: Some(seed),
        safe_cell: None,
    })
    .unwrap()
}

/// Reveal cells in row-major order until the game finishes one way or the
/// other.
fn play_out(board: &mut Board) {
    for y in 0..board.height() {
        for x in 0..board.width() {
            if board.status() != GameStatus::InProgress {
                return;
            }
            board.reveal(Pos { x, y }).unwrap();
        }
    }
}

fn config() -> impl Strategy<Value = (usize, usize, usize, u64)> {
    (1usize..=12, 1usize..=12, any::<u64>()).prop_flat_map(|(width, height, seed)| {
        (Just(width), Just(height), 0..width * height, Just(seed))
    })
}

fn config_with_pos() -> impl Strategy<Value = (usize, usize, usize, u64, Pos)> {
    config().prop_flat_map(|(width, height, mines, seed)| {
        (0..width, 0..height).prop_map(move |(x, y)| (width, height, mines, seed, Pos { x, y }))
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn mine_count_matches_params((width, height, mines, seed) in config()) {
        let mut board = seeded(width, height, mines, seed);
        play_out(&mut board);
        prop_assert_ne!(board.status(), GameStatus::InProgress);

        let positions = board.mine_positions().unwrap();
        prop_assert_eq!(positions.len(), mines);
        let distinct: HashSet<Pos> = positions.iter().copied().collect();
        prop_assert_eq!(distinct.len(), mines);
        for pos in positions {
            prop_assert!(pos.x < width && pos.y < height);
        }
    }

    #[test]
    fn revealed_counts_match_mine_layout((width, height, mines, seed) in config()) {
        let mut board = seeded(width, height, mines, seed);
        play_out(&mut board);

        let mine_set: HashSet<Pos> = board.mine_positions().unwrap().into_iter().collect();
        for (y, row) in board.snapshot().iter().enumerate() {
            for (x, view) in row.iter().enumerate() {
                if let CellView::Revealed { adjacent } = view {
                    let expected = Pos { x, y }
                        .neighbors(width, height)
                        .filter(|neighbor| mine_set.contains(neighbor))
                        .count();
                    prop_assert_eq!(*adjacent as usize, expected);
                }
            }
        }
    }

    #[test]
    fn flag_toggle_round_trips((width, height, mines, seed, pos) in config_with_pos()) {
        let mut board = seeded(width, height, mines, seed);
        let before = board.snapshot();
        board.toggle_flag(pos).unwrap();
        board.toggle_flag(pos).unwrap();
        prop_assert_eq!(board.snapshot(), before);
        prop_assert_eq!(board.status(), GameStatus::InProgress);
    }

    #[test]
    fn reveal_is_idempotent((width, height, mines, seed, pos) in config_with_pos()) {
        let mut board = seeded(width, height, mines, seed);
        board.reveal(pos).unwrap();
        let snapshot = board.snapshot();
        let result = board.reveal(pos).unwrap();
        prop_assert!(result.updates.is_empty());
        prop_assert_eq!(board.snapshot(), snapshot);
    }

    #[test]
    fn safe_cell_reveal_opens_an_empty_region(
        (width, height, seed, pos) in (2usize..=12, 2usize..=12, any::<u64>())
            .prop_flat_map(|(width, height, seed)| {
                (0..width, 0..height)
                    .prop_map(move |(x, y)| (width, height, seed, Pos { x, y }))
            }),
    ) {
        // The safe zone covers at most 9 cells, so this count always fits.
        let mines = (width * height).saturating_sub(9);
        let mut board = Board::new(GameParams {
            width,
            height,
            mines,
            seed: Some(seed),
            safe_cell: Some(pos),
        })
        .unwrap();

        let result = board.reveal(pos).unwrap();
        prop_assert_ne!(result.status, GameStatus::Lost);
        prop_assert_eq!(
            result.updates[0].value,
            CellView::Revealed { adjacent: 0 }
        );
    }
}
