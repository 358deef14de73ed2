//! Scores a position by how well connected the piece just played is

use anyhow::{anyhow, Result};
use static_assertions::*;

use crate::board::{ArrayBoard, Cell, Player};
use crate::{HEIGHT, WIDTH};

/// The score of a move that wins the game outright
pub const WIN_SCORE: u64 = 1_000_000_000;

/// Each extra piece in a run is worth this much more than the one before it
const RUN_STEP: u64 = 4;

const DIRECTION_COUNT: usize = 7;

/// Row and column steps walked away from the new piece
///
/// Straight up is never walked: the piece just played is the top of its column.
const DIRECTIONS: [(i32, i32); DIRECTION_COUNT] = [
    (-1, 0),  // down
    (0, -1),  // left
    (0, 1),   // right
    (1, 1),   // up-right
    (1, -1),  // up-left
    (-1, 1),  // down-right
    (-1, -1), // down-left
];

/// Upper bound of `contiguity_score` on this board size
pub const fn max_contiguity_score() -> u64 {
    let longest = if WIDTH > HEIGHT { WIDTH - 1 } else { HEIGHT - 1 };
    let longest = longest as u64;
    let mut per_direction = 0;
    let mut k = 0;
    while k < longest {
        per_direction += 1 + RUN_STEP * k;
        k += 1;
    }
    per_direction * DIRECTION_COUNT as u64
}

// no amount of connected pieces may be worth as much as a win
const_assert!(max_contiguity_score() < WIN_SCORE);

/// Desirability of the piece `player` just placed at `(row, column)`
///
/// Returns [`WIN_SCORE`] when the move won the game for `player`, otherwise
/// the contiguity score. Fails if the cell is off the board or is not
/// occupied by `player`.
pub fn heuristic(board: &ArrayBoard, row: usize, column: usize, player: Player) -> Result<u64> {
    match board.cell(row, column) {
        None => Err(anyhow!(
            "Cell ({}, {}) is outside the board",
            row,
            column
        )),
        Some(cell) if cell != Cell::from(player) => Err(anyhow!(
            "Cell ({}, {}) does not hold a piece of player {}",
            row,
            column,
            player
        )),
        Some(_) => {
            if board.state().winner() == Some(player) {
                Ok(WIN_SCORE)
            } else {
                Ok(contiguity_score(board, row, column, player))
            }
        }
    }
}

/// Sums the runs of `player` pieces leading away from `(row, column)`
///
/// The k-th piece of a run adds `1 + 4(k - 1)`, so a run of three next to the
/// new piece is worth 1 + 5 + 9. Directions are scored independently.
pub fn contiguity_score(board: &ArrayBoard, row: usize, column: usize, player: Player) -> u64 {
    let player = Cell::from(player);
    let mut contiguous = 0;

    for &(d_row, d_column) in DIRECTIONS.iter() {
        let mut mult = 1;
        let mut curr_row = row as i32 + d_row;
        let mut curr_col = column as i32 + d_column;
        while curr_row >= 0 && curr_col >= 0 {
            match board.cell(curr_row as usize, curr_col as usize) {
                Some(cell) if cell == player => {
                    contiguous += mult;
                    mult += RUN_STEP;
                    curr_row += d_row;
                    curr_col += d_column;
                }
                _ => break,
            }
        }
    }
    contiguous
}
