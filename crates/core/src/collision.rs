//! Collision module - legality of candidate piece placements
//!
//! A candidate is the active piece translated by `(dx, dy)` and rotated by
//! `drot` steps. It is illegal when any of its cells
//!
//! - leaves the board horizontally (`x < 0` or `x >= 10`),
//! - sits at or below the floor (`y >= 20`), or
//! - lands on an occupied cell inside the board.
//!
//! Cells above the top edge (`y < 0`) are legal, so pieces can rotate or
//! spawn partially off-screen.

use crate::board::Board;
use crate::pieces::Tetromino;
use crate::types::{BOARD_HEIGHT, BOARD_WIDTH};

/// Returns `true` when the shifted/rotated candidate is illegal.
pub fn collides(board: &Board, piece: &Tetromino, dx: i8, dy: i8, drot: u8) -> bool {
    let candidate = piece.shifted(dx, dy, drot);
    candidate.cells().iter().any(|&(x, y)| {
        if x < 0 || x >= BOARD_WIDTH as i8 || y >= BOARD_HEIGHT as i8 {
            return true;
        }
        y >= 0 && board.is_occupied(x, y)
    })
}

/// Number of rows the piece can fall before it rests on something.
pub fn drop_distance(board: &Board, piece: &Tetromino) -> u32 {
    let mut distance: i8 = 0;
    while !collides(board, piece, 0, distance + 1, 0) {
        distance += 1;
    }
    distance as u32
}

/// Whether the piece cannot move down one row.
pub fn is_grounded(board: &Board, piece: &Tetromino) -> bool {
    collides(board, piece, 0, 1, 0)
}
