use crate::board::cell_code;
use crate::pieces::Tetromino;
use crate::types::{Phase, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};
use crate::Question;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl From<Tetromino> for ActiveSnapshot {
    fn from(value: Tetromino) -> Self {
        Self {
            kind: value.kind,
            rotation: value.rotation,
            x: value.x,
            y: value.y,
        }
    }
}

impl ActiveSnapshot {
    /// Absolute cells of the piece
    pub fn cells(&self) -> [(i8, i8); 4] {
        Tetromino::at(self.kind, self.rotation, self.x, self.y).cells()
    }
}

/// Read-only view of a session for presentation layers.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    /// Locked cells only: 0 for empty, 1..=7 by piece kind
    pub board: [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
    pub active: Option<ActiveSnapshot>,
    pub ghost_y: Option<i8>,
    pub next: PieceKind,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub lines_in_level: u32,
    pub phase: Phase,
    pub is_playing: bool,
    pub game_over: bool,
    pub questions_answered: u32,
    pub total_questions: u32,
    pub game_time_secs: u32,
    /// The question on screen, if one has been delivered
    pub question: Option<Question>,
}

impl SessionSnapshot {
    /// Board with the active piece drawn over it
    pub fn composited_board(&self) -> [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize] {
        let mut out = self.board;
        if let Some(active) = self.active {
            let code = cell_code(Some(active.kind));
            for (x, y) in active.cells() {
                if (0..BOARD_WIDTH as i8).contains(&x) && (0..BOARD_HEIGHT as i8).contains(&y) {
                    out[y as usize][x as usize] = code;
                }
            }
        }
        out
    }

    /// Whether the session is waiting on a question fetch
    pub fn awaiting_question(&self) -> bool {
        self.phase == Phase::Question && self.question.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_snapshot() -> SessionSnapshot {
        SessionSnapshot {
            board: [[0u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            active: None,
            ghost_y: None,
            next: PieceKind::I,
            score: 0,
            level: 1,
            lines: 0,
            lines_in_level: 0,
            phase: Phase::Menu,
            is_playing: false,
            game_over: false,
            questions_answered: 0,
            total_questions: 5,
            game_time_secs: 0,
            question: None,
        }
    }

    #[test]
    fn test_composited_board_overlays_active_piece() {
        let mut snap = empty_snapshot();
        snap.active = Some(ActiveSnapshot {
            kind: PieceKind::O,
            rotation: Rotation::North,
            x: 0,
            y: -1,
        });
        let grid = snap.composited_board();
        assert_eq!(grid[0][0], 2);
        assert_eq!(grid[0][1], 2);
        assert_eq!(grid[1][0], 0);
        assert_eq!(snap.board[0][0], 0);
    }

    #[test]
    fn test_awaiting_question() {
        let mut snap = empty_snapshot();
        assert!(!snap.awaiting_question());
        snap.phase = Phase::Question;
        assert!(snap.awaiting_question());
    }
}
