//! Game state module - the falling-block half of a session
//!
//! Ties together the board, the spawner and scoring. It applies piece
//! actions and runs the landing sequence; it knows nothing about questions.
//! When a landing clears lines the state pauses itself (`is_playing` goes
//! false) and leaves the piece slot empty, so the owner can run a quiz
//! round before spawning again.

use tracing::debug;

use crate::board::Board;
use crate::collision::{collides, drop_distance};
use crate::pieces::Tetromino;
use crate::scoring::{apply_score_delta, hard_drop_bonus, score_for_lines};
use crate::spawner::{SpawnOutcome, Spawner};
use crate::types::{GameAction, PieceKind, STARTING_LEVEL};

/// Summary of a landing, returned when a piece locks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockEvent {
    pub kind: PieceKind,
    pub lines_cleared: u32,
    /// Line clear points at the current level
    pub line_score: u32,
    /// Rows travelled by a hard drop (0 for soft drops)
    pub drop_distance: u32,
    pub hard_drop: bool,
    /// Whether a follow-up piece spawned; false after clears and top-outs
    pub spawned: bool,
    pub topped_out: bool,
}

/// What happened to an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Not accepted in the current state (paused, no piece, game over)
    Ignored,
    /// Rejected by collision; nothing changed
    Blocked,
    /// The piece moved or rotated
    Moved,
    /// The piece locked into the board
    Locked(LockEvent),
}

/// Complete falling-block state
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    active: Option<Tetromino>,
    spawner: Spawner,
    score: u32,
    level: u32,
    lines: u32,
    lines_in_level: u32,
    game_over: bool,
    is_playing: bool,
}

impl GameState {
    /// Create a new game with the given RNG seed
    pub fn new(seed: u32) -> Self {
        Self {
            board: Board::new(),
            active: None,
            spawner: Spawner::new(seed),
            score: 0,
            level: STARTING_LEVEL,
            lines: 0,
            lines_in_level: 0,
            game_over: false,
            is_playing: false,
        }
    }

    /// Back to an empty board and zeroed counters.
    ///
    /// The RNG keeps running, so the preview piece is re-rolled rather than
    /// replayed from the seed.
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.active = None;
        self.score = 0;
        self.level = STARTING_LEVEL;
        self.lines = 0;
        self.lines_in_level = 0;
        self.game_over = false;
        self.is_playing = false;
        self.spawner.reroll();
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Replace the board, e.g. to set up a scenario
    pub fn set_board(&mut self, board: Board) {
        self.board = board;
    }

    pub fn active(&self) -> Option<Tetromino> {
        self.active
    }

    pub fn next_piece(&self) -> PieceKind {
        self.spawner.next()
    }

    /// Force the preview piece
    pub fn set_next_piece(&mut self, kind: PieceKind) {
        self.spawner.set_next(kind);
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn lines_in_level(&self) -> u32 {
        self.lines_in_level
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.is_playing = playing;
    }

    /// Add a signed delta to the score, flooring at zero
    pub fn add_points(&mut self, delta: i32) {
        self.score = apply_score_delta(self.score, delta);
    }

    /// Spawn the preview piece.
    ///
    /// Returns false on top-out: `game_over` is set, play stops and the
    /// piece slot stays empty.
    pub fn spawn_piece(&mut self) -> bool {
        match self.spawner.spawn(&self.board) {
            SpawnOutcome::Spawned(piece) => {
                self.active = Some(piece);
                true
            }
            SpawnOutcome::ToppedOut => {
                debug!(next = self.spawner.next().as_str(), "spawn blocked, topping out");
                self.active = None;
                self.game_over = true;
                self.is_playing = false;
                false
            }
        }
    }

    /// Row the active piece would land on
    pub fn ghost_y(&self) -> Option<i8> {
        let active = self.active?;
        Some(active.y + drop_distance(&self.board, &active) as i8)
    }

    /// Apply a game action
    pub fn apply_action(&mut self, action: GameAction) -> ActionOutcome {
        if !self.is_playing || self.game_over {
            return ActionOutcome::Ignored;
        }
        let Some(active) = self.active else {
            return ActionOutcome::Ignored;
        };

        match action {
            GameAction::MoveLeft => self.try_shift(active, -1, 0, 0),
            GameAction::MoveRight => self.try_shift(active, 1, 0, 0),
            GameAction::Rotate => self.try_shift(active, 0, 0, 1),
            GameAction::SoftDrop => {
                if collides(&self.board, &active, 0, 1, 0) {
                    ActionOutcome::Locked(self.land(active, 0, false))
                } else {
                    self.active = Some(active.shifted(0, 1, 0));
                    ActionOutcome::Moved
                }
            }
            GameAction::HardDrop => {
                let distance = drop_distance(&self.board, &active);
                let landed = active.shifted(0, distance as i8, 0);
                ActionOutcome::Locked(self.land(landed, distance, true))
            }
        }
    }

    fn try_shift(&mut self, active: Tetromino, dx: i8, dy: i8, drot: u8) -> ActionOutcome {
        if collides(&self.board, &active, dx, dy, drot) {
            return ActionOutcome::Blocked;
        }
        self.active = Some(active.shifted(dx, dy, drot));
        ActionOutcome::Moved
    }

    /// Lock `piece`, clear lines, score, then either pause for a question
    /// (lines cleared) or spawn the next piece.
    fn land(&mut self, piece: Tetromino, distance: u32, hard_drop: bool) -> LockEvent {
        let placed = self.board.place(&piece);
        let cleared = placed.clear_lines();
        self.board = cleared.board;
        self.active = None;

        let lines_cleared = cleared.lines_cleared;
        let line_score = score_for_lines(lines_cleared, self.level);
        let bonus = if hard_drop { hard_drop_bonus(distance) } else { 0 };
        self.score = self.score.saturating_add(line_score).saturating_add(bonus);
        self.lines += lines_cleared;
        self.lines_in_level += lines_cleared;

        let mut event = LockEvent {
            kind: piece.kind,
            lines_cleared,
            line_score,
            drop_distance: distance,
            hard_drop,
            spawned: false,
            topped_out: false,
        };

        if lines_cleared > 0 {
            debug!(lines = lines_cleared, score = self.score, "lines cleared");
            self.is_playing = false;
        } else {
            event.spawned = self.spawn_piece();
            event.topped_out = !event.spawned;
        }
        event
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}
