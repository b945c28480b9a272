//! Spawner module - piece preview and spawn placement
//!
//! The spawner owns the piece RNG and the one-piece preview. Spawning
//! promotes the preview to a fresh piece at the spawn origin. When that
//! placement already overlaps the stack the game is topped out; the preview
//! is left unchanged in that case.

use crate::board::Board;
use crate::collision::collides;
use crate::pieces::Tetromino;
use crate::rng::{random_piece, SimpleRng};
use crate::types::PieceKind;

/// Outcome of a spawn attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOutcome {
    Spawned(Tetromino),
    /// The spawn placement overlaps occupied cells
    ToppedOut,
}

#[derive(Debug, Clone)]
pub struct Spawner {
    rng: SimpleRng,
    next: PieceKind,
}

impl Spawner {
    /// Create a spawner and roll the first preview piece
    pub fn new(seed: u32) -> Self {
        let mut rng = SimpleRng::new(seed);
        let next = random_piece(&mut rng);
        Self { rng, next }
    }

    /// The piece that will spawn next
    pub fn next(&self) -> PieceKind {
        self.next
    }

    /// Replace the preview piece
    pub fn set_next(&mut self, kind: PieceKind) {
        self.next = kind;
    }

    /// Roll a new preview without spawning
    pub fn reroll(&mut self) {
        self.next = random_piece(&mut self.rng);
    }

    /// Try to spawn the preview piece onto `board`.
    ///
    /// On success the preview advances to a new random kind.
    pub fn spawn(&mut self, board: &Board) -> SpawnOutcome {
        let piece = Tetromino::new(self.next);
        if collides(board, &piece, 0, 0, 0) {
            return SpawnOutcome::ToppedOut;
        }
        self.reroll();
        SpawnOutcome::Spawned(piece)
    }
}

impl Default for Spawner {
    fn default() -> Self {
        Self::new(1)
    }
}
