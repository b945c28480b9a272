//! High-score persistence.
//!
//! The session only needs to know whether a score would qualify and to record
//! it once a run ends. Ranking rules live in [`Leaderboard`]; where the entries
//! are kept is a [`ScoreStore`] backend (in memory, or a JSON file).
//!
//! Ordering is by score descending, then earliest timestamp first, and at most
//! [`LEADERBOARD_SIZE`](tetris_training_types::LEADERBOARD_SIZE) entries are
//! retained.

pub mod entry;
pub mod error;
pub mod format;
pub mod leaderboard;
pub mod store;

pub use tetris_training_types as types;

pub use entry::{HighScoreEntry, RecordOutcome};
pub use error::ScoreError;
pub use format::{format_rank, format_score};
pub use leaderboard::{Leaderboard, ScorePersistence};
pub use store::{JsonFileStore, MemoryStore, ScoreStore};
