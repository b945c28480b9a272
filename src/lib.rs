//! Tetris training (workspace facade crate).
//!
//! Re-exports the member crates under short names so binaries, integration
//! tests and benchmarks can use `tetris_training::{core, quiz, ...}` while the
//! implementation lives in dedicated crates under `crates/`.

pub use tetris_training_core as core;
pub use tetris_training_input as input;
pub use tetris_training_leaderboard as leaderboard;
pub use tetris_training_quiz as quiz;
pub use tetris_training_runtime as runtime;
pub use tetris_training_types as types;
