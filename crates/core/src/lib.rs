//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the rules of the training game: the falling-block
//! engine and the session phase machine that interleaves it with quiz
//! rounds. It performs no I/O itself; questions, high scores and sound reach
//! it through the ports in [`tetris_training_quiz`], [`tetris_training_leaderboard`]
//! and [`sound`].
//!
//! # Module Structure
//!
//! - [`pieces`]: shape table and the falling [`Tetromino`]
//! - [`collision`]: legality of candidate placements
//! - [`board`]: 10x20 grid with placement and line clearing
//! - [`rng`] and [`spawner`]: uniform piece generation and top-out detection
//! - [`scoring`]: line, hard drop and answer points
//! - [`game_state`]: actions and the landing sequence
//! - [`session`]: menu, question, playing, game over and game complete
//! - [`snapshot`]: read-only view for renderers
//!
//! # Game Rules
//!
//! - **Uniform randomizer**: every spawn is an independent draw over the seven kinds
//! - **Simple rotation**: rotation swaps in the next shape; no wall kicks
//! - **Immediate lock**: a piece locks as soon as a downward step is blocked
//! - **Quiz interrupts**: any line clear pauses play for a timed question
//! - **Finite runs**: a run completes after five answered questions
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use tetris_training_core::{
//!     Leaderboard, MemoryStore, QuestionBank, Session, SessionConfig, Silent,
//! };
//! use tetris_training_core::types::Phase;
//!
//! let mut session = Session::new(
//!     SessionConfig::default(),
//!     Arc::new(QuestionBank::builtin()),
//!     Box::new(Leaderboard::new(MemoryStore::new())),
//!     Arc::new(Silent),
//! );
//!
//! session.start();
//! assert!(session.fetch_pending_question());
//! let correct = session.current_question().unwrap().correct_index;
//! session.answer_question(Some(correct), 2.0);
//!
//! assert_eq!(session.phase(), Phase::Playing);
//! assert_eq!(session.game().score(), 300);
//! ```

pub mod board;
pub mod collision;
pub mod game_state;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;
pub mod sound;
pub mod spawner;

pub use tetris_training_types as types;

pub use tetris_training_leaderboard::{
    HighScoreEntry, Leaderboard, MemoryStore, RecordOutcome, ScorePersistence,
};
pub use tetris_training_quiz::{Question, QuestionBank, QuestionProvider, QuizError};

// Re-export commonly used types for convenience
pub use board::{Board, ClearResult};
pub use collision::{collides, drop_distance};
pub use game_state::{ActionOutcome, GameState, LockEvent};
pub use pieces::{get_shape, Tetromino};
pub use rng::SimpleRng;
pub use scoring::{answer_points, apply_score_delta, hard_drop_bonus, score_for_lines};
pub use session::{QuestionRequest, QuestionTicket, Session, SessionConfig};
pub use snapshot::{ActiveSnapshot, SessionSnapshot};
pub use sound::{RecordingSink, Silent, SoundSink, TraceSink};
pub use spawner::{SpawnOutcome, Spawner};
