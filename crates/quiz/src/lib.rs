//! Question content for the quiz prompts that interrupt play.
//!
//! The game core treats questions as opaque content: it needs an id (for
//! exclusion), the correct option index, and nothing else. This crate owns the
//! [`Question`] record, the [`QuestionProvider`] port the session fetches
//! through, an in-memory [`QuestionBank`] that can be loaded from JSON, and a
//! built-in default set used whenever loading or fetching fails.
//!
//! # Example
//!
//! ```
//! use std::collections::HashSet;
//! use tetris_training_quiz::{QuestionBank, QuestionProvider};
//!
//! let bank = QuestionBank::builtin();
//! let q = bank.fetch_random_question(&HashSet::new()).unwrap();
//! assert!(q.correct_index < q.options.len());
//! ```

pub mod builtin;
pub mod error;
pub mod provider;
pub mod question;

pub use tetris_training_types as types;

pub use error::QuizError;
pub use provider::{load_bank_or_builtin, FallbackProvider, QuestionBank, QuestionProvider};
pub use question::Question;
