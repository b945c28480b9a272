//! Terminal input module.
//!
//! Maps `crossterm` key events to [`crate::types::InputCommand`]. The mapping
//! is phase independent: the same key always yields the same command and the
//! session driver decides what it means right now (Enter starts from the
//! menu, submits during a question and plays again after a run).

pub mod map;

pub use tetris_training_types as types;

pub use map::{handle_key_event, should_quit};
