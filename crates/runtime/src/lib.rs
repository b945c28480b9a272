//! Async runtime for a training session.
//!
//! Bridges the synchronous session state machine with real time: a tokio
//! event loop owns the gravity, clock, countdown and dwell timers, runs
//! question fetches off the loop, and publishes a view for the terminal
//! front end.
//!
//! # Environment Variables
//!
//! See [`config`] for the full table. The most useful ones:
//!
//! - `TETRIS_TRAINING_SEED`: fixed piece sequence
//! - `TETRIS_TRAINING_QUESTIONS`: JSON question bank
//! - `TETRIS_TRAINING_SCORES`: JSON leaderboard file
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tetris_training_runtime::{DriverEvent, RuntimeConfig, SessionDriver};
//! use tetris_training_runtime::core::Silent;
//! use tetris_training_runtime::types::InputCommand;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let config = RuntimeConfig::from_env();
//! let session = config.build_session(Arc::new(Silent));
//! let (driver, _views) = SessionDriver::new(session, config.driver_timing(), "ada");
//!
//! let (tx, rx) = tokio::sync::mpsc::channel(32);
//! let handle = tokio::spawn(driver.run(rx));
//! tx.send(DriverEvent::Input(InputCommand::Confirm)).await?;
//! tx.send(DriverEvent::Shutdown).await?;
//! let _session = handle.await??;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod driver;

pub use tetris_training_core as core;
pub use tetris_training_leaderboard as leaderboard;
pub use tetris_training_quiz as quiz;
pub use tetris_training_types as types;

pub use config::RuntimeConfig;
pub use driver::{DriverEvent, DriverTiming, DriverView, QuizView, SessionDriver};
