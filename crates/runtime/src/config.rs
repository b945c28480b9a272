//! Runtime configuration read from the environment.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `TETRIS_TRAINING_SEED` | clock derived | piece generator seed |
//! | `TETRIS_TRAINING_DROP_MS` | 1000 | gravity interval |
//! | `TETRIS_TRAINING_QUESTIONS` | built-in set | question bank JSON file |
//! | `TETRIS_TRAINING_SCORES` | in memory | leaderboard JSON file |
//! | `TETRIS_TRAINING_PLAYER` | Anonymous | name used when recording a score |
//! | `TETRIS_TRAINING_LOG` | info | log level |
//! | `TETRIS_TRAINING_LOG_PATH` | none | log file; logging is off without it |

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::info;

use crate::core::{Session, SessionConfig, SoundSink};
use crate::driver::DriverTiming;
use crate::leaderboard::{JsonFileStore, Leaderboard, MemoryStore, ScorePersistence};
use crate::quiz::{load_bank_or_builtin, FallbackProvider};
use crate::types::{DROP_INTERVAL_MS, TOTAL_QUESTIONS};

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub seed: u32,
    pub drop_interval_ms: u32,
    pub total_questions: u32,
    pub questions_path: Option<PathBuf>,
    pub scores_path: Option<PathBuf>,
    pub player_name: String,
    pub log_level: String,
    pub log_path: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            drop_interval_ms: DROP_INTERVAL_MS,
            total_questions: TOTAL_QUESTIONS,
            questions_path: None,
            scores_path: None,
            player_name: "Anonymous".to_string(),
            log_level: "info".to_string(),
            log_path: None,
        }
    }
}

impl RuntimeConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let text = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .and_then(|s| if s.is_empty() { None } else { Some(s) })
        };
        let parsed = |key: &str| text(key).and_then(|s| parse::<u32>(&s));

        let defaults = Self::default();
        Self {
            seed: parsed("TETRIS_TRAINING_SEED").unwrap_or_else(clock_seed),
            drop_interval_ms: parsed("TETRIS_TRAINING_DROP_MS")
                .filter(|ms| *ms > 0)
                .unwrap_or(defaults.drop_interval_ms),
            total_questions: defaults.total_questions,
            questions_path: text("TETRIS_TRAINING_QUESTIONS").map(PathBuf::from),
            scores_path: text("TETRIS_TRAINING_SCORES").map(PathBuf::from),
            player_name: text("TETRIS_TRAINING_PLAYER").unwrap_or(defaults.player_name),
            log_level: text("TETRIS_TRAINING_LOG").unwrap_or(defaults.log_level),
            log_path: text("TETRIS_TRAINING_LOG_PATH").map(PathBuf::from),
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            seed: self.seed,
            total_questions: self.total_questions,
            drop_interval_ms: self.drop_interval_ms,
        }
    }

    pub fn driver_timing(&self) -> DriverTiming {
        DriverTiming::for_session(&self.session_config())
    }

    /// Wire up a session with the configured question bank and leaderboard.
    ///
    /// A missing or invalid bank falls back to the built-in questions; without
    /// a scores path the leaderboard lives in memory.
    pub fn build_session(&self, sound: Arc<dyn SoundSink>) -> Session {
        let bank = load_bank_or_builtin(self.questions_path.as_deref());
        let scores: Box<dyn ScorePersistence> = match &self.scores_path {
            Some(path) => {
                info!(path = %path.display(), "leaderboard file");
                Box::new(Leaderboard::new(JsonFileStore::new(path.clone())))
            }
            None => Box::new(Leaderboard::new(MemoryStore::new())),
        };
        Session::new(
            self.session_config(),
            Arc::new(FallbackProvider::new(bank)),
            scores,
            sound,
        )
    }
}

fn parse<T: FromStr>(s: &str) -> Option<T> {
    s.parse().ok()
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ (d.as_secs() as u32))
        .unwrap_or(1)
}
