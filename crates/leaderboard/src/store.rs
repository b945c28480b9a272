//! Storage backends for leaderboard entries.

use std::path::{Path, PathBuf};

use crate::entry::HighScoreEntry;
use crate::error::ScoreError;

/// Where entries live. Ranking and truncation happen in the leaderboard, so a
/// store only has to round-trip what it is given.
pub trait ScoreStore: Send {
    fn load(&self) -> Result<Vec<HighScoreEntry>, ScoreError>;
    fn save(&mut self, entries: &[HighScoreEntry]) -> Result<(), ScoreError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Vec<HighScoreEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<HighScoreEntry>) -> Self {
        Self { entries }
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Result<Vec<HighScoreEntry>, ScoreError> {
        Ok(self.entries.clone())
    }

    fn save(&mut self, entries: &[HighScoreEntry]) -> Result<(), ScoreError> {
        self.entries = entries.to_vec();
        Ok(())
    }
}

/// JSON array of entries in a single file. A missing file is an empty board.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for JsonFileStore {
    fn load(&self) -> Result<Vec<HighScoreEntry>, ScoreError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&text)?)
    }

    fn save(&mut self, entries: &[HighScoreEntry]) -> Result<(), ScoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}
