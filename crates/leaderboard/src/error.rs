use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("leaderboard storage failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("leaderboard data is corrupted: {0}")]
    Parse(#[from] serde_json::Error),
}
