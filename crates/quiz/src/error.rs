use thiserror::Error;

/// Failure to produce question content.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("failed to read question bank: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse question bank: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("question bank is empty")]
    Empty,

    #[error("invalid question {id}: {reason}")]
    InvalidQuestion { id: String, reason: String },
}
