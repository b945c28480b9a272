use serde::{Deserialize, Serialize};

/// One retained leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighScoreEntry {
    pub id: String,
    pub player_name: String,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    /// Human-readable date (`MM/DD/YYYY`)
    pub date: String,
    /// Milliseconds since the Unix epoch; breaks ties between equal scores
    pub timestamp: u64,
}

/// Result of recording a score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOutcome {
    pub entry: HighScoreEntry,
    /// 1-based rank among all entries including the new one, before truncation.
    pub rank: usize,
    pub is_top3: bool,
    pub is_new_record: bool,
    pub total_players: usize,
}

impl RecordOutcome {
    /// Whether the new entry survived truncation to the leaderboard size.
    pub fn retained(&self, capacity: usize) -> bool {
        self.rank <= capacity
    }
}
