//! Ranking rules over a score store.

use rand::distr::Alphanumeric;
use rand::Rng;
use time::macros::format_description;
use time::OffsetDateTime;
use tracing::debug;

use crate::entry::{HighScoreEntry, RecordOutcome};
use crate::error::ScoreError;
use crate::store::ScoreStore;
use crate::types::LEADERBOARD_SIZE;

/// Score persistence port used by the session.
pub trait ScorePersistence: Send {
    /// Record a finished run. A blank name is stored as "Anonymous".
    fn record_score(
        &mut self,
        name: &str,
        score: u32,
        level: u32,
        lines: u32,
    ) -> Result<RecordOutcome, ScoreError>;

    /// Top `limit` entries, best first.
    fn list_top_scores(&self, limit: usize) -> Result<Vec<HighScoreEntry>, ScoreError>;

    /// Whether `score` would earn a place on the board.
    fn is_qualifying(&self, score: u32) -> Result<bool, ScoreError>;
}

/// Sort best first: score descending, then earliest timestamp.
///
/// The sort is stable, so entries with equal score and timestamp keep their
/// insertion order.
pub fn sort_entries(entries: &mut [HighScoreEntry]) {
    entries.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.timestamp.cmp(&b.timestamp))
    });
}

pub struct Leaderboard<S> {
    store: S,
    capacity: usize,
}

impl<S: ScoreStore> Leaderboard<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            capacity: LEADERBOARD_SIZE,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Retained entries, best first.
    pub fn entries(&self) -> Result<Vec<HighScoreEntry>, ScoreError> {
        let mut entries = self.store.load()?;
        sort_entries(&mut entries);
        entries.truncate(self.capacity);
        Ok(entries)
    }

    pub fn best_score(&self) -> Result<u32, ScoreError> {
        Ok(self.entries()?.first().map(|e| e.score).unwrap_or(0))
    }

    /// Rank `score` would take if recorded now, without recording it.
    pub fn score_rank(&self, score: u32) -> Result<usize, ScoreError> {
        let entries = self.entries()?;
        Ok(entries.iter().take_while(|e| score <= e.score).count() + 1)
    }

    pub fn clear(&mut self) -> Result<(), ScoreError> {
        self.store.save(&[])
    }

    /// Record a score with an explicit wall-clock time.
    pub fn record_at(
        &mut self,
        name: &str,
        score: u32,
        level: u32,
        lines: u32,
        now: OffsetDateTime,
    ) -> Result<RecordOutcome, ScoreError> {
        let current = self.entries()?;
        let timestamp = u64::try_from(now.unix_timestamp_nanos() / 1_000_000).unwrap_or(0);

        let trimmed = name.trim();
        let entry = HighScoreEntry {
            id: format!("{}-{}", timestamp, random_suffix()),
            player_name: if trimmed.is_empty() {
                "Anonymous".to_string()
            } else {
                trimmed.to_string()
            },
            score,
            level,
            lines,
            date: now
                .format(format_description!("[month]/[day]/[year]"))
                .unwrap_or_default(),
            timestamp,
        };

        let mut merged = current.clone();
        merged.push(entry.clone());
        sort_entries(&mut merged);

        let rank = merged
            .iter()
            .position(|e| e.id == entry.id)
            .map(|i| i + 1)
            .unwrap_or(merged.len());
        let total_players = (current.len() + 1).max(rank);

        merged.truncate(self.capacity);
        self.store.save(&merged)?;

        debug!(score, rank, player = %entry.player_name, "recorded high score");

        Ok(RecordOutcome {
            entry,
            rank,
            is_top3: rank <= 3,
            is_new_record: rank == 1,
            total_players,
        })
    }
}

fn random_suffix() -> String {
    let mut rng = rand::rng();
    (0..9)
        .map(|_| char::from(rng.sample(Alphanumeric)).to_ascii_lowercase())
        .collect()
}

impl<S: ScoreStore> ScorePersistence for Leaderboard<S> {
    fn record_score(
        &mut self,
        name: &str,
        score: u32,
        level: u32,
        lines: u32,
    ) -> Result<RecordOutcome, ScoreError> {
        self.record_at(name, score, level, lines, OffsetDateTime::now_utc())
    }

    fn list_top_scores(&self, limit: usize) -> Result<Vec<HighScoreEntry>, ScoreError> {
        let mut entries = self.entries()?;
        entries.truncate(limit);
        Ok(entries)
    }

    fn is_qualifying(&self, score: u32) -> Result<bool, ScoreError> {
        let entries = self.entries()?;
        if entries.len() < self.capacity {
            return Ok(true);
        }
        Ok(entries.last().map(|e| score > e.score).unwrap_or(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use time::Duration;

    fn at(secs: i64) -> OffsetDateTime {
        OffsetDateTime::UNIX_EPOCH + Duration::seconds(1_700_000_000 + secs)
    }

    #[test]
    fn test_blank_name_becomes_anonymous() {
        let mut board = Leaderboard::new(MemoryStore::new());
        let out = board.record_at("   ", 100, 1, 2, at(0)).unwrap();
        assert_eq!(out.entry.player_name, "Anonymous");
        let out = board.record_at("  Ada ", 50, 1, 1, at(1)).unwrap();
        assert_eq!(out.entry.player_name, "Ada");
    }

    #[test]
    fn test_rank_and_record_flags() {
        let mut board = Leaderboard::new(MemoryStore::new());
        let first = board.record_at("a", 500, 1, 5, at(0)).unwrap();
        assert_eq!(first.rank, 1);
        assert!(first.is_new_record);
        assert_eq!(first.total_players, 1);

        let second = board.record_at("b", 300, 1, 3, at(1)).unwrap();
        assert_eq!(second.rank, 2);
        assert!(second.is_top3);
        assert!(!second.is_new_record);
        assert_eq!(second.total_players, 2);
    }

    #[test]
    fn test_ties_rank_earlier_timestamp_first() {
        let mut board = Leaderboard::new(MemoryStore::new());
        board.record_at("early", 400, 1, 4, at(0)).unwrap();
        let late = board.record_at("late", 400, 1, 4, at(10)).unwrap();
        assert_eq!(late.rank, 2);

        let names: Vec<String> = board
            .list_top_scores(10)
            .unwrap()
            .into_iter()
            .map(|e| e.player_name)
            .collect();
        assert_eq!(names, vec!["early", "late"]);
    }

    #[test]
    fn test_capacity_evicts_lowest() {
        let mut board = Leaderboard::new(MemoryStore::new());
        for i in 0..LEADERBOARD_SIZE as u32 {
            board
                .record_at(&format!("p{i}"), (i + 1) * 100, 1, 1, at(i as i64))
                .unwrap();
        }
        assert_eq!(board.entries().unwrap().len(), LEADERBOARD_SIZE);
        assert!(!board.is_qualifying(100).unwrap());
        assert!(board.is_qualifying(101).unwrap());

        let out = board.record_at("low", 50, 1, 1, at(100)).unwrap();
        assert_eq!(out.rank, LEADERBOARD_SIZE + 1);
        assert!(!out.retained(board.capacity()));
        assert_eq!(board.entries().unwrap().len(), LEADERBOARD_SIZE);
        assert_eq!(board.entries().unwrap().last().unwrap().score, 100);

        board.record_at("high", 5000, 1, 1, at(101)).unwrap();
        let entries = board.entries().unwrap();
        assert_eq!(entries.len(), LEADERBOARD_SIZE);
        assert_eq!(entries[0].score, 5000);
        assert_eq!(entries.last().unwrap().score, 200);
    }

    #[test]
    fn test_score_rank_and_best_score() {
        let mut board = Leaderboard::new(MemoryStore::new());
        assert_eq!(board.best_score().unwrap(), 0);
        assert_eq!(board.score_rank(10).unwrap(), 1);

        board.record_at("a", 300, 1, 1, at(0)).unwrap();
        board.record_at("b", 200, 1, 1, at(1)).unwrap();
        assert_eq!(board.best_score().unwrap(), 300);
        assert_eq!(board.score_rank(400).unwrap(), 1);
        assert_eq!(board.score_rank(250).unwrap(), 2);
        assert_eq!(board.score_rank(200).unwrap(), 3);
        assert_eq!(board.score_rank(10).unwrap(), 3);
    }

    #[test]
    fn test_date_and_timestamp() {
        let mut board = Leaderboard::new(MemoryStore::new());
        let out = board.record_at("a", 1, 1, 1, at(0)).unwrap();
        assert_eq!(out.entry.timestamp, 1_700_000_000_000);
        assert_eq!(out.entry.date, "11/14/2023");
        assert!(out.entry.id.starts_with("1700000000000-"));
    }
}
