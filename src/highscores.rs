//! High score leaderboard system
//!
//! Tracks the top 10 finished sessions. Storage sits behind
//! [`LeaderboardStore`] so the host decides where records live.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::sim::Level;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Final score
    pub score: u64,
    /// Difficulty played
    pub level: Level,
    /// Best combo reached in the session
    pub combo: u32,
    /// Targets hit
    pub hits: u32,
    /// Local calendar date the session ended
    pub date: String,
}

impl LeaderboardEntry {
    /// Entry stamped with today's local date
    pub fn today(score: u64, level: Level, combo: u32, hits: u32) -> Self {
        Self {
            score,
            level,
            combo,
            hits,
            date: chrono::Local::now().format("%Y-%m-%d").to_string(),
        }
    }
}

/// High score leaderboard, sorted descending by score
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build from stored records, restoring order and the size cap
    pub fn from_entries(mut entries: Vec<LeaderboardEntry>) -> Self {
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(MAX_HIGH_SCORES);
        Self { entries }
    }

    /// Check if a score would make it onto the board
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Insert an entry behind any equal scores, then trim to size.
    /// Returns the rank achieved (1-indexed) or None if it fell off the end.
    pub fn insert(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        if !self.qualifies(entry.score) {
            return None;
        }

        let pos = self
            .entries
            .iter()
            .position(|e| entry.score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(pos + 1)
    }

    /// True when `score` equals the current top score.
    ///
    /// Called after inserting, so a first-ever entry or a tie with the
    /// leader both count as a new high score.
    pub fn is_new_high_score(&self, score: u64) -> bool {
        self.top_score() == Some(score)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}

/// Durable home for the leaderboard
pub trait LeaderboardStore {
    /// Stored entries, at most 10, descending by score
    fn load(&self) -> Result<Vec<LeaderboardEntry>>;
    fn save(&mut self, entries: &[LeaderboardEntry]) -> Result<()>;
}

/// Keeps entries for the lifetime of the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Vec<LeaderboardEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LeaderboardStore for MemoryStore {
    fn load(&self) -> Result<Vec<LeaderboardEntry>> {
        Ok(self.entries.clone())
    }

    fn save(&mut self, entries: &[LeaderboardEntry]) -> Result<()> {
        self.entries = entries.to_vec();
        Ok(())
    }
}

/// JSON list of records in a single file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LeaderboardStore for JsonFileStore {
    fn load(&self) -> Result<Vec<LeaderboardEntry>> {
        if !self.path.exists() {
            log::info!("No high scores found, starting fresh");
            return Ok(Vec::new());
        }
        let bytes = fs::read(&self.path)?;
        let entries: Vec<LeaderboardEntry> = serde_json::from_slice(&bytes)?;
        log::info!("Loaded {} high scores", entries.len());
        Ok(entries)
    }

    fn save(&mut self, entries: &[LeaderboardEntry]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(entries)?;
        fs::write(&self.path, json)?;
        log::info!("High scores saved ({} entries)", entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GameError;

    fn entry(score: u64) -> LeaderboardEntry {
        LeaderboardEntry {
            score,
            level: Level::Easy,
            combo: 1,
            hits: 1,
            date: "2026-01-01".into(),
        }
    }

    #[test]
    fn test_sorted_descending() {
        let mut board = Leaderboard::new();
        assert_eq!(board.insert(entry(50)), Some(1));
        assert_eq!(board.insert(entry(80)), Some(1));
        assert_eq!(board.insert(entry(30)), Some(3));
        let scores: Vec<u64> = board.entries.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![80, 50, 30]);
    }

    #[test]
    fn test_eleventh_drops_lowest() {
        let mut board = Leaderboard::new();
        for score in 1..=10 {
            board.insert(entry(score * 10));
        }
        assert_eq!(board.len(), MAX_HIGH_SCORES);
        assert_eq!(board.insert(entry(55)), Some(6));
        assert_eq!(board.len(), MAX_HIGH_SCORES);
        assert_eq!(board.entries.last().map(|e| e.score), Some(20));

        // Not above the minimum: rejected
        assert!(!board.qualifies(20));
        assert_eq!(board.insert(entry(5)), None);
    }

    #[test]
    fn test_zero_score_qualifies_when_room() {
        let mut board = Leaderboard::new();
        assert!(board.qualifies(0));
        assert_eq!(board.insert(entry(0)), Some(1));
    }

    #[test]
    fn test_ties_go_behind() {
        let mut board = Leaderboard::new();
        let mut first = entry(40);
        first.hits = 99;
        board.insert(first);
        assert_eq!(board.insert(entry(40)), Some(2));
        assert_eq!(board.entries[0].hits, 99);
    }

    #[test]
    fn test_new_high_score_is_top_one_comparison() {
        let mut board = Leaderboard::new();
        board.insert(entry(30));
        assert!(board.is_new_high_score(30));
        board.insert(entry(70));
        assert!(!board.is_new_high_score(30));
        // a tie with the leader also reports true
        board.insert(entry(70));
        assert!(board.is_new_high_score(70));
    }

    #[test]
    fn test_from_entries_restores_order() {
        let board = Leaderboard::from_entries((0..15).map(entry).collect());
        assert_eq!(board.len(), MAX_HIGH_SCORES);
        assert_eq!(board.top_score(), Some(14));
        assert_eq!(board.entries.last().map(|e| e.score), Some(5));
    }

    #[test]
    fn test_record_format() {
        let json = serde_json::to_value(entry(12)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "score": 12,
                "level": "easy",
                "combo": 1,
                "hits": 1,
                "date": "2026-01-01"
            })
        );
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("nested").join("scores.json"));
        assert!(store.load().unwrap().is_empty());

        store.save(&[entry(80), entry(50)]).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded, vec![entry(80), entry(50)]);
    }

    #[test]
    fn test_file_store_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        fs::write(&path, "not json").unwrap();
        let store = JsonFileStore::new(&path);
        assert!(matches!(store.load(), Err(GameError::StorageUnavailable(_))));
    }

    #[test]
    fn test_today_date_format() {
        let e = LeaderboardEntry::today(10, Level::Hard, 2, 3);
        assert_eq!(e.date.len(), 10);
        assert_eq!(e.date.as_bytes()[4], b'-');
    }
}
