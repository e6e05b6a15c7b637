//! High score and round history persistence.
//!
//! Finished rounds are folded into a [`ScoreBook`] and written as JSON next
//! to the config file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::APP_DIR_NAME;
use crate::error::PersistenceError;
use crate::game::RoundSummary;

/// One finished round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreHistoryEntry {
    pub score: u64,
    pub accuracy: f64,
    /// Unix seconds
    pub recorded_at: u64,
}

/// What recording a round changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordOutcome {
    pub is_new_high_score: bool,
    /// 1-based position in the history, None if it did not make the cut
    pub rank: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBook {
    pub high_score: u64,
    /// Best rounds first
    pub history: Vec<ScoreHistoryEntry>,
    #[serde(default)]
    pub version: u32,
}

impl Default for ScoreBook {
    fn default() -> Self {
        Self {
            high_score: 0,
            history: Vec::new(),
            version: Self::VERSION,
        }
    }
}

impl ScoreBook {
    const VERSION: u32 = 1;

    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a finished round in, keeping at most `capacity` entries sorted by
    /// score (newer first on ties).
    pub fn record(
        &mut self,
        summary: &RoundSummary,
        recorded_at: u64,
        capacity: usize,
    ) -> RecordOutcome {
        let is_new_high_score = summary.final_score > self.high_score;
        if is_new_high_score {
            self.high_score = summary.final_score;
        }

        let entry = ScoreHistoryEntry {
            score: summary.final_score,
            accuracy: summary.accuracy,
            recorded_at,
        };
        let index = self
            .history
            .iter()
            .position(|e| {
                e.score < entry.score || (e.score == entry.score && e.recorded_at <= recorded_at)
            })
            .unwrap_or(self.history.len());
        self.history.insert(index, entry);
        self.history.truncate(capacity);

        RecordOutcome {
            is_new_high_score,
            rank: (index < capacity).then_some(index + 1),
        }
    }

    pub fn best(&self) -> Option<&ScoreHistoryEntry> {
        self.history.first()
    }
}

/// Storage backend for the score book
pub trait ScoreStore {
    fn load(&self) -> Result<ScoreBook, PersistenceError>;
    fn save(&self, book: &ScoreBook) -> Result<(), PersistenceError>;
}

/// Stores the score book as pretty-printed JSON
#[derive(Debug, Clone)]
pub struct JsonScoreStore {
    path: PathBuf,
}

impl JsonScoreStore {
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/HandBlaster/scores.json`
    pub fn default_path() -> Result<PathBuf, PersistenceError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME).join("scores.json"))
            .ok_or(PersistenceError::NoConfigDir)
    }

    pub fn open_default() -> Result<Self, PersistenceError> {
        Ok(Self::with_path(Self::default_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load, record, save in one go
    pub fn record(
        &self,
        summary: &RoundSummary,
        capacity: usize,
    ) -> Result<(ScoreBook, RecordOutcome), PersistenceError> {
        let mut book = self.load()?;
        let outcome = book.record(summary, unix_now(), capacity);
        self.save(&book)?;
        Ok((book, outcome))
    }
}

impl ScoreStore for JsonScoreStore {
    fn load(&self) -> Result<ScoreBook, PersistenceError> {
        if !self.path.exists() {
            tracing::debug!("No score history at {}, starting fresh", self.path.display());
            return Ok(ScoreBook::new());
        }

        let load_err = |e: Box<dyn std::error::Error + Send + Sync>| PersistenceError::LoadFailed {
            path: self.path.display().to_string(),
            source: e,
        };

        let json = fs::read_to_string(&self.path).map_err(|e| load_err(Box::new(e)))?;
        let book: ScoreBook = serde_json::from_str(&json).map_err(|e| load_err(Box::new(e)))?;

        if book.version != ScoreBook::VERSION {
            tracing::warn!(
                "Score history version mismatch: expected {}, found {}",
                ScoreBook::VERSION,
                book.version
            );
        }

        tracing::debug!("Loaded score history from: {}", self.path.display());
        Ok(book)
    }

    fn save(&self, book: &ScoreBook) -> Result<(), PersistenceError> {
        let save_err = |e: Box<dyn std::error::Error + Send + Sync>| PersistenceError::SaveFailed {
            path: self.path.display().to_string(),
            source: e,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| save_err(Box::new(e)))?;
        }

        let json = serde_json::to_string_pretty(book).map_err(|e| save_err(Box::new(e)))?;
        fs::write(&self.path, json).map_err(|e| save_err(Box::new(e)))?;

        tracing::debug!("Saved score history to: {}", self.path.display());
        Ok(())
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(score: u64) -> RoundSummary {
        RoundSummary {
            final_score: score,
            accuracy: 80.0,
            hits: 4,
            shots: 5,
        }
    }

    fn temp_store(name: &str) -> JsonScoreStore {
        let dir = std::env::temp_dir().join(format!(
            "hand-blaster-scores-{}-{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        JsonScoreStore::with_path(dir.join("scores.json"))
    }

    #[test]
    fn test_first_round_sets_high_score() {
        let mut book = ScoreBook::new();
        let outcome = book.record(&summary(120), 1, 10);

        assert_eq!(
            outcome,
            RecordOutcome {
                is_new_high_score: true,
                rank: Some(1)
            }
        );
        assert_eq!(book.high_score, 120);
    }

    #[test]
    fn test_equal_score_is_not_a_new_high() {
        let mut book = ScoreBook::new();
        book.record(&summary(120), 1, 10);
        let outcome = book.record(&summary(120), 2, 10);

        assert!(!outcome.is_new_high_score);
        // Newer entry ranks first on ties
        assert_eq!(outcome.rank, Some(1));
        assert_eq!(book.history[0].recorded_at, 2);
    }

    #[test]
    fn test_history_sorted_and_capped() {
        let mut book = ScoreBook::new();
        for (i, score) in [50, 10, 90, 30, 70].into_iter().enumerate() {
            book.record(&summary(score), i as u64, 3);
        }

        let scores: Vec<u64> = book.history.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![90, 70, 50]);
        assert_eq!(book.high_score, 90);

        let outcome = book.record(&summary(5), 10, 3);
        assert_eq!(outcome.rank, None);
        assert_eq!(book.history.len(), 3);
    }

    #[test]
    fn test_missing_file_loads_empty_book() {
        let store = temp_store("missing");
        assert_eq!(store.load().unwrap(), ScoreBook::new());
    }

    #[test]
    fn test_save_then_load() {
        let store = temp_store("roundtrip");
        let (book, outcome) = store.record(&summary(240), 10).unwrap();
        assert!(outcome.is_new_high_score);

        assert_eq!(store.load().unwrap(), book);
        let _ = fs::remove_dir_all(store.path().parent().unwrap());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let store = temp_store("corrupt");
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{ not json").unwrap();

        assert!(matches!(
            store.load(),
            Err(PersistenceError::LoadFailed { .. })
        ));
        let _ = fs::remove_dir_all(store.path().parent().unwrap());
    }
}
