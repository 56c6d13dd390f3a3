//! Search history persisted as a JSON array in the state directory.
//!
//! Newest query first, no duplicates, capped at `history.max_entries`.
//! Re-running an older query moves it back to the front.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const HISTORY_FILENAME: &str = "history.json";

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Corrupt history file: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
struct Entries(Vec<String>);

/// Recent search queries.
#[derive(Debug, Clone)]
pub struct History {
    path: PathBuf,
    max_entries: usize,
    entries: Vec<String>,
}

impl History {
    /// Load history from `path`. A missing file is an empty history.
    pub fn load(path: &Path, max_entries: usize) -> Result<Self, HistoryError> {
        let entries = if path.exists() {
            let content = fs::read_to_string(path)?;
            let Entries(entries) = serde_json::from_str(&content)?;
            entries
        } else {
            Vec::new()
        };
        let mut history = Self {
            path: path.to_path_buf(),
            max_entries,
            entries,
        };
        history.entries.truncate(max_entries);
        Ok(history)
    }

    /// History file inside the state directory.
    pub fn in_state_dir(state_dir: &Path, max_entries: usize) -> Result<Self, HistoryError> {
        Self::load(&state_dir.join(HISTORY_FILENAME), max_entries)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Put `query` at the front, dropping an older copy and anything past the cap.
    /// Blank queries are ignored.
    pub fn record(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }
        self.entries.retain(|q| q != query);
        self.entries.insert(0, query.to_string());
        self.entries.truncate(self.max_entries);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn save(&self) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&Entries(self.entries.clone()))?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
