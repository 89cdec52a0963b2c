//! Bounded history of generated codes, persisted as a single JSON document.

use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{QrError, QrResult};
use crate::generator::GeneratorSettings;

/// Entries kept before the oldest is evicted.
pub const HISTORY_CAPACITY: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub content: String,
    /// PNG thumbnail as a data URL, ready for embedding.
    pub thumbnail: String,
    pub created_at: DateTime<Utc>,
    pub settings: GeneratorSettings,
}

impl HistoryEntry {
    pub fn new(content: String, thumbnail: String, settings: GeneratorSettings) -> Self {
        Self { id: Uuid::new_v4(), content, thumbnail, created_at: Utc::now(), settings }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Prepends an entry, evicting the oldest once past capacity.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(HISTORY_CAPACITY);
    }

    /// Removes the entry with the given id. Returns whether it was present.
    pub fn remove(&mut self, id: &Uuid) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != *id);
        self.entries.len() < before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Loads history from disk. A missing or unreadable file yields an empty
    /// history rather than an error, so stale state never blocks generation.
    pub fn load(path: &Path) -> Self {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(_) => return Self::new(),
        };
        match serde_json::from_str(&raw) {
            Ok(history) => history,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "discarding corrupt history");
                Self::new()
            }
        }
    }

    pub fn save(&self, path: &Path) -> QrResult<()> {
        let raw = serde_json::to_string_pretty(self).map_err(|e| QrError::Io(e.to_string()))?;
        fs::write(path, raw).map_err(|e| {
            warn!(path = %path.display(), error = %e, "failed to persist history");
            QrError::Io(e.to_string())
        })?;
        debug!(path = %path.display(), entries = self.entries.len(), "history saved");
        Ok(())
    }
}

#[cfg(test)]
mod history_tests {
    use super::*;
    use crate::generator::GeneratorSettings;

    fn entry(content: &str) -> HistoryEntry {
        HistoryEntry::new(content.to_string(), String::new(), GeneratorSettings::default())
    }

    #[test]
    fn test_newest_first_and_eviction() {
        let mut history = History::new();
        for i in 0..7 {
            history.push(entry(&format!("content {i}")));
        }
        assert_eq!(history.len(), HISTORY_CAPACITY);
        let contents: Vec<_> = history.entries().map(|e| e.content.as_str()).collect();
        assert_eq!(contents, ["content 6", "content 5", "content 4", "content 3", "content 2"]);
    }

    #[test]
    fn test_remove() {
        let mut history = History::new();
        history.push(entry("a"));
        history.push(entry("b"));
        let id = history.entries().next().unwrap().id;
        assert!(history.remove(&id));
        assert!(!history.remove(&id));
        assert_eq!(history.len(), 1);
        assert_eq!(history.entries().next().unwrap().content, "a");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");

        let mut history = History::new();
        history.push(entry("persisted"));
        history.save(&path).unwrap();

        let loaded = History::load(&path);
        assert_eq!(loaded, history);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let history = History::load(&dir.path().join("nope.json"));
        assert!(history.is_empty());
    }

    #[test]
    fn test_load_corrupt_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, "{not json!").unwrap();
        let history = History::load(&path);
        assert!(history.is_empty());
    }
}
