//! Schedule history store
//!
//! A single JSON object file mapping a derived title to the raw pasted text.
//! A missing or corrupt file reads as an empty history.

use anyhow::{Context, Result};
use seminar_board::{history_title, Timestamp};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All entries; never fails
    pub fn entries(&self) -> BTreeMap<String, String> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                log::debug!("No history at {:?}: {}", self.path, e);
                return BTreeMap::new();
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable history file {:?}: {}", self.path, e);
            BTreeMap::new()
        })
    }

    /// Titles, newest-looking first (reverse lexical order)
    pub fn titles(&self) -> Vec<String> {
        self.entries().into_keys().rev().collect()
    }

    /// Text stored under `title`
    pub fn get(&self, title: &str) -> Option<String> {
        self.entries().remove(title)
    }

    /// Store `text` under its derived title, replacing any previous entry
    pub fn save(&self, text: &str, now: Timestamp) -> Result<String> {
        let title = history_title(text, now);
        let mut entries = self.entries();
        entries.insert(title.clone(), text.to_string());
        self.write(&entries)?;

        log::info!("Saved schedule as {:?}", title);
        Ok(title)
    }

    /// Remove `title`; false if it was not there
    pub fn delete(&self, title: &str) -> Result<bool> {
        let mut entries = self.entries();
        if entries.remove(title).is_none() {
            return Ok(false);
        }
        self.write(&entries)?;

        log::info!("Deleted schedule {:?}", title);
        Ok(true)
    }

    fn write(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let json = serde_json::to_string_pretty(entries).context("Failed to serialize history")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write history file: {:?}", self.path))
    }
}
