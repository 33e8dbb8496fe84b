use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};

pub const DEFAULT_HISTORY_LIMIT: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryEntry {
    pub url: String,
    pub score: u32,
    /// Seconds since the Unix epoch.
    pub timestamp: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct HistoryData {
    #[serde(default)]
    pub entries: Vec<HistoryEntry>,
}

/// Recent reviews persisted as TOML, newest first.
pub struct HistoryStore {
    dir: PathBuf,
    limit: usize,
}

impl HistoryStore {
    pub fn new(dir: impl Into<PathBuf>, limit: usize) -> Self {
        Self {
            dir: dir.into(),
            limit,
        }
    }

    /// `$HOME/.skill-health`, or `./.skill-health` when `HOME` is unset.
    pub fn default_dir() -> PathBuf {
        std::env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".skill-health")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn history_file(&self) -> PathBuf {
        self.dir.join("history.toml")
    }

    /// Load history from disk. Returns an empty history if the file is missing or corrupted.
    pub fn load(&self) -> HistoryData {
        let path = self.history_file();
        if !path.exists() {
            return HistoryData::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<HistoryData>(&content) {
                Ok(history) => history,
                Err(e) => {
                    warn!("corrupted history file {}: {e}, resetting", path.display());
                    HistoryData::default()
                }
            },
            Err(e) => {
                warn!(
                    "failed to read history file {}: {e}, resetting",
                    path.display()
                );
                HistoryData::default()
            }
        }
    }

    pub fn save(&self, history: &HistoryData) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| Error::History(format!("failed to create history dir: {e}")))?;

        let content = toml::to_string_pretty(history)
            .map_err(|e| Error::History(format!("failed to serialize history: {e}")))?;

        std::fs::write(self.history_file(), content)
            .map_err(|e| Error::History(format!("failed to write history file: {e}")))?;

        Ok(())
    }

    /// Record a review at the current time. See [`HistoryStore::record_at`].
    pub fn record(&self, url: &str, score: u32) -> Result<Vec<HistoryEntry>> {
        self.record_at(url, score, unix_now())
    }

    /// Put `url` at the front, dropping any older entry for the same URL and
    /// anything past the limit. Returns the updated entries.
    pub fn record_at(&self, url: &str, score: u32, timestamp: u64) -> Result<Vec<HistoryEntry>> {
        let mut history = self.load();
        history.entries.retain(|entry| entry.url != url);
        history.entries.insert(
            0,
            HistoryEntry {
                url: url.to_string(),
                score,
                timestamp,
            },
        );
        history.entries.truncate(self.limit);
        self.save(&history)?;
        Ok(history.entries)
    }
}

pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Human-readable age of `then` relative to `now`, both in epoch seconds.
pub fn time_ago(now: u64, then: u64) -> String {
    let mins = now.saturating_sub(then) / 60;
    if mins < 1 {
        return "just now".to_string();
    }
    if mins < 60 {
        return format!("{mins}m ago");
    }
    let hours = mins / 60;
    if hours < 24 {
        return format!("{hours}h ago");
    }
    format!("{}d ago", hours / 24)
}
