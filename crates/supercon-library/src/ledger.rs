//! Recently played and favorites lists
//!
//! Both lists are JSON arrays rewritten in full on every change. A file that
//! fails to parse is treated as an empty list; records missing a field are
//! dropped individually.

use crate::LibraryError;
use crate::catalog::CatalogEntry;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use supercon_config::{DEFAULT_MAX_RECENT, SuperconConfig};

pub const RECENT_FILE: &str = "recent.json";
pub const FAVORITES_FILE: &str = "favorites.json";

/// Persisted projection of a catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRecord {
    pub title: String,
    pub platform: String,
    pub rom_path: PathBuf,
    pub cover_path: PathBuf,
}

impl LedgerRecord {
    /// Same game: equal title and platform
    pub fn same_game(&self, other: &LedgerRecord) -> bool {
        self.title == other.title && self.platform == other.platform
    }
}

impl From<&CatalogEntry> for LedgerRecord {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            title: entry.title.clone(),
            platform: entry.platform.clone(),
            rom_path: entry.rom_path.clone(),
            cover_path: entry.cover_path.clone(),
        }
    }
}

impl From<CatalogEntry> for LedgerRecord {
    fn from(entry: CatalogEntry) -> Self {
        Self {
            title: entry.title,
            platform: entry.platform,
            rom_path: entry.rom_path,
            cover_path: entry.cover_path,
        }
    }
}

/// Recent plays and favorites stored in one directory
#[derive(Debug, Clone)]
pub struct Ledger {
    dir: PathBuf,
    max_recent: usize,
}

impl Ledger {
    /// Ledger files inside `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            max_recent: DEFAULT_MAX_RECENT,
        }
    }

    pub fn from_config(config: &SuperconConfig) -> Self {
        Self::new(&config.paths.state_dir).with_max_recent(config.scan.max_recent)
    }

    /// Cap for the recent list (at least one)
    pub fn with_max_recent(mut self, max_recent: usize) -> Self {
        self.max_recent = max_recent.max(1);
        self
    }

    pub fn recent_path(&self) -> PathBuf {
        self.dir.join(RECENT_FILE)
    }

    pub fn favorites_path(&self) -> PathBuf {
        self.dir.join(FAVORITES_FILE)
    }

    /// Move a game to the front of the recent list
    pub fn record_play(&self, record: impl Into<LedgerRecord>) -> Result<(), LibraryError> {
        let record = record.into();

        let mut recent = self.list_recent();
        recent.retain(|r| !r.same_game(&record));
        tracing::debug!("Recording play of {} ({})", record.title, record.platform);
        recent.insert(0, record);
        recent.truncate(self.max_recent);

        store(&self.recent_path(), &recent)
    }

    /// Add or remove a favorite; returns the new favorited state
    pub fn toggle_favorite(&self, record: impl Into<LedgerRecord>) -> Result<bool, LibraryError> {
        let record = record.into();

        let mut favorites = self.list_favorites();
        let before = favorites.len();
        favorites.retain(|r| !r.same_game(&record));

        let favorited = favorites.len() == before;
        if favorited {
            favorites.insert(0, record);
        }

        store(&self.favorites_path(), &favorites)?;
        Ok(favorited)
    }

    pub fn is_favorite(&self, record: impl Into<LedgerRecord>) -> bool {
        let record = record.into();
        self.list_favorites().iter().any(|r| r.same_game(&record))
    }

    /// Most recent first
    pub fn list_recent(&self) -> Vec<LedgerRecord> {
        let mut recent = load(&self.recent_path());
        recent.truncate(self.max_recent);
        recent
    }

    /// Newest favorite first
    pub fn list_favorites(&self) -> Vec<LedgerRecord> {
        load(&self.favorites_path())
    }
}

fn load(path: &Path) -> Vec<LedgerRecord> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            tracing::warn!("Could not read {}: {}. Using an empty list.", path.display(), e);
            return Vec::new();
        }
    };

    let items = match serde_json::from_str::<serde_json::Value>(&contents) {
        Ok(serde_json::Value::Array(items)) => items,
        Ok(_) => {
            tracing::warn!("{} is not a list. Resetting.", path.display());
            return Vec::new();
        }
        Err(e) => {
            tracing::warn!("{} is corrupted ({}). Resetting.", path.display(), e);
            return Vec::new();
        }
    };

    let total = items.len();
    let records: Vec<LedgerRecord> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();

    if records.len() < total {
        tracing::warn!(
            "Dropped {} malformed records from {}",
            total - records.len(),
            path.display()
        );
    }

    records
}

/// Whole-list overwrite through a temporary file
fn store(path: &Path, records: &[LedgerRecord]) -> Result<(), LibraryError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(records)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;

    Ok(())
}
