//! Game library for the Super Console Launcher
//!
//! Walks a `ROMs/<Platform>/` tree, pairs every title with cover art from
//! `Covers/<Platform>/`, and keeps the recently played and favorites lists.

mod catalog;
mod covers;
mod ledger;
mod scanner;
mod strategy;
mod title;

pub use catalog::{CatalogEntry, find_entry, group_by_platform};
pub use covers::CoverResolver;
pub use ledger::{FAVORITES_FILE, Ledger, LedgerRecord, RECENT_FILE};
pub use scanner::{RomScanner, ScanConfig, ScanIssue, ScanResult};
pub use title::{
    find_bracketed_id, infer_game_id, normalize, split_bracketed_id, split_game_id, strip_game_id,
};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Default cover not found: {0}")]
    DefaultCoverMissing(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
