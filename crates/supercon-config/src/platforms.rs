//! Platform strategy table
//!
//! Maps platform directory names to the discovery strategy used for them.
//! Platforms missing from the table are scanned as flat ROM folders.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::ConfigError;

/// How a platform directory is laid out on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "kebab-case")]
pub enum StrategyKind {
    /// ROM files directly under the platform directory
    FlatFile,

    /// Flat files restricted to disc index files (one entry per disc set)
    DiscIndex { index_extensions: Vec<String> },

    /// One folder per game with the executable under `<game>/<code_dir>/`
    NestedPackage {
        code_dir: String,
        executable_extensions: Vec<String>,
    },

    /// Disc images, flat or inside a folder carrying a game ID
    DiscImage {
        id_len: usize,
        #[serde(default)]
        folder_markers: Vec<String>,
    },

    /// Disc images plus the emulator's own installed-game directory
    InstalledPackage {
        id_len: usize,
        #[serde(default)]
        folder_markers: Vec<String>,
        install_dir: PathBuf,
        marker: String,
        /// Platform name for installed games when the ROM tree has no
        /// directory for this platform; the table key otherwise
        #[serde(default, skip_serializing_if = "Option::is_none")]
        display_name: Option<String>,
    },
}

impl StrategyKind {
    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::FlatFile => "flat-file",
            StrategyKind::DiscIndex { .. } => "disc-index",
            StrategyKind::NestedPackage { .. } => "nested-package",
            StrategyKind::DiscImage { .. } => "disc-image",
            StrategyKind::InstalledPackage { .. } => "installed-package",
        }
    }
}

/// Platform name (lowercase) to strategy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlatformTable(BTreeMap<String, StrategyKind>);

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for PlatformTable {
    fn default() -> Self {
        let mut table = BTreeMap::new();

        // PS1 family: list the .cue, not each .bin track
        for key in ["ps1", "playstation", "playstation1", "psx"] {
            table.insert(
                key.to_string(),
                StrategyKind::DiscIndex {
                    index_extensions: strings(&["cue"]),
                },
            );
        }

        // Wii U: <game>/code/<title>.rpx
        for key in ["wiiu", "wii u", "wii_u"] {
            table.insert(
                key.to_string(),
                StrategyKind::NestedPackage {
                    code_dir: "code".to_string(),
                    executable_extensions: strings(&["rpx"]),
                },
            );
        }

        // GameCube / Wii: six character IDs such as GALE01
        for key in ["gamecube", "gc", "wii"] {
            table.insert(
                key.to_string(),
                StrategyKind::DiscImage {
                    id_len: 6,
                    folder_markers: Vec::new(),
                },
            );
        }

        // PS3: nine character IDs such as BLUS30443, plus RPCS3 installs
        for key in ["ps3", "playstation3"] {
            table.insert(
                key.to_string(),
                StrategyKind::InstalledPackage {
                    id_len: 9,
                    folder_markers: strings(&["PS3_GAME", "PS3_DISC.SFB"]),
                    install_dir: PathBuf::from("Emulators/RPCS3/dev_hdd0/game"),
                    marker: "PARAM.SFO".to_string(),
                    display_name: Some("PS3".to_string()),
                },
            );
        }

        Self(table)
    }
}

impl PlatformTable {
    /// Empty table: every platform is scanned as flat files
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Register or replace a platform's strategy
    pub fn insert(&mut self, platform: &str, kind: StrategyKind) {
        self.0.insert(platform.to_lowercase(), kind);
    }

    /// Strategy for a platform directory name (case-insensitive)
    pub fn strategy_for(&self, platform: &str) -> StrategyKind {
        self.0
            .get(&platform.to_lowercase())
            .cloned()
            .unwrap_or(StrategyKind::FlatFile)
    }

    /// Configured platform names
    pub fn platforms(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Platform names and strategies, in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StrategyKind)> {
        self.0.iter().map(|(name, kind)| (name.as_str(), kind))
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        for (platform, kind) in &self.0 {
            match kind {
                StrategyKind::FlatFile => {}
                StrategyKind::DiscIndex { index_extensions } => {
                    if index_extensions.is_empty() {
                        return Err(ConfigError::Invalid(format!(
                            "platform {}: index_extensions is empty",
                            platform
                        )));
                    }
                }
                StrategyKind::NestedPackage {
                    code_dir,
                    executable_extensions,
                } => {
                    if code_dir.is_empty() || executable_extensions.is_empty() {
                        return Err(ConfigError::Invalid(format!(
                            "platform {}: code_dir and executable_extensions are required",
                            platform
                        )));
                    }
                }
                StrategyKind::DiscImage { id_len, .. } => {
                    if *id_len == 0 {
                        return Err(ConfigError::Invalid(format!(
                            "platform {}: id_len must be positive",
                            platform
                        )));
                    }
                }
                StrategyKind::InstalledPackage { id_len, marker, .. } => {
                    if *id_len == 0 || marker.is_empty() {
                        return Err(ConfigError::Invalid(format!(
                            "platform {}: id_len and marker are required",
                            platform
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}
