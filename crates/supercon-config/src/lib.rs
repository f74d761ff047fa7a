//! Configuration management for the Super Console Launcher
//!
//! Handles library paths, scan settings, the platform strategy table and the
//! emulator table. Configuration lives in a TOML file that is overlaid on the
//! built-in defaults, so a file only needs to mention what it changes.

mod emulators;
mod platforms;

pub use emulators::{EmulatorEntry, EmulatorTable};
pub use platforms::{PlatformTable, StrategyKind};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Configuration file looked up in the working directory
pub const CONFIG_FILE: &str = "supercon.toml";

/// Maximum number of entries kept in the recently played list
pub const DEFAULT_MAX_RECENT: usize = 10;

/// Filesystem locations used by the launcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Root holding one directory per platform
    #[serde(default = "default_roms")]
    pub roms: PathBuf,

    /// Root holding one artwork directory per platform
    #[serde(default = "default_covers")]
    pub covers: PathBuf,

    /// Placeholder artwork, must exist
    #[serde(default = "default_cover")]
    pub default_cover: PathBuf,

    /// Directory for recent.json and favorites.json
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,
}

fn default_roms() -> PathBuf {
    PathBuf::from("ROMs")
}

fn default_covers() -> PathBuf {
    PathBuf::from("Covers")
}

fn default_cover() -> PathBuf {
    PathBuf::from("assets/default_cover.png")
}

fn default_state_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            roms: default_roms(),
            covers: default_covers(),
            default_cover: default_cover(),
            state_dir: default_state_dir(),
        }
    }
}

/// ROM scan settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSettings {
    /// Recognized ROM container extensions (lowercase, no dot)
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Platform directory names that never hold games
    #[serde(default = "default_skip_dirs")]
    pub skip_dirs: Vec<String>,

    /// Skip entries whose name starts with a dot
    #[serde(default = "default_skip_hidden")]
    pub skip_hidden: bool,

    /// Length of the recently played list
    #[serde(default = "default_max_recent")]
    pub max_recent: usize,
}

fn default_extensions() -> Vec<String> {
    [
        // Original launcher set
        "iso", "bin", "img", "n64", "smc", "gba", "gcn", "cue", "elf", "rpx",
        // Cartridge dumps
        "nes", "fds", "sfc", "z64", "v64", "gb", "gbc", "nds", "sms", "gg", "md", "gen", "32x",
        "pce",
        // Disc containers
        "chd", "cso", "pbp", "rvz", "gcm", "wbfs", "wud", "wux", "xex", "xiso",
        // Archives
        "zip", "7z",
    ]
    .iter()
    .map(|ext| ext.to_string())
    .collect()
}

fn default_skip_dirs() -> Vec<String> {
    ["bios", "saves", "states", "screenshots"]
        .iter()
        .map(|dir| dir.to_string())
        .collect()
}

fn default_skip_hidden() -> bool {
    true
}

fn default_max_recent() -> usize {
    DEFAULT_MAX_RECENT
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            skip_dirs: default_skip_dirs(),
            skip_hidden: default_skip_hidden(),
            max_recent: default_max_recent(),
        }
    }
}

/// Main launcher configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuperconConfig {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub scan: ScanSettings,

    #[serde(default)]
    pub platforms: PlatformTable,

    #[serde(default)]
    pub emulators: EmulatorTable,
}

impl SuperconConfig {
    /// Load configuration from a file, overlaid on the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let contents = std::fs::read_to_string(path)?;
        let mut overlay: toml::Table = toml::from_str(&contents)?;

        // Platform keys are matched case-insensitively; fold them before merging
        if let Some(toml::Value::Table(platforms)) = overlay.get_mut("platforms") {
            *platforms = std::mem::take(platforms)
                .into_iter()
                .map(|(key, value)| (key.to_lowercase(), value))
                .collect();
        }

        let mut merged = toml::Value::try_from(Self::default())?;
        merge_toml(&mut merged, toml::Value::Table(overlay));

        let config: Self = merged.try_into()?;
        config.validate()?;

        tracing::debug!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load `supercon.toml` from the working directory, or the defaults
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = Path::new(CONFIG_FILE);
        if path.exists() {
            return Self::load(path);
        }

        tracing::warn!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;
        tracing::info!("Configuration saved to {}", path.display());
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.scan.max_recent == 0 {
            return Err(ConfigError::Invalid(
                "scan.max_recent must be at least 1".to_string(),
            ));
        }
        self.platforms.validate()
    }
}

/// Helper function to merge TOML values
pub fn merge_toml(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                if let Some(base_value) = base_table.get_mut(&key) {
                    merge_toml(base_value, value);
                } else {
                    base_table.insert(key, value);
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = SuperconConfig::default();
        assert_eq!(config.paths.roms, PathBuf::from("ROMs"));
        assert_eq!(config.paths.covers, PathBuf::from("Covers"));
        assert_eq!(
            config.paths.default_cover,
            PathBuf::from("assets/default_cover.png")
        );
        assert_eq!(config.scan.max_recent, 10);
        assert!(config.scan.extensions.contains(&"cue".to_string()));
        assert!(config.scan.extensions.contains(&"rpx".to_string()));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(
            temp_file,
            r#"
[paths]
roms = "/games/roms"

[scan]
max_recent = 5
"#
        )
        .unwrap();

        let config = SuperconConfig::load(temp_file.path()).unwrap();
        assert_eq!(config.paths.roms, PathBuf::from("/games/roms"));
        assert_eq!(config.paths.covers, PathBuf::from("Covers"));
        assert_eq!(config.scan.max_recent, 5);
        assert!(!config.scan.extensions.is_empty());
        assert_eq!(
            config.platforms.strategy_for("PS1"),
            StrategyKind::DiscIndex {
                index_extensions: vec!["cue".to_string()]
            }
        );
        assert!(config.emulators.get("WiiU").is_some());
    }

    #[test]
    fn test_platform_override() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(
            temp_file,
            r#"
[platforms.saturn]
strategy = "disc-index"
index_extensions = ["cue", "m3u"]
"#
        )
        .unwrap();

        let config = SuperconConfig::load(temp_file.path()).unwrap();
        assert_eq!(
            config.platforms.strategy_for("Saturn"),
            StrategyKind::DiscIndex {
                index_extensions: vec!["cue".to_string(), "m3u".to_string()]
            }
        );
        // Built-in entries survive the overlay
        assert!(matches!(
            config.platforms.strategy_for("wiiu"),
            StrategyKind::NestedPackage { .. }
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = SuperconConfig::load(Path::new("/nonexistent/supercon.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_invalid_max_recent() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "[scan]\nmax_recent = 0\n").unwrap();

        let err = SuperconConfig::load(temp_file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("supercon.toml");

        let mut config = SuperconConfig::default();
        config.paths.state_dir = PathBuf::from("/var/lib/supercon");
        config.save(&path).unwrap();

        let loaded = SuperconConfig::load(&path).unwrap();
        assert_eq!(loaded.paths.state_dir, PathBuf::from("/var/lib/supercon"));
        assert_eq!(loaded.platforms, config.platforms);
    }

    #[test]
    fn test_merge_toml_tables() {
        let base_table = toml::toml! {
            [paths]
            roms = "ROMs"
            covers = "Covers"
        };
        let mut base = toml::Value::Table(base_table);

        let overlay_table = toml::toml! {
            [paths]
            roms = "/mnt/roms"
        };
        merge_toml(&mut base, toml::Value::Table(overlay_table));

        let paths = base.get("paths").unwrap().as_table().unwrap();
        assert_eq!(paths.get("roms").unwrap().as_str(), Some("/mnt/roms"));
        assert_eq!(paths.get("covers").unwrap().as_str(), Some("Covers"));
    }

    #[test]
    fn test_merge_toml_replaces_arrays() {
        let mut base = toml::Value::Array(vec![toml::Value::from("iso")]);
        let overlay = toml::Value::Array(vec![toml::Value::from("chd")]);

        merge_toml(&mut base, overlay);

        let items = base.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].as_str(), Some("chd"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::NotFound(PathBuf::from("supercon.toml"));
        assert!(format!("{}", err).contains("not found"));

        let err = ConfigError::Invalid("bad id_len".to_string());
        assert!(format!("{}", err).contains("Invalid"));
    }
}
