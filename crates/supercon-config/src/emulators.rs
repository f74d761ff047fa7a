//! Emulator table
//!
//! Which executable runs a platform's games, and the arguments placed before
//! the ROM path.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// One emulator command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmulatorEntry {
    /// Executable path, or a bare name resolved on PATH
    pub path: PathBuf,

    /// Arguments placed before the ROM path
    #[serde(default)]
    pub args: Vec<String>,
}

impl EmulatorEntry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: &[&str]) -> Self {
        self.args = args.iter().map(|a| a.to_string()).collect();
        self
    }
}

/// Platform name to emulator command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmulatorTable(BTreeMap<String, EmulatorEntry>);

impl Default for EmulatorTable {
    fn default() -> Self {
        let entries = [
            ("NES", EmulatorEntry::new("Emulators/FCEUX/fceux.exe")),
            ("SNES", EmulatorEntry::new("Emulators/Snes9x/snes9x.exe")),
            (
                "Nintendo64",
                EmulatorEntry::new("Emulators/Project64/Project64.exe"),
            ),
            ("GBA", EmulatorEntry::new("Emulators/mGBA/mGBA/mGBA.exe")),
            (
                "GameCube",
                EmulatorEntry::new("Emulators/Dolphin/Dolphin-x64/Dolphin.exe"),
            ),
            ("Wii", EmulatorEntry::new("Emulators/Dolphin/Dolphin.exe")),
            (
                "WiiU",
                EmulatorEntry::new("Emulators/Cemu/Cemu/Cemu.exe").with_args(&["-g"]),
            ),
            (
                "PS1",
                EmulatorEntry::new(
                    "Emulators/DuckStation/Duckstation/duckstation-qt-x64-ReleaseLTCG.exe",
                ),
            ),
            ("PS2", EmulatorEntry::new("Emulators/PCSX2/pcsx2-qt.exe")),
            // RPCS3 boots game folders as well as images
            ("PS3", EmulatorEntry::new("Emulators/RPCS3/rpcs3.exe")),
            ("Xbox", EmulatorEntry::new("Emulators/Xemu/xemu.exe")),
            ("Xbox360", EmulatorEntry::new("Emulators/Xenia/xenia.exe")),
        ];

        Self(
            entries
                .into_iter()
                .map(|(platform, entry)| (platform.to_string(), entry))
                .collect(),
        )
    }
}

impl EmulatorTable {
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, platform: impl Into<String>, entry: EmulatorEntry) {
        self.0.insert(platform.into(), entry);
    }

    /// Emulator for a platform, exact name first, then case-insensitive
    pub fn get(&self, platform: &str) -> Option<&EmulatorEntry> {
        self.0.get(platform).or_else(|| {
            self.0
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(platform))
                .map(|(_, entry)| entry)
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EmulatorEntry)> {
        self.0.iter().map(|(name, entry)| (name.as_str(), entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let table = EmulatorTable::default();
        assert_eq!(table.iter().count(), 12);

        let wiiu = table.get("WiiU").unwrap();
        assert_eq!(wiiu.args, vec!["-g".to_string()]);
        assert!(table.get("PS3").unwrap().args.is_empty());
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let table = EmulatorTable::default();
        assert_eq!(table.get("snes"), table.get("SNES"));
        assert!(table.get("Dreamcast").is_none());
    }
}
