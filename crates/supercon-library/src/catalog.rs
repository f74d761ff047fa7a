//! Catalog entries produced by a scan

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One launchable game found on disk
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Platform directory name, e.g. "SNES" or "PS3"
    pub platform: String,

    /// Display title, original casing kept
    pub title: String,

    /// File, disc image or folder handed to the emulator
    pub rom_path: PathBuf,

    /// Matched artwork or the default cover
    pub cover_path: PathBuf,
}

impl CatalogEntry {
    pub fn new(
        platform: impl Into<String>,
        title: impl Into<String>,
        rom_path: impl Into<PathBuf>,
        cover_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            platform: platform.into(),
            title: title.into(),
            rom_path: rom_path.into(),
            cover_path: cover_path.into(),
        }
    }

    /// What the launch collaborator needs
    pub fn launch_target(&self) -> (&str, &Path) {
        (&self.platform, &self.rom_path)
    }
}

/// Group entries by platform, platforms in first-seen order
pub fn group_by_platform(entries: &[CatalogEntry]) -> Vec<(&str, Vec<&CatalogEntry>)> {
    let mut groups: Vec<(&str, Vec<&CatalogEntry>)> = Vec::new();

    for entry in entries {
        match groups
            .iter_mut()
            .find(|(platform, _)| *platform == entry.platform)
        {
            Some((_, games)) => games.push(entry),
            None => groups.push((entry.platform.as_str(), vec![entry])),
        }
    }

    groups
}

/// Find an entry by platform (case-insensitive) and exact title
pub fn find_entry<'a>(
    entries: &'a [CatalogEntry],
    platform: &str,
    title: &str,
) -> Option<&'a CatalogEntry> {
    entries
        .iter()
        .find(|e| e.platform.eq_ignore_ascii_case(platform) && e.title == title)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(platform: &str, title: &str) -> CatalogEntry {
        CatalogEntry::new(
            platform,
            title,
            format!("ROMs/{}/{}.bin", platform, title),
            "assets/default_cover.png",
        )
    }

    #[test]
    fn test_group_by_platform_keeps_order() {
        let entries = vec![
            entry("SNES", "Zelda"),
            entry("GBA", "Metroid"),
            entry("SNES", "Mario"),
        ];

        let groups = group_by_platform(&entries);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "SNES");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[0].1[1].title, "Mario");
        assert_eq!(groups[1].0, "GBA");
    }

    #[test]
    fn test_find_entry() {
        let entries = vec![entry("SNES", "Zelda"), entry("GBA", "Zelda")];

        let found = find_entry(&entries, "gba", "Zelda").unwrap();
        assert_eq!(found.platform, "GBA");
        assert!(find_entry(&entries, "SNES", "zelda").is_none());
    }

    #[test]
    fn test_launch_target() {
        let e = entry("PS1", "Crash");
        let (platform, rom) = e.launch_target();
        assert_eq!(platform, "PS1");
        assert_eq!(rom, Path::new("ROMs/PS1/Crash.bin"));
    }
}
