//! ROM scanning functionality

use crate::catalog::CatalogEntry;
use crate::covers::CoverResolver;
use crate::strategy::{self, PlatformContext};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use supercon_config::{PlatformTable, ScanSettings, StrategyKind, SuperconConfig};
use thiserror::Error;

/// Problem that leaves the catalog incomplete without stopping the scan
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanIssue {
    #[error("ROM directory {} is not readable: {reason}", .path.display())]
    RomRootUnreadable { path: PathBuf, reason: String },

    #[error("Cover directory {} is not readable: {reason}", .path.display())]
    CoverRootUnreadable { path: PathBuf, reason: String },
}

/// Result of a ROM scan
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Catalog in platform-then-discovery order
    pub entries: Vec<CatalogEntry>,
    pub platforms_scanned: usize,
    pub issues: Vec<ScanIssue>,
    pub duration_ms: u64,
}

impl ScanResult {
    /// True when both roots were readable
    pub fn is_complete(&self) -> bool {
        self.issues.is_empty()
    }
}

/// ROM scanner configuration
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// File extensions to scan (lowercase)
    pub extensions: HashSet<String>,

    /// Platform directories to skip (lowercase)
    pub skip_dirs: HashSet<String>,

    /// Skip hidden files/directories
    pub skip_hidden: bool,

    /// Strategy per platform
    pub platforms: PlatformTable,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::from_settings(&ScanSettings::default(), PlatformTable::default())
    }
}

impl ScanConfig {
    pub fn from_settings(settings: &ScanSettings, platforms: PlatformTable) -> Self {
        Self {
            extensions: settings
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            skip_dirs: settings
                .skip_dirs
                .iter()
                .map(|dir| dir.to_lowercase())
                .collect(),
            skip_hidden: settings.skip_hidden,
            platforms,
        }
    }

    pub fn from_config(config: &SuperconConfig) -> Self {
        Self::from_settings(&config.scan, config.platforms.clone())
    }

    /// Whether a lowercase extension is a recognized ROM container
    pub fn is_rom_extension(&self, ext: &str) -> bool {
        self.extensions.contains(ext)
    }

    fn is_skipped_platform(&self, name: &str) -> bool {
        (self.skip_hidden && name.starts_with('.'))
            || self.skip_dirs.contains(&name.to_lowercase())
    }
}

/// ROM scanner
pub struct RomScanner {
    config: ScanConfig,
    covers: CoverResolver,
}

impl RomScanner {
    /// Create a new scanner with default config
    pub fn new(covers: CoverResolver) -> Self {
        Self::with_config(ScanConfig::default(), covers)
    }

    /// Create with custom config
    pub fn with_config(config: ScanConfig, covers: CoverResolver) -> Self {
        Self { config, covers }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn covers(&self) -> &CoverResolver {
        &self.covers
    }

    /// Scan every platform directory under `rom_root`, then every emulator
    /// install directory named by the platform table.
    ///
    /// Never fails: an unreadable root is reported in [`ScanResult::issues`]
    /// and whatever could be read is returned.
    pub fn scan(&self, rom_root: &Path, cover_root: &Path) -> ScanResult {
        let started = Instant::now();
        let mut result = ScanResult::default();

        if let Err(e) = fs::read_dir(cover_root) {
            tracing::warn!("Cover directory {} unreadable: {}", cover_root.display(), e);
            result.issues.push(ScanIssue::CoverRootUnreadable {
                path: cover_root.to_path_buf(),
                reason: e.to_string(),
            });
        }

        // Install directory -> ROM directory name of the same platform
        let mut install_owners: Vec<(PathBuf, String)> = Vec::new();

        match fs::read_dir(rom_root) {
            Ok(platforms) => {
                for entry in platforms.flatten() {
                    let path = entry.path();
                    if !path.is_dir() {
                        continue;
                    }

                    let platform = entry.file_name().to_string_lossy().into_owned();
                    if self.config.is_skipped_platform(&platform) {
                        tracing::debug!("Skipping directory {}", path.display());
                        continue;
                    }

                    let games = self.scan_platform(&platform, &path, &cover_root.join(&platform));
                    result.platforms_scanned += 1;
                    result.entries.extend(games);

                    if let StrategyKind::InstalledPackage { install_dir, .. } =
                        self.config.platforms.strategy_for(&platform)
                        && !install_owners.iter().any(|(dir, _)| *dir == install_dir)
                    {
                        install_owners.push((install_dir, platform));
                    }
                }
            }
            Err(e) => {
                tracing::warn!("ROM directory {} unreadable: {}", rom_root.display(), e);
                result.issues.push(ScanIssue::RomRootUnreadable {
                    path: rom_root.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        }

        let installed = self.scan_installed(rom_root, cover_root, &install_owners);
        result.entries.extend(installed);

        result.duration_ms = started.elapsed().as_millis() as u64;
        tracing::info!(
            "Scanned {} platforms: {} games in {} ms",
            result.platforms_scanned,
            result.entries.len(),
            result.duration_ms
        );

        result
    }

    /// Games installed into emulator-managed directories, each directory
    /// visited once however many platform names share it.
    ///
    /// Entries take the name of the platform's ROM directory when one was
    /// scanned, else the strategy's display name, else the table key.
    fn scan_installed(
        &self,
        rom_root: &Path,
        cover_root: &Path,
        install_owners: &[(PathBuf, String)],
    ) -> Vec<CatalogEntry> {
        let mut visited: Vec<&Path> = Vec::new();
        let mut entries = Vec::new();

        for (key, kind) in self.config.platforms.iter() {
            let StrategyKind::InstalledPackage {
                install_dir,
                marker,
                display_name,
                ..
            } = kind
            else {
                continue;
            };

            if visited.contains(&install_dir.as_path()) {
                continue;
            }
            visited.push(install_dir.as_path());

            let platform = install_owners
                .iter()
                .find(|(dir, _)| dir == install_dir)
                .map(|(_, name)| name.as_str())
                .or(display_name.as_deref())
                .unwrap_or(key);

            let rom_dir = rom_root.join(platform);
            let cover_dir = cover_root.join(platform);
            let ctx = PlatformContext {
                platform,
                rom_dir: &rom_dir,
                cover_dir: &cover_dir,
                covers: &self.covers,
                config: &self.config,
            };
            entries.extend(strategy::installed_packages(&ctx, install_dir, marker));
        }

        entries
    }

    /// Scan a single platform directory. Emulator install directories are
    /// only visited by [`RomScanner::scan`].
    pub fn scan_platform(
        &self,
        platform: &str,
        rom_dir: &Path,
        cover_dir: &Path,
    ) -> Vec<CatalogEntry> {
        let kind = self.config.platforms.strategy_for(platform);
        let ctx = PlatformContext {
            platform,
            rom_dir,
            cover_dir,
            covers: &self.covers,
            config: &self.config,
        };

        let games = strategy::discover(&kind, &ctx);
        tracing::debug!(
            "{}: {} games ({} strategy)",
            platform,
            games.len(),
            kind.name()
        );
        games
    }
}
