//! Per-platform discovery strategies
//!
//! Every platform directory is handed to exactly one handler, chosen by its
//! [`StrategyKind`]. Handlers never fail: unreadable directories, folders
//! without the expected artifact and missing artwork all just contribute
//! nothing (or the default cover).

use crate::catalog::CatalogEntry;
use crate::covers::CoverResolver;
use crate::scanner::ScanConfig;
use crate::title::{split_game_id, strip_game_id};
use std::fs;
use std::path::{Path, PathBuf};
use supercon_config::StrategyKind;

/// Everything a handler needs to scan one platform
pub(crate) struct PlatformContext<'a> {
    pub platform: &'a str,
    pub rom_dir: &'a Path,
    pub cover_dir: &'a Path,
    pub covers: &'a CoverResolver,
    pub config: &'a ScanConfig,
}

impl PlatformContext<'_> {
    fn entry(&self, title: &str, rom_path: PathBuf, cover_path: PathBuf) -> CatalogEntry {
        CatalogEntry::new(self.platform, title, rom_path, cover_path)
    }

    fn list(&self, dir: &Path) -> Vec<fs::DirEntry> {
        list_dir(dir, self.config.skip_hidden)
    }

    fn is_rom_file(&self, path: &Path) -> bool {
        path.is_file()
            && extension_of(path).is_some_and(|ext| self.config.is_rom_extension(&ext))
    }
}

/// Run the handler for `kind`
pub(crate) fn discover(kind: &StrategyKind, ctx: &PlatformContext) -> Vec<CatalogEntry> {
    match kind {
        StrategyKind::FlatFile => flat_files(ctx, None),
        StrategyKind::DiscIndex { index_extensions } => {
            flat_files(ctx, Some(index_extensions.as_slice()))
        }
        StrategyKind::NestedPackage {
            code_dir,
            executable_extensions,
        } => {
            let mut entries = nested_packages(ctx, code_dir, executable_extensions);
            entries.extend(flat_files(ctx, None));
            entries
        }
        StrategyKind::DiscImage {
            id_len,
            folder_markers,
        } => disc_images(ctx, *id_len, folder_markers),
        // The install directory lives outside the ROM tree; the scanner
        // visits it once per scan, see `installed_packages`
        StrategyKind::InstalledPackage {
            id_len,
            folder_markers,
            ..
        } => disc_images(ctx, *id_len, folder_markers),
    }
}

fn list_dir(dir: &Path, skip_hidden: bool) -> Vec<fs::DirEntry> {
    match fs::read_dir(dir) {
        Ok(entries) => entries
            .flatten()
            .filter(|e| !(skip_hidden && e.file_name().to_string_lossy().starts_with('.')))
            .collect(),
        Err(e) => {
            tracing::debug!("Skipping {}: {}", dir.display(), e);
            Vec::new()
        }
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

fn file_name_of(entry: &fs::DirEntry) -> String {
    entry.file_name().to_string_lossy().into_owned()
}

fn matches_any(ext: &str, allowed: &[String]) -> bool {
    allowed.iter().any(|a| a.eq_ignore_ascii_case(ext))
}

/// ROM files directly under the platform directory.
///
/// `restrict` narrows the allow-list further, e.g. to `.cue` for PS1 so that
/// the `.bin` tracks of a disc are not listed one by one.
fn flat_files(ctx: &PlatformContext, restrict: Option<&[String]>) -> Vec<CatalogEntry> {
    let mut entries = Vec::new();

    for entry in ctx.list(ctx.rom_dir) {
        let path = entry.path();
        if !ctx.is_rom_file(&path) {
            continue;
        }

        if let Some(allowed) = restrict
            && !extension_of(&path).is_some_and(|ext| matches_any(&ext, allowed))
        {
            continue;
        }

        let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
            continue;
        };

        let title = strip_game_id(&stem);
        let cover = ctx.covers.resolve_cover(title, ctx.cover_dir);
        entries.push(ctx.entry(title, path, cover));
    }

    entries
}

/// Folder-per-game platforms: `<game>/<code_dir>/<exe>`.
///
/// The folder name is both the title and the artwork key.
fn nested_packages(
    ctx: &PlatformContext,
    code_dir: &str,
    executable_extensions: &[String],
) -> Vec<CatalogEntry> {
    let mut entries = Vec::new();

    for entry in ctx.list(ctx.rom_dir) {
        let folder = entry.path();
        if !folder.is_dir() {
            continue;
        }

        let name = file_name_of(&entry);
        match find_executable(ctx, &folder.join(code_dir), executable_extensions) {
            Some(executable) => {
                let cover = ctx.covers.resolve_cover(&name, ctx.cover_dir);
                entries.push(ctx.entry(&name, executable, cover));
            }
            None => tracing::debug!("No executable in {}, skipping", folder.display()),
        }
    }

    entries
}

fn find_executable(
    ctx: &PlatformContext,
    code_dir: &Path,
    executable_extensions: &[String],
) -> Option<PathBuf> {
    let mut found: Vec<PathBuf> = ctx
        .list(code_dir)
        .into_iter()
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && extension_of(p).is_some_and(|ext| matches_any(&ext, executable_extensions))
        })
        .collect();
    found.sort();

    if found.len() > 1 {
        tracing::debug!(
            "{} executables in {}, using {}",
            found.len(),
            code_dir.display(),
            found[0].display()
        );
    }

    found.into_iter().next()
}

/// Disc images, either flat or in a folder named after the game and its ID.
///
/// A folder counts when it holds a ROM file (the first by name becomes the
/// ROM path) or one of `folder_markers` (the folder itself is the ROM path).
fn disc_images(
    ctx: &PlatformContext,
    id_len: usize,
    folder_markers: &[String],
) -> Vec<CatalogEntry> {
    let mut entries = Vec::new();

    for entry in ctx.list(ctx.rom_dir) {
        let path = entry.path();

        if path.is_dir() {
            let name = file_name_of(&entry);
            match disc_folder_target(ctx, &path, folder_markers) {
                Some(rom_path) => entries.push(disc_entry(ctx, &name, rom_path, id_len)),
                None => tracing::debug!("No disc image in {}, skipping", path.display()),
            }
        } else if ctx.is_rom_file(&path)
            && let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().into_owned())
        {
            entries.push(disc_entry(ctx, &stem, path, id_len));
        }
    }

    entries
}

fn disc_folder_target(
    ctx: &PlatformContext,
    folder: &Path,
    folder_markers: &[String],
) -> Option<PathBuf> {
    let mut images: Vec<PathBuf> = ctx
        .list(folder)
        .into_iter()
        .map(|e| e.path())
        .filter(|p| ctx.is_rom_file(p))
        .collect();
    images.sort();

    if let Some(image) = images.into_iter().next() {
        return Some(image);
    }

    folder_markers
        .iter()
        .any(|marker| folder.join(marker).exists())
        .then(|| folder.to_path_buf())
}

/// Catalog entry for a disc name; artwork named after the game ID wins
fn disc_entry(ctx: &PlatformContext, name: &str, rom_path: PathBuf, id_len: usize) -> CatalogEntry {
    let (title, id) = split_game_id(name, id_len);

    let cover = id
        .and_then(|id| ctx.covers.find_exact(id, ctx.cover_dir))
        .unwrap_or_else(|| ctx.covers.resolve_cover(&title, ctx.cover_dir));

    ctx.entry(&title, rom_path, cover)
}

/// Games installed into the emulator's own directory, one per subdirectory
/// holding `marker`.
pub(crate) fn installed_packages(
    ctx: &PlatformContext,
    install_dir: &Path,
    marker: &str,
) -> Vec<CatalogEntry> {
    if !install_dir.is_dir() {
        tracing::debug!(
            "Install directory {} not present for {}",
            install_dir.display(),
            ctx.platform
        );
        return Vec::new();
    }

    let mut entries = Vec::new();

    for entry in ctx.list(install_dir) {
        let dir = entry.path();
        if !dir.is_dir() || !dir.join(marker).is_file() {
            continue;
        }

        let name = file_name_of(&entry);
        let cover = ctx.covers.resolve_cover(&name, ctx.cover_dir);
        entries.push(ctx.entry(&name, dir, cover));
    }

    tracing::debug!(
        "{} installed games in {}",
        entries.len(),
        install_dir.display()
    );
    entries
}
