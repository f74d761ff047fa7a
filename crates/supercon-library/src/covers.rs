//! Cover art resolution
//!
//! Lookup order for a title inside a platform's artwork directory:
//! 1. `{title}.jpg` / `{title}.png`
//! 2. any `.jpg` / `.png` whose normalized stem equals the normalized title
//! 3. the default cover

use crate::LibraryError;
use crate::title::normalize;
use std::fs;
use std::path::{Path, PathBuf};

/// Artwork file extensions, in lookup order
pub const COVER_EXTENSIONS: [&str; 2] = ["jpg", "png"];

fn has_cover_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            COVER_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Finds artwork for catalog entries
#[derive(Debug, Clone)]
pub struct CoverResolver {
    default_cover: PathBuf,
}

impl CoverResolver {
    /// Create a resolver; the default cover must already exist
    pub fn new(default_cover: impl Into<PathBuf>) -> Result<Self, LibraryError> {
        let default_cover = default_cover.into();

        if !default_cover.is_file() {
            return Err(LibraryError::DefaultCoverMissing(default_cover));
        }

        Ok(Self { default_cover })
    }

    /// Placeholder returned when nothing matches
    pub fn default_cover(&self) -> &Path {
        &self.default_cover
    }

    /// Best cover for `title` in `cover_dir`, never empty
    pub fn resolve_cover(&self, title: &str, cover_dir: &Path) -> PathBuf {
        self.find_exact(title, cover_dir)
            .or_else(|| self.find_fuzzy(title, cover_dir))
            .unwrap_or_else(|| self.default_cover.clone())
    }

    /// `{key}.jpg` or `{key}.png` inside `cover_dir`
    pub fn find_exact(&self, key: &str, cover_dir: &Path) -> Option<PathBuf> {
        if key.is_empty() {
            return None;
        }

        COVER_EXTENSIONS
            .iter()
            .map(|ext| cover_dir.join(format!("{}.{}", key, ext)))
            .find(|path| path.is_file())
    }

    /// First artwork file, by sorted name, whose normalized stem matches
    pub fn find_fuzzy(&self, title: &str, cover_dir: &Path) -> Option<PathBuf> {
        let target = normalize(title);
        if target.is_empty() {
            return None;
        }

        let entries = match fs::read_dir(cover_dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!("No covers in {}: {}", cover_dir.display(), e);
                return None;
            }
        };

        let mut candidates: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && has_cover_extension(path))
            .collect();
        candidates.sort();

        candidates.into_iter().find(|path| {
            path.file_stem()
                .is_some_and(|stem| normalize(&stem.to_string_lossy()) == target)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, CoverResolver, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let placeholder = temp_dir.path().join("default_cover.png");
        fs::write(&placeholder, b"PNG").unwrap();

        let cover_dir = temp_dir.path().join("covers");
        fs::create_dir_all(&cover_dir).unwrap();

        let resolver = CoverResolver::new(&placeholder).unwrap();
        (temp_dir, resolver, cover_dir)
    }

    #[test]
    fn test_missing_default_cover_fails_fast() {
        let err = CoverResolver::new("/nonexistent/default_cover.png").unwrap_err();
        assert!(matches!(err, LibraryError::DefaultCoverMissing(_)));
    }

    #[test]
    fn test_exact_match_wins() {
        let (_temp, resolver, cover_dir) = setup();
        fs::write(cover_dir.join("Foo.jpg"), b"JPG").unwrap();
        fs::write(cover_dir.join("foo.png"), b"PNG").unwrap();

        assert_eq!(resolver.resolve_cover("Foo", &cover_dir), cover_dir.join("Foo.jpg"));
    }

    #[test]
    fn test_png_exact_match() {
        let (_temp, resolver, cover_dir) = setup();
        fs::write(cover_dir.join("Metroid.png"), b"PNG").unwrap();

        assert_eq!(
            resolver.resolve_cover("Metroid", &cover_dir),
            cover_dir.join("Metroid.png")
        );
    }

    #[test]
    fn test_fuzzy_match() {
        let (_temp, resolver, cover_dir) = setup();
        fs::write(cover_dir.join("super_mario_64.PNG"), b"PNG").unwrap();
        fs::write(cover_dir.join("super mario 64.txt"), b"TXT").unwrap();

        assert_eq!(
            resolver.resolve_cover("Super Mario 64 (USA) [!]", &cover_dir),
            cover_dir.join("super_mario_64.PNG")
        );
    }

    #[test]
    fn test_fuzzy_tie_break_is_sorted() {
        let (_temp, resolver, cover_dir) = setup();
        fs::write(cover_dir.join("zelda (europe).jpg"), b"JPG").unwrap();
        fs::write(cover_dir.join("Zelda (USA).png"), b"PNG").unwrap();

        assert_eq!(
            resolver.resolve_cover("Zelda", &cover_dir),
            cover_dir.join("Zelda (USA).png")
        );
    }

    #[test]
    fn test_fallback_on_empty_dir() {
        let (_temp, resolver, cover_dir) = setup();

        let cover = resolver.resolve_cover("Anything", &cover_dir);
        assert_eq!(cover, resolver.default_cover());
        assert!(cover.exists());
    }

    #[test]
    fn test_fallback_on_missing_dir() {
        let (temp, resolver, _cover_dir) = setup();

        let cover = resolver.resolve_cover("Anything", &temp.path().join("nope"));
        assert_eq!(cover, resolver.default_cover());
    }

    #[test]
    fn test_untitled_never_fuzzy_matches() {
        let (_temp, resolver, cover_dir) = setup();
        fs::write(cover_dir.join("[!].png"), b"PNG").unwrap();

        assert_eq!(
            resolver.resolve_cover("(Demo)", &cover_dir),
            resolver.default_cover()
        );
    }
}
