//! Title normalization and game-ID extraction
//!
//! ROM sets tag file names with regions, revisions and dump flags such as
//! `(USA)`, `(Rev 1)` or `[!]`, and disc-based platforms often carry a game ID
//! (`[BLUS30443]`, `GALE01`). Normalized titles are the comparison key for
//! fuzzy cover matching.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// Uppercase product codes (`BLUS30443`, `SLUS-00594`) or long hex title IDs
/// in either case (`0100abc000`)
const ID_PATTERN: &str = r"[A-Z0-9-]{4,}|[0-9A-Fa-f]{8,}";

static RE_TAGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(.*?\)|\[.*?\]").unwrap());
static RE_TRAIL_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^(.*?)\s*\[({})\]\s*$", ID_PATTERN)).unwrap()
});
static RE_ANY_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"\[({})\]", ID_PATTERN)).unwrap());

/// Reduce a file or folder name to its comparison key.
///
/// Dashes and underscores become spaces, `(...)` and `[...]` groups are
/// dropped, anything but ASCII letters, digits and spaces is removed, and the
/// result is trimmed and lowercased.
pub fn normalize(raw: &str) -> String {
    let spaced = raw.replace(['-', '_'], " ");
    let untagged = RE_TAGS.replace_all(&spaced, "");

    let kept: String = untagged
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .collect();

    kept.trim().to_lowercase()
}

fn has_digit(token: &str) -> bool {
    token.bytes().any(|b| b.is_ascii_digit())
}

/// Split a trailing bracketed game ID off a name.
///
/// `"Demon's Souls [BLUS30443]"` gives `("Demon's Souls", "BLUS30443")`.
/// Dump flags like `[!]` or `[b1]` are not IDs.
pub fn split_bracketed_id(name: &str) -> Option<(&str, &str)> {
    let caps = RE_TRAIL_ID.captures(name)?;
    let title = caps.get(1)?.as_str().trim_end();
    let id = caps.get(2)?.as_str();

    has_digit(id).then_some((title, id))
}

/// Take the last word of a name as a game ID when it has exactly `id_len`
/// uppercase letters or digits.
///
/// `"Wind Waker GZLE01"` with `id_len = 6` gives `("Wind Waker", "GZLE01")`.
pub fn infer_game_id(name: &str, id_len: usize) -> Option<(&str, &str)> {
    let (head, last) = name.trim_end().rsplit_once(char::is_whitespace)?;
    let head = head.trim_end();

    let is_id = last.len() == id_len
        && last
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        && has_digit(last);

    (is_id && !head.is_empty()).then_some((head, last))
}

/// Last bracketed game ID anywhere in a name, with the group cut out of the
/// title.
///
/// `"Melee [GALE01] (USA)"` gives `("Melee (USA)", "GALE01")`.
pub fn find_bracketed_id(name: &str) -> Option<(Cow<'_, str>, &str)> {
    let caps = RE_ANY_ID
        .captures_iter(name)
        .filter(|caps| has_digit(&caps[1]))
        .last()?;
    let group = caps.get(0)?;
    let id = caps.get(1)?.as_str();

    let before = name[..group.start()].trim_end();
    let after = name[group.end()..].trim_start();

    let title = match (before.is_empty(), after.is_empty()) {
        (_, true) => Cow::Borrowed(before),
        (true, false) => Cow::Borrowed(after.trim_end()),
        (false, false) => Cow::Owned(format!("{} {}", before, after.trim_end())),
    };

    Some((title, id))
}

/// Title and game ID of a disc-image name: a bracketed ID anywhere in the
/// name first, then the fixed-length last word.
pub fn split_game_id(name: &str, id_len: usize) -> (Cow<'_, str>, Option<&str>) {
    let found = find_bracketed_id(name)
        .or_else(|| infer_game_id(name, id_len).map(|(title, id)| (Cow::Borrowed(title), id)));

    match found {
        Some((title, id)) if title.is_empty() => (Cow::Borrowed(id), Some(id)),
        Some((title, id)) => (title, Some(id)),
        None => (Cow::Borrowed(name), None),
    }
}

/// Display title for a flat ROM file: the stem without a trailing game ID.
pub fn strip_game_id(stem: &str) -> &str {
    match split_bracketed_id(stem) {
        Some((title, _)) if !title.is_empty() => title,
        _ => stem,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_tags() {
        assert_eq!(normalize("Super Mario 64 (USA) [!]"), "super mario 64");
        assert_eq!(normalize("super-mario-64"), "super mario 64");
        assert_eq!(
            normalize("Super Mario 64 (USA) [!]"),
            normalize("super-mario-64")
        );
    }

    #[test]
    fn test_normalize_punctuation_and_case() {
        assert_eq!(normalize("The_Legend_of_Zelda"), "the legend of zelda");
        assert_eq!(normalize("Pokémon: Red!"), "pokmon red");
        assert_eq!(normalize("  Metroid Prime (Rev 2)  "), "metroid prime");
        assert_eq!(normalize("Zelda (Europe) (En,Fr,De)"), "zelda");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "Super Mario 64 (USA) [!]",
            "Final Fantasy VII (Disc 1) (Track 02)",
            "a (b (c) d) e",
            "unbalanced (paren",
            "[BLUS30443] Demon's Souls",
            "---___",
            "Ōkami HD",
            "Tom Clancy's Splinter-Cell",
        ];

        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn test_split_bracketed_id() {
        assert_eq!(
            split_bracketed_id("Demon's Souls [BLUS30443]"),
            Some(("Demon's Souls", "BLUS30443"))
        );
        assert_eq!(
            split_bracketed_id("Crash Bandicoot [SCUS-94900]"),
            Some(("Crash Bandicoot", "SCUS-94900"))
        );
        assert_eq!(split_bracketed_id("Zelda (USA) [!]"), None);
        assert_eq!(split_bracketed_id("Game [ABCD]"), None);
        assert_eq!(split_bracketed_id("Game [BLUS30443] (USA)"), None);
        assert_eq!(split_bracketed_id("[GALE01]"), Some(("", "GALE01")));
    }

    #[test]
    fn test_infer_game_id() {
        assert_eq!(
            infer_game_id("Wind Waker GZLE01", 6),
            Some(("Wind Waker", "GZLE01"))
        );
        assert_eq!(infer_game_id("Wind Waker GZLE01", 9), None);
        assert_eq!(infer_game_id("Star Fox ASSAULT", 7), None);
        assert_eq!(infer_game_id("Mario gale01", 6), None);
        assert_eq!(infer_game_id("GZLE01", 6), None);
    }

    #[test]
    fn test_split_bracketed_hex_id() {
        assert_eq!(
            split_bracketed_id("Game [0100abc000]"),
            Some(("Game", "0100abc000"))
        );
        assert_eq!(
            split_bracketed_id("Game [0100ABC000001000]"),
            Some(("Game", "0100ABC000001000"))
        );
        // Short lowercase groups stay dump flags
        assert_eq!(split_bracketed_id("Game [b1f2]"), None);
    }

    fn split(name: &str, id_len: usize) -> (String, Option<&str>) {
        let (title, id) = split_game_id(name, id_len);
        (title.into_owned(), id)
    }

    #[test]
    fn test_split_game_id_prefers_brackets() {
        assert_eq!(split("Melee [GALE01]", 6), ("Melee".to_string(), Some("GALE01")));
        assert_eq!(split("Melee GALE01", 6), ("Melee".to_string(), Some("GALE01")));
        assert_eq!(split("[GALE01]", 6), ("GALE01".to_string(), Some("GALE01")));
        assert_eq!(split("Melee", 6), ("Melee".to_string(), None));
    }

    #[test]
    fn test_split_game_id_inside_name() {
        assert_eq!(
            split("Melee [GALE01] (USA)", 6),
            ("Melee (USA)".to_string(), Some("GALE01"))
        );
        assert_eq!(
            split("[BLUS30443] Demon's Souls", 9),
            ("Demon's Souls".to_string(), Some("BLUS30443"))
        );
        // The last qualifying group wins; dump flags are left alone
        assert_eq!(
            split("Game [!] [SLUS-00594] [b]", 9),
            ("Game [!] [b]".to_string(), Some("SLUS-00594"))
        );
    }

    #[test]
    fn test_find_bracketed_id() {
        let (title, id) = find_bracketed_id("Melee [GALE01] (USA)").unwrap();
        assert_eq!(title, "Melee (USA)");
        assert_eq!(id, "GALE01");
        assert!(find_bracketed_id("Zelda (USA) [!]").is_none());
    }

    #[test]
    fn test_strip_game_id() {
        assert_eq!(strip_game_id("Demon's Souls [BLUS30443]"), "Demon's Souls");
        assert_eq!(strip_game_id("Zelda (USA) [!]"), "Zelda (USA) [!]");
        assert_eq!(strip_game_id("[BLUS30443]"), "[BLUS30443]");
    }
}
