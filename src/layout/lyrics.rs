//! Lyric text transforms
//!
//! Every function returns new text; the song AST is never edited in place.

use once_cell::sync::Lazy;
use regex::Regex;

/// `word - word` and `wo- rd` inside one fragment
static INNER_HYPHEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\S)(?:\s+-|-)\s+").expect("inner hyphen pattern is valid"));

/// Hyphens (and the spaces around them) dangling at the end of a fragment
static TRAILING_HYPHEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*-[\s-]*$").expect("trailing hyphen pattern is valid"));

/// At least one hyphen and nothing else but whitespace
static HYPHENS_ONLY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*-[\s-]*$").expect("hyphen-only pattern is valid"));

/// Split a lyric after every `", "` so each phrase becomes breakable
///
/// The separator stays on the fragment before it:
/// `"be, let it be"` → `["be, ", "let it be"]`.
pub fn split_on_commas(lyrics: &str) -> Vec<&str> {
    lyrics.split_inclusive(", ").collect()
}

/// Remove syllable hyphens for lyrics-only display
///
/// - `"wo - rd"` / `"wo- rd"` → `"word"`
/// - `"wo-"`, `"wo - "` → `"wo"` (joins with the next fragment)
/// - `" - "` → `""`
/// - `" "` stays `" "` (it still separates words)
///
/// Hyphens inside a word (`"well-known"`) are kept.
pub fn remove_hyphens(lyrics: &str) -> String {
    if HYPHENS_ONLY.is_match(lyrics) {
        return String::new();
    }

    let joined = INNER_HYPHEN.replace_all(lyrics, "$1");
    TRAILING_HYPHEN.replace(&joined, "").into_owned()
}

/// Uppercase the first non-whitespace character
pub fn capitalize_first(lyrics: &str) -> String {
    let Some((index, first)) = lyrics.char_indices().find(|(_, ch)| !ch.is_whitespace()) else {
        return lyrics.to_string();
    };

    let mut result = String::with_capacity(lyrics.len());
    result.push_str(&lyrics[..index]);
    result.extend(first.to_uppercase());
    result.push_str(&lyrics[index + first.len_utf8()..]);
    result
}

/// Drop a trailing comma (and the whitespace after it); other text is unchanged
pub fn trim_trailing_comma(lyrics: &str) -> String {
    match lyrics.trim_end().strip_suffix(',') {
        Some(trimmed) => trimmed.to_string(),
        None => lyrics.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_on_commas_keeps_separator_on_left() {
        assert_eq!(
            split_on_commas("Let it be, let it be, let it"),
            vec!["Let it be, ", "let it be, ", "let it"]
        );
        assert_eq!(split_on_commas("no commas"), vec!["no commas"]);
        assert_eq!(split_on_commas("1,2"), vec!["1,2"]);
        assert!(split_on_commas("").is_empty());
    }

    #[test]
    fn test_remove_hyphens_joins_syllables() {
        assert_eq!(remove_hyphens("wo - rd"), "word");
        assert_eq!(remove_hyphens("wo- rd"), "word");
        assert_eq!(remove_hyphens("a - b - c"), "abc");
    }

    #[test]
    fn test_remove_hyphens_strips_dangling_hyphens() {
        assert_eq!(remove_hyphens("wo-"), "wo");
        assert_eq!(remove_hyphens("wo - "), "wo");
        assert_eq!(remove_hyphens("wo -"), "wo");
        assert_eq!(remove_hyphens("wo--"), "wo");
    }

    #[test]
    fn test_remove_hyphens_empties_hyphen_only_fragments() {
        assert_eq!(remove_hyphens(" - "), "");
        assert_eq!(remove_hyphens("-"), "");
        assert_eq!(remove_hyphens(" -- "), "");
    }

    #[test]
    fn test_remove_hyphens_keeps_whitespace_fragments() {
        assert_eq!(remove_hyphens(" "), " ");
        assert_eq!(remove_hyphens("   "), "   ");
        assert_eq!(remove_hyphens(""), "");
    }

    #[test]
    fn test_remove_hyphens_keeps_plain_text() {
        assert_eq!(remove_hyphens("well-known song "), "well-known song ");
        assert_eq!(remove_hyphens("hello "), "hello ");
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("let it be"), "Let it be");
        assert_eq!(capitalize_first("  über"), "  Über");
        assert_eq!(capitalize_first("Already"), "Already");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn test_trim_trailing_comma() {
        assert_eq!(trim_trailing_comma("be, "), "be");
        assert_eq!(trim_trailing_comma("be,"), "be");
        assert_eq!(trim_trailing_comma("be "), "be ");
        assert_eq!(trim_trailing_comma("1,2"), "1,2");
    }
}
