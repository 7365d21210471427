//! Text cleaning functions
//!
//! Each cleaner takes `&str` and returns a new `String`, so any of them can be
//! handed to [`Element::apply`](crate::Element::apply).

use crate::patterns::{is_bullet_glyph, MULTIPLE_SPACES};
use regex::Regex;

/// Strips a leading bullet glyph and the whitespace around it.
///
/// Text that does not start with a single bullet glyph is returned unchanged.
///
/// # Examples
///
/// ```
/// use docpart_core::cleaners::clean_bullets;
///
/// assert_eq!(clean_bullets("● An excellent point!"), "An excellent point!");
/// assert_eq!(clean_bullets("Not a list item"), "Not a list item");
/// ```
#[must_use = "returns the cleaned text"]
pub fn clean_bullets(text: &str) -> String {
    let trimmed = text.trim_start();
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next()) {
        (Some(first), second) if is_bullet_glyph(first) && !second.is_some_and(is_bullet_glyph) => {
            trimmed[first.len_utf8()..].trim().to_string()
        }
        _ => text.to_string(),
    }
}

/// Strips a leading ordered enumerator such as `1.1` or `a.b`.
///
/// The first whitespace-separated token must contain a dot, must not contain
/// `..`, and its first component must be at most two characters long.
#[must_use = "returns the cleaned text"]
pub fn clean_ordered_bullets(text: &str) -> String {
    let mut tokens = text.split_whitespace();
    let Some(first) = tokens.next() else {
        return text.to_string();
    };
    if !first.contains('.') || first.contains("..") {
        return text.to_string();
    }
    let leading = first.split('.').next().unwrap_or_default();
    if leading.chars().count() > 2 {
        return text.to_string();
    }
    tokens.collect::<Vec<_>>().join(" ")
}

/// Replaces non-breaking spaces and newlines with spaces, collapses runs of
/// spaces and trims.
///
/// # Examples
///
/// ```
/// use docpart_core::cleaners::clean_extra_whitespace;
///
/// assert_eq!(clean_extra_whitespace("ITEM 1.     \n\nBUSINESS"), "ITEM 1. BUSINESS");
/// ```
#[must_use = "returns the cleaned text"]
pub fn clean_extra_whitespace(text: &str) -> String {
    let replaced: String = text
        .chars()
        .map(|c| if matches!(c, '\u{a0}' | '\n') { ' ' } else { c })
        .collect();
    MULTIPLE_SPACES.replace_all(&replaced, " ").trim().to_string()
}

/// Replaces dashes (`-` and en dash) with spaces and trims.
#[must_use = "returns the cleaned text"]
pub fn clean_dashes(text: &str) -> String {
    text.replace(['-', '\u{2013}'], " ").trim().to_string()
}

/// Trims, then strips trailing `.`, `,`, `:` and `;`.
#[must_use = "returns the cleaned text"]
pub fn clean_trailing_punctuation(text: &str) -> String {
    text.trim()
        .trim_end_matches(['.', ',', ':', ';'])
        .to_string()
}

/// Mis-decoded quote sequences and their replacements.
const QUOTE_REPLACEMENTS: &[(&str, &str)] = &[
    ("\u{0091}", "\u{2018}"),
    ("\u{0092}", "\u{2019}"),
    ("\u{0093}", "\u{201C}"),
    ("\u{0094}", "\u{201D}"),
    ("&apos;", "'"),
    ("\u{00e2}\u{0080}\u{0099}", "'"),
    ("\u{00e2}\u{0080}\u{009c}", "\""),
    ("\u{00e2}\u{0080}\u{009d}", "\""),
    ("\u{00e2}\u{0080}\u{0098}", "'"),
    ("\u{00e2}\u{0080}\u{0094}", "\u{2014}"),
    ("\u{00e2}\u{0080}\u{0093}", "\u{2013}"),
    ("\u{00e2}\u{0080}\u{00a6}", "\u{2026}"),
];

/// Repairs quote characters that went through a Windows-1252/UTF-8 mix-up.
#[must_use = "returns the cleaned text"]
pub fn replace_unicode_quotes(text: &str) -> String {
    QUOTE_REPLACEMENTS
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
}

/// Drops every non-ASCII character.
#[must_use = "returns the cleaned text"]
pub fn clean_non_ascii_chars(text: &str) -> String {
    text.chars().filter(char::is_ascii).collect()
}

/// Removes a match of `pattern` anchored at the start of `text`.
///
/// With `strip`, leading whitespace left behind is removed as well.
#[must_use = "returns the cleaned text"]
pub fn clean_prefix(text: &str, pattern: &Regex, strip: bool) -> String {
    let cleaned = match pattern.find(text) {
        Some(found) if found.start() == 0 => &text[found.end()..],
        _ => text,
    };
    if strip {
        cleaned.trim_start().to_string()
    } else {
        cleaned.to_string()
    }
}

/// Removes the last match of `pattern` when it ends the text.
///
/// With `strip`, trailing whitespace left behind is removed as well.
#[must_use = "returns the cleaned text"]
pub fn clean_postfix(text: &str, pattern: &Regex, strip: bool) -> String {
    let cleaned = match pattern.find_iter(text).last() {
        Some(found) if found.end() == text.len() => &text[..found.start()],
        _ => text,
    };
    if strip {
        cleaned.trim_end().to_string()
    } else {
        cleaned.to_string()
    }
}

/// Which steps [`clean`] runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanOptions {
    pub extra_whitespace: bool,
    pub dashes: bool,
    pub bullets: bool,
    pub trailing_punctuation: bool,
    pub lowercase: bool,
}

impl CleanOptions {
    #[inline]
    #[must_use = "returns options with extra whitespace cleaning configured"]
    pub const fn with_extra_whitespace(mut self, enable: bool) -> Self {
        self.extra_whitespace = enable;
        self
    }

    #[inline]
    #[must_use = "returns options with dash cleaning configured"]
    pub const fn with_dashes(mut self, enable: bool) -> Self {
        self.dashes = enable;
        self
    }

    #[inline]
    #[must_use = "returns options with bullet cleaning configured"]
    pub const fn with_bullets(mut self, enable: bool) -> Self {
        self.bullets = enable;
        self
    }

    #[inline]
    #[must_use = "returns options with trailing punctuation cleaning configured"]
    pub const fn with_trailing_punctuation(mut self, enable: bool) -> Self {
        self.trailing_punctuation = enable;
        self
    }

    #[inline]
    #[must_use = "returns options with lowercasing configured"]
    pub const fn with_lowercase(mut self, enable: bool) -> Self {
        self.lowercase = enable;
        self
    }
}

/// Runs the selected cleaners in a fixed order: lowercase, trailing
/// punctuation, dashes, extra whitespace, bullets. The result is trimmed.
#[must_use = "returns the cleaned text"]
pub fn clean(text: &str, options: CleanOptions) -> String {
    let mut cleaned = if options.lowercase {
        text.to_lowercase()
    } else {
        text.to_string()
    };
    if options.trailing_punctuation {
        cleaned = clean_trailing_punctuation(&cleaned);
    }
    if options.dashes {
        cleaned = clean_dashes(&cleaned);
    }
    if options.extra_whitespace {
        cleaned = clean_extra_whitespace(&cleaned);
    }
    if options.bullets {
        cleaned = clean_bullets(&cleaned);
    }
    cleaned.trim().to_string()
}
