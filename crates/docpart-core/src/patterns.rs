//! Fixed-form patterns shared by the classifiers, cleaners and extractors

use once_cell::sync::Lazy;
use regex::Regex;

/// Glyphs that mark a bulleted line.
pub const UNICODE_BULLETS: &[char] = &[
    '\u{0095}', '\u{2022}', '\u{2023}', '\u{2043}', '\u{3164}', '\u{204C}', '\u{204D}',
    '\u{2219}', '\u{25CB}', '\u{25CF}', '\u{25D8}', '\u{25E6}', '\u{2619}', '\u{2765}',
    '\u{2767}', '\u{29BE}', '\u{29BF}', '-', '\u{F0B7}', '*', '\u{00B7}',
];

/// True if `c` is one of [`UNICODE_BULLETS`].
#[inline]
#[must_use = "returns whether the character is a bullet glyph"]
pub fn is_bullet_glyph(c: char) -> bool {
    UNICODE_BULLETS.contains(&c)
}

const US_STATE_NAMES: &[&str] = &[
    "Alabama", "Alaska", "Arizona", "Arkansas", "California", "Colorado", "Connecticut",
    "Delaware", "District of Columbia", "Florida", "Georgia", "Hawaii", "Idaho", "Illinois",
    "Indiana", "Iowa", "Kansas", "Kentucky", "Louisiana", "Maine", "Maryland", "Massachusetts",
    "Michigan", "Minnesota", "Mississippi", "Missouri", "Montana", "Nebraska", "Nevada",
    "New Hampshire", "New Jersey", "New Mexico", "New York", "North Carolina", "North Dakota",
    "Ohio", "Oklahoma", "Oregon", "Pennsylvania", "Rhode Island", "South Carolina",
    "South Dakota", "Tennessee", "Texas", "Utah", "Vermont", "Virginia", "Washington",
    "West Virginia", "Wisconsin", "Wyoming",
];

const US_STATE_ABBREVIATIONS: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH",
    "NJ", "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY",
];

/// `City, State 12345` or `City, ST 12345-6789` on a single line.
pub static US_CITY_STATE_ZIP: Lazy<Regex> = Lazy::new(|| {
    let states = US_STATE_NAMES
        .iter()
        .chain(US_STATE_ABBREVIATIONS)
        .map(|state| state.replace(' ', r"\s+"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(
        r"(?i)^(?:[A-Z][A-Z.\-]{{1,15}}\s?){{1,5}},\s?(?:{states})\.?\s?\d{{5}}(?:-\d{{4}})?$"
    ))
    .expect("Invalid US city/state/zip regex")
});

/// A permissive email address.
pub static EMAIL_ADDRESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)[a-z0-9\.\-+_]+@[a-z0-9\.\-+_]+\.[a-z]+").expect("Invalid email regex")
});

/// An email address filling the whole input.
pub static EMAIL_ADDRESS_ONLY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[a-z0-9\.\-+_]+@[a-z0-9\.\-+_]+\.[a-z]+$").expect("Invalid email regex")
});

/// 10-digit US phone number with optional country code and extension.
pub static US_PHONE_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:\+?(\d{1,3}))?[-. (]*(\d{3})?[-. )]*(\d{3})[-. ]*(\d{4})(?: *x(\d+))?\s*$",
    )
    .expect("Invalid US phone number regex")
});

/// A US phone number anchored at the start of the input.
pub static US_PHONE_NUMBER_ONLY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:\+?(\d{1,3}))?[-. (]*(\d{3})?[-. )]*(\d{3})[-. ]*(\d{4})(?: *x(\d+))?\s*$",
    )
    .expect("Invalid US phone number regex")
});

/// IPv4 addresses and colon-separated IPv6 addresses.
pub static IP_ADDRESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:(?:25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)\.){3}(?:25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)\b|\b(?:[0-9A-Fa-f]{1,4}:){7}[0-9A-Fa-f]{1,4}\b|(?:[0-9A-Fa-f]{1,4}:){1,7}:(?:[0-9A-Fa-f]{1,4})?",
    )
    .expect("Invalid IP address regex")
});

/// Host names of the `name.domain.tld` shape found in mail headers.
pub static IP_ADDRESS_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9\-]*\.[a-zA-Z]+\.[a-zA-Z]+").expect("Invalid host name regex")
});

/// MAPI ids such as `32.88.5467.123;`.
pub static MAPI_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]*\.[0-9]*\.[0-9]*\.[0-9]*;").expect("Invalid MAPI id regex"));

/// RFC 2822 dates with a numeric zone, e.g. `Mon, 14 Jun 2021 20:12:41 -0700`.
pub static DATETIMETZ: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z]{3},\s\d{1,2}\s[A-Za-z]{3}\s\d{4}\s\d{2}:\d{2}:\d{2}\s[+-]\d{4}")
        .expect("Invalid datetime regex")
});

/// `1. text` or `1) text` at the start of the input.
pub static NUMBERED_LIST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(?:\.|\))\s(.+)").expect("Invalid numbered list regex"));

/// Enumerators of 1 to 3 levels such as `1.`, `2)`, `a.` or `1.2.3.`.
///
/// Boundary checks (start of input or whitespace on both sides) are applied
/// by the caller; see [`find_enumerated_bullets`].
pub static ENUMERATED_BULLET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:(?:\d{1,3}|[a-zA-Z])[.)]){1,3}").expect("Invalid enumerated bullet regex")
});

/// Runs of blank lines separating paragraphs.
pub static PARAGRAPH_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("Invalid paragraph break regex"));

/// Two or more spaces.
pub static MULTIPLE_SPACES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ ]{2,}").expect("Invalid whitespace regex"));

/// Byte ranges of the enumerators in `text` that stand on their own: each is
/// preceded by the start of the input or whitespace and followed by the end of
/// the input or whitespace.
#[must_use = "returns the positions of the enumerated bullets"]
pub fn find_enumerated_bullets(text: &str) -> Vec<(usize, usize)> {
    ENUMERATED_BULLET
        .find_iter(text)
        .filter(|found| {
            let before_ok = text[..found.start()]
                .chars()
                .next_back()
                .map_or(true, char::is_whitespace);
            let after_ok = text[found.end()..]
                .chars()
                .next()
                .map_or(true, char::is_whitespace);
            before_ok && after_ok
        })
        .map(|found| (found.start(), found.end()))
        .collect()
}
