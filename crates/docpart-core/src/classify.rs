//! Heuristic text classifiers
//!
//! Decide whether a string reads like a title, narrative text, a list item, an
//! address and so on. Classifiers that need tokens, sentences or
//! part-of-speech tags go through a [`TextClassifier`] bound to an
//! [`NlpBackend`]; pattern-only checks are free functions.
//!
//! Classification is deterministic for a given backend.

use crate::cleaners::clean_bullets;
use crate::nlp::{default_backend, NlpBackend, VERB_TAGS};
use crate::patterns::{
    find_enumerated_bullets, is_bullet_glyph, EMAIL_ADDRESS_ONLY, NUMBERED_LIST,
    US_CITY_STATE_ZIP, US_PHONE_NUMBER, US_PHONE_NUMBER_ONLY,
};

/// Default fraction of capitalized tokens above which text is not narrative.
pub const DEFAULT_CAP_THRESHOLD: f64 = 0.3;
/// Default minimum word count for a sentence to count towards a title.
pub const DEFAULT_SENTENCE_MIN_LENGTH: usize = 5;
/// Default alphabetic fraction below which text is mostly symbols.
pub const DEFAULT_NON_ALPHA_THRESHOLD: f64 = 0.5;
/// Minimum word count for a sentence to count towards narrative text.
const NARRATIVE_SENTENCE_MIN_LENGTH: usize = 3;

/// True if every character is numeric and there is at least one.
fn is_numeric(text: &str) -> bool {
    !text.is_empty() && text.chars().all(char::is_numeric)
}

/// True if the text has cased characters and none of them is lowercase.
fn is_upper(text: &str) -> bool {
    text.chars().any(char::is_uppercase) && !text.chars().any(char::is_lowercase)
}

/// Title case: every cased run starts with an uppercase letter followed only
/// by lowercase letters, and there is at least one cased letter.
fn is_title_case(text: &str) -> bool {
    let mut seen_cased = false;
    let mut previous_cased = false;
    for c in text.chars() {
        if c.is_uppercase() {
            if previous_cased {
                return false;
            }
            previous_cased = true;
            seen_cased = true;
        } else if c.is_lowercase() {
            if !previous_cased {
                return false;
            }
            previous_cased = true;
            seen_cased = true;
        } else {
            previous_cased = false;
        }
    }
    seen_cased
}

fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
        || matches!(
            c,
            '\u{2018}'
                | '\u{2019}'
                | '\u{201C}'
                | '\u{201D}'
                | '\u{2026}'
                | '\u{2013}'
                | '\u{2014}'
                | '\u{00AB}'
                | '\u{00BB}'
                | '\u{00BF}'
                | '\u{00A1}'
                | '\u{00B7}'
                | '\u{2022}'
        )
}

fn remove_punctuation(text: &str) -> String {
    text.chars().filter(|&c| !is_punctuation(c)).collect()
}

/// Classifiers that consult an NLP backend.
#[derive(Clone, Copy)]
pub struct TextClassifier<'a> {
    nlp: &'a dyn NlpBackend,
}

impl Default for TextClassifier<'static> {
    fn default() -> Self {
        Self::new(default_backend())
    }
}

impl std::fmt::Debug for TextClassifier<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextClassifier").finish_non_exhaustive()
    }
}

impl<'a> TextClassifier<'a> {
    /// Binds the classifiers to `nlp`.
    #[inline]
    #[must_use = "creates a text classifier"]
    pub const fn new(nlp: &'a dyn NlpBackend) -> Self {
        Self { nlp }
    }

    /// The backend in use.
    #[inline]
    #[must_use = "returns the NLP backend"]
    pub const fn backend(&self) -> &'a dyn NlpBackend {
        self.nlp
    }

    /// Whether `text` reads like narrative prose.
    ///
    /// False for empty or numeric text, text whose capitalized-token ratio
    /// exceeds `cap_threshold`, and text with fewer than two sentences of at
    /// least three words that contains no verb.
    ///
    /// # Examples
    ///
    /// ```
    /// use docpart_core::classify::TextClassifier;
    ///
    /// let classifier = TextClassifier::default();
    /// assert!(classifier.is_possible_narrative_text("The sky is blue and the grass is green.", 0.3));
    /// assert!(!classifier.is_possible_narrative_text("42", 0.3));
    /// assert!(!classifier.is_possible_narrative_text("", 0.3));
    /// ```
    #[must_use = "returns whether the text is narrative"]
    pub fn is_possible_narrative_text(&self, text: &str, cap_threshold: f64) -> bool {
        let text = text.trim();
        if text.is_empty() {
            log::debug!("not narrative: empty text");
            return false;
        }
        if is_numeric(text) {
            log::debug!("not narrative: numeric text");
            return false;
        }
        if self.exceeds_cap_ratio(text, cap_threshold) {
            log::debug!("not narrative: capitalization ratio above {cap_threshold}");
            return false;
        }
        if self.sentence_count(text, Some(NARRATIVE_SENTENCE_MIN_LENGTH)) < 2
            && !self.contains_verb(text)
        {
            log::debug!("not narrative: single sentence without a verb");
            return false;
        }
        true
    }

    /// Whether `text` could be a title.
    ///
    /// False for empty or numeric text and for text with more than one
    /// sentence of at least `sentence_min_length` words. Shorter sentences do
    /// not count, so a heading made of two short clauses still qualifies.
    ///
    /// # Examples
    ///
    /// ```
    /// use docpart_core::classify::TextClassifier;
    ///
    /// let classifier = TextClassifier::default();
    /// assert!(classifier.is_possible_title("ITEM 1A. RISK FACTORS", 5));
    /// assert!(!classifier.is_possible_title("", 5));
    /// ```
    #[must_use = "returns whether the text could be a title"]
    pub fn is_possible_title(&self, text: &str, sentence_min_length: usize) -> bool {
        let text = text.trim();
        if text.is_empty() {
            log::debug!("not a title: empty text");
            return false;
        }
        if is_numeric(text) {
            log::debug!("not a title: numeric text");
            return false;
        }
        if self.sentence_count(text, Some(sentence_min_length)) > 1 {
            log::debug!("not a title: more than one sentence");
            return false;
        }
        true
    }

    /// Number of sentences in `text`.
    ///
    /// With `min_length`, sentences with fewer word tokens (punctuation
    /// removed) are not counted.
    #[must_use = "returns the number of sentences"]
    pub fn sentence_count(&self, text: &str, min_length: Option<usize>) -> usize {
        self.nlp
            .split_sentences(text)
            .iter()
            .filter(|sentence| {
                let words = self.nlp.tokenize(&remove_punctuation(sentence));
                min_length.map_or(true, |min| words.len() >= min)
            })
            .count()
    }

    /// Whether the share of capitalized tokens is above `threshold`.
    ///
    /// Always false for text with more than one sentence of at least three
    /// words, since titles are single sentences.
    #[must_use = "returns whether the capitalization ratio is exceeded"]
    pub fn exceeds_cap_ratio(&self, text: &str, threshold: f64) -> bool {
        if self.sentence_count(text, Some(NARRATIVE_SENTENCE_MIN_LENGTH)) > 1 {
            return false;
        }
        let tokens = self.nlp.tokenize(text);
        if tokens.is_empty() {
            return false;
        }
        let capitalized = tokens
            .iter()
            .filter(|token| is_upper(token) || is_title_case(token))
            .count();
        capitalized as f64 / tokens.len() as f64 > threshold
    }

    /// Whether any token of `text` is tagged as a verb.
    ///
    /// All-caps text is lowercased first so that shouted words are not all
    /// taken for proper nouns.
    #[must_use = "returns whether the text contains a verb"]
    pub fn contains_verb(&self, text: &str) -> bool {
        let lowered;
        let text = if is_upper(text) {
            lowered = text.to_lowercase();
            lowered.as_str()
        } else {
            text
        };
        self.nlp
            .pos_tag(text)
            .iter()
            .any(|(_, tag)| VERB_TAGS.contains(&tag.as_str()))
    }
}

/// Whether `text` starts with a single bullet glyph.
///
/// Leading whitespace is ignored. A glyph immediately followed by another
/// glyph (`**`, `--`) does not count.
///
/// # Examples
///
/// ```
/// use docpart_core::classify::is_bulleted_text;
///
/// assert!(is_bulleted_text("● Point"));
/// assert!(is_bulleted_text("   • indented"));
/// assert!(!is_bulleted_text("** emphasis"));
/// assert!(!is_bulleted_text("Plain"));
/// ```
#[must_use = "returns whether the text is bulleted"]
pub fn is_bulleted_text(text: &str) -> bool {
    let mut chars = text.trim_start().chars();
    match chars.next() {
        Some(first) if is_bullet_glyph(first) => !chars.next().is_some_and(is_bullet_glyph),
        _ => false,
    }
}

/// Whether `text` is a `City, State 12345` line.
#[must_use = "returns whether the text is a US city/state/zip line"]
pub fn is_us_city_state_zip(text: &str) -> bool {
    US_CITY_STATE_ZIP.is_match(text.trim())
}

/// Whether `text` is exactly one email address.
#[must_use = "returns whether the text is an email address"]
pub fn is_email_address(text: &str) -> bool {
    EMAIL_ADDRESS_ONLY.is_match(text.trim())
}

/// Whether `text` starts like `1. item` or `1) item`.
#[must_use = "returns whether the text is a numbered list item"]
pub fn is_possible_numbered_list(text: &str) -> bool {
    NUMBERED_LIST.is_match(text.trim())
}

/// Whether `text` is a US phone number.
#[must_use = "returns whether the text is a US phone number"]
pub fn is_us_phone_number(text: &str) -> bool {
    US_PHONE_NUMBER_ONLY.is_match(text.trim())
}

/// Whether `text` ends with a US phone number.
#[must_use = "returns whether the text contains a US phone number"]
pub fn contains_us_phone_number(text: &str) -> bool {
    US_PHONE_NUMBER.is_match(text)
}

/// Whether fewer than `threshold` of the non-whitespace characters are
/// alphabetic.
///
/// False for empty or all-whitespace text.
#[must_use = "returns whether the text is mostly non-alphabetic"]
pub fn under_non_alpha_ratio(text: &str, threshold: f64) -> bool {
    let mut total = 0usize;
    let mut alpha = 0usize;
    for c in text.chars().filter(|c| !c.is_whitespace()) {
        total += 1;
        if c.is_alphabetic() {
            alpha += 1;
        }
    }
    if total == 0 {
        return false;
    }
    (alpha as f64 / total as f64) < threshold
}

/// Splits a block of list text into item texts.
///
/// Enumerators (`1.`, `2)`, `a.`, `1.2.`) are tried first. When they do not
/// split the block, bullet glyphs at the start of a word are used instead.
/// Markers are removed and empty items dropped.
///
/// # Examples
///
/// ```
/// use docpart_core::classify::split_list_items;
///
/// assert_eq!(
///     split_list_items("1. I'm so cool! 2. You're cool too. 3. We're all cool!"),
///     vec!["I'm so cool!", "You're cool too.", "We're all cool!"],
/// );
/// assert_eq!(split_list_items("* A * B * C"), vec!["A", "B", "C"]);
/// ```
#[must_use = "returns the list item texts"]
pub fn split_list_items(text: &str) -> Vec<String> {
    let enumerators = find_enumerated_bullets(text);
    let segments = if enumerators.is_empty() {
        split_at_markers(text, &find_word_initial_bullets(text))
    } else {
        split_at_markers(text, &enumerators)
    };
    segments
        .into_iter()
        .map(|segment| clean_bullets(segment.trim()))
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Byte ranges of bullet glyphs that start a word and are not part of a run
/// of glyphs.
fn find_word_initial_bullets(text: &str) -> Vec<(usize, usize)> {
    let mut found = Vec::new();
    let mut previous: Option<char> = None;
    let mut chars = text.char_indices().peekable();
    while let Some((index, c)) = chars.next() {
        let next = chars.peek().map(|&(_, next)| next);
        let at_word_start = previous.map_or(true, char::is_whitespace);
        if is_bullet_glyph(c) && at_word_start && !next.is_some_and(is_bullet_glyph) {
            found.push((index, index + c.len_utf8()));
        }
        previous = Some(c);
    }
    found
}

/// Segments of `text` between `markers`, markers removed. The text before the
/// first marker is its own segment.
fn split_at_markers<'t>(text: &'t str, markers: &[(usize, usize)]) -> Vec<&'t str> {
    let mut segments = Vec::with_capacity(markers.len() + 1);
    let mut cursor = 0;
    for &(start, end) in markers {
        segments.push(&text[cursor..start]);
        cursor = end;
    }
    segments.push(&text[cursor..]);
    segments
        .into_iter()
        .filter(|segment| !segment.trim().is_empty())
        .collect()
}
