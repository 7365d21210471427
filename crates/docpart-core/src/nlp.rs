//! Tokenizer, sentence splitter and part-of-speech tagger seam
//!
//! The text classifiers only need three capabilities from natural-language
//! tooling, captured by [`NlpBackend`]. Any conforming backend can be plugged
//! in. [`RuleBasedNlp`] is the built-in default: Unicode word and sentence
//! boundaries (UAX #29) for tokens and sentences, and a lexicon with suffix
//! rules for Penn Treebank style tags.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use unicode_segmentation::UnicodeSegmentation;

/// Natural-language capabilities consumed by the classifiers.
pub trait NlpBackend: Send + Sync {
    /// Splits text into word and punctuation tokens.
    fn tokenize(&self, text: &str) -> Vec<String>;

    /// Splits text into sentences.
    fn split_sentences(&self, text: &str) -> Vec<String>;

    /// Tags every token of `text` with a Penn Treebank tag.
    fn pos_tag(&self, text: &str) -> Vec<(String, String)>;
}

/// Penn Treebank tags of the verb family.
pub const VERB_TAGS: [&str; 6] = ["VB", "VBG", "VBD", "VBN", "VBP", "VBZ"];

const ABBREVIATIONS: &[&str] = &[
    "mr.", "mrs.", "ms.", "dr.", "prof.", "sr.", "jr.", "st.", "vs.", "etc.", "e.g.", "i.e.",
    "inc.", "co.", "corp.", "ltd.", "no.", "fig.", "jan.", "feb.", "mar.", "apr.", "aug.",
    "sept.", "sep.", "oct.", "nov.", "dec.",
];

const DETERMINERS: &[&str] = &[
    "the", "a", "an", "this", "that", "these", "those", "each", "every", "some", "any", "no",
];
const POSSESSIVES: &[&str] = &["my", "your", "his", "her", "its", "our", "their"];
const SUBJECT_PRONOUNS: &[&str] = &["i", "you", "he", "she", "it", "we", "they"];
const OBJECT_PRONOUNS: &[&str] = &["me", "him", "us", "them"];
const PREPOSITIONS: &[&str] = &[
    "of", "in", "on", "at", "by", "for", "with", "about", "against", "between", "into",
    "through", "during", "before", "after", "above", "below", "from", "up", "down", "over",
    "under", "within", "without", "upon", "per", "via",
];
const CONJUNCTIONS: &[&str] = &["and", "or", "but", "nor", "yet", "so"];
const MODALS: &[&str] = &[
    "can", "could", "will", "would", "shall", "should", "may", "might", "must",
];

/// Closed-class verb forms and their tags.
const FIXED_VERB_FORMS: &[(&str, &str)] = &[
    ("be", "VB"),
    ("am", "VBP"),
    ("are", "VBP"),
    ("is", "VBZ"),
    ("was", "VBD"),
    ("were", "VBD"),
    ("been", "VBN"),
    ("being", "VBG"),
    ("have", "VBP"),
    ("has", "VBZ"),
    ("had", "VBD"),
    ("having", "VBG"),
    ("do", "VBP"),
    ("does", "VBZ"),
    ("did", "VBD"),
    ("done", "VBN"),
    ("doing", "VBG"),
];

const CONTRACTIONS: &[&str] = &[
    "i'm", "you're", "we're", "they're", "he's", "she's", "it's", "that's", "there's",
    "what's", "who's", "let's", "i've", "you've", "we've", "they've", "i'd", "you'd", "he'd",
    "she'd", "we'd", "they'd", "i'll", "you'll", "he'll", "she'll", "we'll", "they'll",
    "isn't", "aren't", "wasn't", "weren't", "don't", "doesn't", "didn't", "can't", "couldn't",
    "won't", "wouldn't", "shouldn't", "hasn't", "haven't", "hadn't",
];

/// Regular verbs; inflected forms are derived.
const VERB_STEMS: &[&str] = &[
    "say", "get", "make", "go", "know", "take", "see", "come", "think", "look", "want", "give",
    "use", "find", "tell", "ask", "work", "seem", "feel", "try", "leave", "call", "need",
    "become", "put", "mean", "keep", "let", "begin", "show", "hear", "play", "run", "move",
    "live", "believe", "hold", "bring", "happen", "write", "provide", "sit", "stand", "lose",
    "pay", "meet", "include", "continue", "set", "learn", "change", "lead", "understand",
    "watch", "follow", "stop", "create", "speak", "read", "allow", "add", "spend", "grow",
    "open", "walk", "win", "offer", "remember", "love", "consider", "appear", "buy", "wait",
    "serve", "die", "send", "expect", "build", "stay", "fall", "cut", "reach", "kill", "remain",
    "suggest", "raise", "pass", "sell", "require", "report", "decide", "pull", "return",
    "explain", "hope", "develop", "carry", "break", "receive", "agree", "support", "hit",
    "produce", "eat", "cover", "catch", "draw", "choose", "cause", "listen", "realize", "place",
    "close", "involve", "increase", "describe", "apply", "protect", "prepare", "contain",
    "jump", "fly", "swim", "drive", "sing", "dance", "laugh", "cry", "smile", "rise", "like",
    "help", "start", "turn", "enjoy", "visit", "fix", "finish", "check", "click", "submit",
    "download", "install", "contact", "join", "share", "review", "enter", "select", "update",
    "improve", "manage", "reduce", "ensure", "determine", "identify", "obtain", "indicate",
    "present", "discuss", "compare", "measure", "test", "design", "define", "base", "note",
];

/// Irregular past and participle forms.
const IRREGULAR_VERB_FORMS: &[(&str, &str)] = &[
    ("said", "VBD"),
    ("got", "VBD"),
    ("gotten", "VBN"),
    ("made", "VBD"),
    ("went", "VBD"),
    ("gone", "VBN"),
    ("knew", "VBD"),
    ("known", "VBN"),
    ("took", "VBD"),
    ("taken", "VBN"),
    ("saw", "VBD"),
    ("seen", "VBN"),
    ("came", "VBD"),
    ("thought", "VBD"),
    ("gave", "VBD"),
    ("given", "VBN"),
    ("told", "VBD"),
    ("felt", "VBD"),
    ("left", "VBD"),
    ("meant", "VBD"),
    ("kept", "VBD"),
    ("began", "VBD"),
    ("begun", "VBN"),
    ("shown", "VBN"),
    ("heard", "VBD"),
    ("ran", "VBD"),
    ("held", "VBD"),
    ("brought", "VBD"),
    ("wrote", "VBD"),
    ("written", "VBN"),
    ("sat", "VBD"),
    ("stood", "VBD"),
    ("lost", "VBD"),
    ("paid", "VBD"),
    ("met", "VBD"),
    ("led", "VBD"),
    ("understood", "VBD"),
    ("spoke", "VBD"),
    ("spoken", "VBN"),
    ("grew", "VBD"),
    ("grown", "VBN"),
    ("won", "VBD"),
    ("bought", "VBD"),
    ("built", "VBD"),
    ("fell", "VBD"),
    ("fallen", "VBN"),
    ("sent", "VBD"),
    ("spent", "VBD"),
    ("chose", "VBD"),
    ("chosen", "VBN"),
    ("broke", "VBD"),
    ("broken", "VBN"),
    ("drew", "VBD"),
    ("drawn", "VBN"),
    ("ate", "VBD"),
    ("eaten", "VBN"),
    ("caught", "VBD"),
    ("rose", "VBD"),
    ("risen", "VBN"),
    ("flew", "VBD"),
    ("flown", "VBN"),
    ("swam", "VBD"),
    ("drove", "VBD"),
    ("driven", "VBN"),
    ("sang", "VBD"),
    ("became", "VBD"),
    ("found", "VBD"),
    ("running", "VBG"),
    ("swimming", "VBG"),
    ("getting", "VBG"),
    ("putting", "VBG"),
    ("sitting", "VBG"),
    ("stopping", "VBG"),
    ("cutting", "VBG"),
    ("hitting", "VBG"),
    ("beginning", "VBG"),
    ("winning", "VBG"),
    ("stopped", "VBD"),
    ("planned", "VBD"),
];

static VERB_LEXICON: Lazy<HashMap<String, &'static str>> = Lazy::new(|| {
    let mut lexicon = HashMap::new();
    for stem in VERB_STEMS {
        lexicon.insert(third_person(stem), "VBZ");
        lexicon.insert(past_tense(stem), "VBD");
        lexicon.insert(present_participle(stem), "VBG");
    }
    // Base forms last so that "read", "put" and friends keep their base tag.
    for stem in VERB_STEMS {
        lexicon.insert((*stem).to_string(), "VB");
    }
    for (form, tag) in IRREGULAR_VERB_FORMS.iter().chain(FIXED_VERB_FORMS) {
        lexicon.insert((*form).to_string(), *tag);
    }
    lexicon
});

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

fn ends_in_consonant_y(word: &str) -> bool {
    let mut chars = word.chars().rev();
    matches!((chars.next(), chars.next()), (Some('y'), Some(c)) if !is_vowel(c))
}

fn third_person(stem: &str) -> String {
    if ends_in_consonant_y(stem) {
        format!("{}ies", &stem[..stem.len() - 1])
    } else if ["s", "sh", "ch", "x", "z", "o"]
        .iter()
        .any(|suffix| stem.ends_with(suffix))
    {
        format!("{stem}es")
    } else {
        format!("{stem}s")
    }
}

fn past_tense(stem: &str) -> String {
    if stem.ends_with('e') {
        format!("{stem}d")
    } else if ends_in_consonant_y(stem) {
        format!("{}ied", &stem[..stem.len() - 1])
    } else {
        format!("{stem}ed")
    }
}

fn present_participle(stem: &str) -> String {
    if let Some(root) = stem.strip_suffix("ie") {
        format!("{root}ying")
    } else if stem.ends_with('e') && !stem.ends_with("ee") && stem.len() > 2 {
        format!("{}ing", &stem[..stem.len() - 1])
    } else {
        format!("{stem}ing")
    }
}

fn is_number_token(token: &str) -> bool {
    token.chars().any(|c| c.is_ascii_digit())
        && token
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-' | '/'))
}

fn is_punctuation_token(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| !c.is_alphanumeric())
}

/// Default backend built on Unicode segmentation and a verb lexicon.
///
/// Tags cover what the classifiers consume: the verb family, numbers (`CD`)
/// and punctuation. Other words receive coarse tags (`DT`, `IN`, `PRP`, `NN`,
/// `NNP`, `JJ`, `RB`).
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedNlp;

impl RuleBasedNlp {
    /// Creates the default backend.
    #[inline]
    #[must_use = "creates a rule-based NLP backend"]
    pub const fn new() -> Self {
        Self
    }

    fn tag_token(
        token: &str,
        previous_tag: Option<&str>,
        previous_word: Option<&str>,
    ) -> &'static str {
        if is_number_token(token) {
            return "CD";
        }
        if is_punctuation_token(token) {
            return match token {
                "." | "!" | "?" => ".",
                "," => ",",
                "$" => "$",
                _ => ":",
            };
        }

        let lower = token.to_lowercase().replace('\u{2019}', "'");
        let word = lower.as_str();

        if CONTRACTIONS.contains(&word) {
            return "VBP";
        }
        if DETERMINERS.contains(&word) {
            return "DT";
        }
        if POSSESSIVES.contains(&word) {
            return "PRP$";
        }
        if SUBJECT_PRONOUNS.contains(&word) || OBJECT_PRONOUNS.contains(&word) {
            return "PRP";
        }
        if MODALS.contains(&word) {
            return "MD";
        }
        if word == "to" {
            return "TO";
        }
        if PREPOSITIONS.contains(&word) {
            return "IN";
        }
        if CONJUNCTIONS.contains(&word) {
            return "CC";
        }

        let after_determiner = matches!(previous_tag, Some("DT" | "PRP$" | "JJ"));
        if let Some(tag) = VERB_LEXICON.get(word) {
            // "the work", "my play": a base form after a determiner is a noun.
            if after_determiner && matches!(*tag, "VB" | "VBZ") {
                return if tag.ends_with('Z') { "NNS" } else { "NN" };
            }
            // "I work", "they run": a base form after a subject is a present verb.
            if *tag == "VB" && previous_tag == Some("PRP") {
                return "VBP";
            }
            return *tag;
        }

        let is_lower_word = token.chars().next().is_some_and(char::is_lowercase);
        if is_lower_word {
            let after_subject = previous_tag == Some("PRP")
                && previous_word
                    .is_some_and(|w| SUBJECT_PRONOUNS.contains(&w.to_lowercase().as_str()));
            if after_subject {
                return if word.ends_with("ed") {
                    "VBD"
                } else if word.ends_with('s') {
                    "VBZ"
                } else {
                    "VBP"
                };
            }
            if matches!(previous_tag, Some("MD" | "TO")) {
                return "VB";
            }
            if word.len() > 4 && word.ends_with("ing") {
                return "VBG";
            }
            if word.len() > 4 && word.ends_with("ed") && !after_determiner {
                return "VBD";
            }
        }

        if token.chars().next().is_some_and(char::is_uppercase) {
            return "NNP";
        }
        if word.ends_with("ly") {
            return "RB";
        }
        if ["ous", "ful", "ive", "able", "ible", "al", "ic"]
            .iter()
            .any(|suffix| word.len() > suffix.len() + 2 && word.ends_with(suffix))
        {
            return "JJ";
        }
        if word.len() > 3 && word.ends_with('s') && !word.ends_with("ss") {
            return "NNS";
        }
        "NN"
    }
}

impl NlpBackend for RuleBasedNlp {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_word_bounds()
            .filter(|token| !token.trim().is_empty())
            .map(str::to_string)
            .collect()
    }

    fn split_sentences(&self, text: &str) -> Vec<String> {
        let mut sentences: Vec<String> = Vec::new();
        let mut carry = String::new();
        for raw in text.split_sentence_bounds() {
            carry.push_str(raw);
            let trimmed = carry.trim();
            if trimmed.is_empty() {
                carry.clear();
                continue;
            }
            let last_word = trimmed
                .rsplit(char::is_whitespace)
                .next()
                .unwrap_or_default()
                .to_lowercase();
            // "Dr. Smith" is one sentence.
            if ABBREVIATIONS.contains(&last_word.as_str()) {
                continue;
            }
            sentences.push(trimmed.to_string());
            carry.clear();
        }
        let rest = carry.trim();
        if !rest.is_empty() {
            sentences.push(rest.to_string());
        }
        sentences
    }

    fn pos_tag(&self, text: &str) -> Vec<(String, String)> {
        let tokens = self.tokenize(text);
        let mut tagged: Vec<(String, String)> = Vec::with_capacity(tokens.len());
        for token in tokens {
            let (previous_word, previous_tag) = match tagged.last() {
                Some((word, tag)) => (Some(word.as_str()), Some(tag.as_str())),
                None => (None, None),
            };
            let tag = Self::tag_token(&token, previous_tag, previous_word);
            tagged.push((token, tag.to_string()));
        }
        tagged
    }
}

/// Upper bound on entries kept per memo table before it is reset.
pub const DEFAULT_CACHE_CAPACITY: usize = 128;

struct Memo<V> {
    capacity: usize,
    entries: Mutex<HashMap<String, V>>,
}

impl<V: Clone> Memo<V> {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn get_or_insert_with(&self, key: &str, compute: impl FnOnce() -> V) -> V {
        if let Some(value) = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
        {
            return value.clone();
        }
        // Computed outside the lock; a racing thread may compute the same value.
        let value = compute();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.len() >= self.capacity {
            entries.clear();
        }
        entries.insert(key.to_string(), value.clone());
        value
    }

    fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Read-through memo in front of another backend, keyed by input text.
///
/// Each table holds at most `capacity` entries and is cleared when full.
pub struct CachedNlp<B> {
    inner: B,
    tokens: Memo<Vec<String>>,
    sentences: Memo<Vec<String>>,
    tags: Memo<Vec<(String, String)>>,
}

impl<B: NlpBackend> CachedNlp<B> {
    /// Wraps `inner` with tables of [`DEFAULT_CACHE_CAPACITY`] entries.
    #[must_use = "creates a caching NLP backend"]
    pub fn new(inner: B) -> Self {
        Self::with_capacity(inner, DEFAULT_CACHE_CAPACITY)
    }

    #[must_use = "creates a caching NLP backend"]
    pub fn with_capacity(inner: B, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner,
            tokens: Memo::new(capacity),
            sentences: Memo::new(capacity),
            tags: Memo::new(capacity),
        }
    }

    /// Number of memoized tokenizations.
    #[must_use = "returns the number of cached tokenizations"]
    pub fn cached_tokenizations(&self) -> usize {
        self.tokens.len()
    }

    /// The wrapped backend.
    #[inline]
    #[must_use = "returns the wrapped backend"]
    pub const fn inner(&self) -> &B {
        &self.inner
    }
}

impl<B: NlpBackend> NlpBackend for CachedNlp<B> {
    fn tokenize(&self, text: &str) -> Vec<String> {
        self.tokens
            .get_or_insert_with(text, || self.inner.tokenize(text))
    }

    fn split_sentences(&self, text: &str) -> Vec<String> {
        self.sentences
            .get_or_insert_with(text, || self.inner.split_sentences(text))
    }

    fn pos_tag(&self, text: &str) -> Vec<(String, String)> {
        self.tags.get_or_insert_with(text, || self.inner.pos_tag(text))
    }
}

static DEFAULT_NLP: Lazy<CachedNlp<RuleBasedNlp>> = Lazy::new(|| CachedNlp::new(RuleBasedNlp));

/// The process-wide default backend: [`RuleBasedNlp`] behind a [`CachedNlp`].
#[must_use = "returns the default NLP backend"]
pub fn default_backend() -> &'static dyn NlpBackend {
    &*DEFAULT_NLP
}
