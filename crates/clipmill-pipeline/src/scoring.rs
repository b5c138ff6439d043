//! Heuristic moment scoring.
//!
//! Scores are a deterministic sum of independent additive signals over
//! the segment text. The rule set is a declarative table so it stays
//! data, not code, and is independently testable. Scores have no upper
//! bound and are only ever used for relative ranking.

/// Curated keywords that flag potentially engaging moments.
pub const VIRAL_KEYWORDS: [&str; 29] = [
    "incredible",
    "amazing",
    "shocking",
    "unbelievable",
    "secret",
    "mistake",
    "truth",
    "revealed",
    "never",
    "always",
    "everyone",
    "nobody",
    "best",
    "worst",
    "crazy",
    "insane",
    "mind-blowing",
    "why",
    "how",
    "what if",
    "imagine",
    "should you",
    "can you",
    "must",
    "need to",
    "have to",
    "warning",
    "danger",
    "ultimate",
];

const KEYWORD_WEIGHT: f64 = 0.3;
const QUESTION_WEIGHT: f64 = 0.2;
const EXCLAMATION_WEIGHT: f64 = 0.15;

/// One scoring signal: a text detector paired with its weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Signal {
    /// Case-insensitive substring hit on one curated keyword.
    /// An existence check: a keyword repeating in the same segment still
    /// scores once — distinct keywords, not occurrences.
    KeywordHit(&'static str),
    /// Segment text contains a question mark.
    Question,
    /// Segment text contains an exclamation mark.
    Exclamation,
}

impl Signal {
    /// Additive weight contributed when this signal fires.
    pub fn weight(&self) -> f64 {
        match self {
            Signal::KeywordHit(_) => KEYWORD_WEIGHT,
            Signal::Question => QUESTION_WEIGHT,
            Signal::Exclamation => EXCLAMATION_WEIGHT,
        }
    }

    /// Whether this signal fires for the given text.
    /// `lowered` must be the lowercase form of `text`.
    fn fires(&self, text: &str, lowered: &str) -> bool {
        match self {
            Signal::KeywordHit(keyword) => lowered.contains(keyword),
            Signal::Question => text.contains('?'),
            Signal::Exclamation => text.contains('!'),
        }
    }
}

/// The full signal table: one entry per keyword plus the two
/// punctuation signals.
pub fn signal_table() -> Vec<Signal> {
    VIRAL_KEYWORDS
        .iter()
        .map(|k| Signal::KeywordHit(k))
        .chain([Signal::Question, Signal::Exclamation])
        .collect()
}

/// Score a transcript segment's text.
pub fn score_text(text: &str) -> f64 {
    let lowered = text.to_lowercase();
    signal_table()
        .iter()
        .filter(|signal| signal.fires(text, &lowered))
        .map(Signal::weight)
        .sum()
}
