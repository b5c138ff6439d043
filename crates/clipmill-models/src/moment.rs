//! Candidate clip moments.

use serde::{Deserialize, Serialize};

/// A candidate or selected clip time-window with a relevance score.
///
/// Invariant: `end > start`, `score >= 0`. Transient pipeline state —
/// produced by the selector, consumed by the renderer, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Moment {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    /// Heuristic relevance score (relative ranking only)
    pub score: f64,
    /// Short excerpt of the transcript text that seeded this moment
    pub preview_text: String,
}

impl Moment {
    /// Moment duration in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Half-open interval overlap test against another moment.
    pub fn overlaps(&self, other: &Moment) -> bool {
        self.start < other.end && self.end > other.start
    }
}
