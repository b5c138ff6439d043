//! Moment selection.
//!
//! Expands high-scoring transcript segments into candidate clip windows,
//! gates them on duration, then greedily selects a maximal
//! non-overlapping subset ordered by score. Videos without a usable
//! transcript fall back to fixed-interval windows so the pipeline still
//! produces output.

use std::cmp::Ordering;

use clipmill_models::{Moment, TranscriptSegment};

use crate::scoring::score_text;

/// Default cap on selected moments.
pub const DEFAULT_MAX_CLIPS: usize = 10;

/// Minimum score for a segment to seed a candidate window.
pub const SCORE_THRESHOLD: f64 = 0.3;

/// Nominal clip length before boundary snapping.
const NOMINAL_CLIP_SECS: f64 = 60.0;

/// Admission gate: shorter clips lack context, longer ones don't fit
/// the target format.
const MIN_CLIP_SECS: f64 = 45.0;
const MAX_CLIP_SECS: f64 = 75.0;

/// Score assigned to fallback interval windows.
const FALLBACK_SCORE: f64 = 0.5;

/// Preview text length cap in characters.
const PREVIEW_CHARS: usize = 100;

/// Select up to `max_clips` non-overlapping moments.
///
/// Without a transcript (or with an unknown duration) the interval
/// fallback applies. With a transcript, zero returned moments means
/// nothing passed the score threshold and duration gate — callers must
/// treat that as an explicit failure, never as a fallback trigger.
pub fn select_moments(
    transcript: &[TranscriptSegment],
    total_duration: f64,
    max_clips: usize,
) -> Vec<Moment> {
    if transcript.is_empty() || total_duration == 0.0 {
        return fallback_moments(total_duration, max_clips);
    }

    let candidates = expand_candidates(transcript, total_duration);
    select_non_overlapping(candidates, max_clips)
}

/// Interval-based clip generation for videos without usable captions.
fn fallback_moments(total_duration: f64, max_clips: usize) -> Vec<Moment> {
    let num_clips = ((total_duration / NOMINAL_CLIP_SECS).floor() as usize).min(max_clips);

    (0..num_clips)
        .map(|i| {
            let start = i as f64 * (total_duration / num_clips as f64);
            Moment {
                start,
                end: (start + NOMINAL_CLIP_SECS).min(total_duration),
                score: FALLBACK_SCORE,
                preview_text: "Interval clip".to_string(),
            }
        })
        .collect()
}

/// Expand scoring segments into duration-gated candidate windows.
///
/// Each segment scoring at or above the threshold seeds a window at the
/// segment's start, nominally 60 s long and clamped to the video. The
/// end is snapped forward to the end of the first segment (at or after
/// the seed) whose own end reaches the nominal cut, so clips end on a
/// caption boundary rather than mid-sentence. When no segment ends that
/// late, the clamped end stands.
fn expand_candidates(transcript: &[TranscriptSegment], total_duration: f64) -> Vec<Moment> {
    let mut candidates = Vec::new();

    for (i, segment) in transcript.iter().enumerate() {
        let score = score_text(&segment.text);
        if score < SCORE_THRESHOLD {
            continue;
        }

        let mut end = (segment.start + NOMINAL_CLIP_SECS).min(total_duration);
        if let Some(boundary) = transcript[i..].iter().find(|later| later.end >= end) {
            end = boundary.end;
        }

        let clip_duration = end - segment.start;
        if (MIN_CLIP_SECS..=MAX_CLIP_SECS).contains(&clip_duration) {
            candidates.push(Moment {
                start: segment.start,
                end,
                score,
                preview_text: truncate_chars(&segment.text, PREVIEW_CHARS),
            });
        }
    }

    candidates
}

/// Rank candidates score-descending (stable, so ties keep discovery
/// order) and greedily accept those that overlap nothing already taken.
fn select_non_overlapping(mut candidates: Vec<Moment>, max_clips: usize) -> Vec<Moment> {
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    let mut selected: Vec<Moment> = Vec::new();
    for candidate in candidates {
        if selected.len() >= max_clips {
            break;
        }
        if !selected.iter().any(|taken| candidate.overlaps(taken)) {
            selected.push(candidate);
        }
    }

    selected
}

/// Truncate to at most `max_chars` characters without splitting a code point.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
