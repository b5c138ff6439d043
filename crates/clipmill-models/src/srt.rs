//! SRT transcript parsing and serialization.
//!
//! The pipeline treats subtitles as the transcript source: an ordered
//! sequence of time-stamped text segments. Parsing is total — malformed
//! or empty input yields an empty sequence, because "no transcript" is a
//! valid, common input state for the pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One timestamped unit of transcript text.
///
/// Invariant: `start < end`, in seconds. Sequences produced by
/// [`parse_srt`] are ordered by `start` as they appear in the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    /// Caption text (multi-line captions joined with a single space)
    pub text: String,
}

impl TranscriptSegment {
    /// Create a new segment.
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    /// Segment duration in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// SRT timestamp parsing error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimestampError {
    #[error("invalid SRT timestamp format '{0}', expected HH:MM:SS,mmm")]
    InvalidFormat(String),

    #[error("invalid {component} value in timestamp '{value}'")]
    InvalidValue {
        component: &'static str,
        value: String,
    },
}

/// Parse an SRT timestamp (`HH:MM:SS,mmm`) into seconds.
///
/// # Examples
/// ```
/// use clipmill_models::srt::parse_srt_timestamp;
/// assert_eq!(parse_srt_timestamp("00:01:30,500").unwrap(), 90.5);
/// assert_eq!(parse_srt_timestamp("01:00:00,000").unwrap(), 3600.0);
/// ```
pub fn parse_srt_timestamp(ts: &str) -> Result<f64, TimestampError> {
    let parts: Vec<&str> = ts.trim().split(':').collect();
    if parts.len() != 3 {
        return Err(TimestampError::InvalidFormat(ts.to_string()));
    }

    let hours: u32 = parts[0].parse().map_err(|_| TimestampError::InvalidValue {
        component: "hours",
        value: parts[0].to_string(),
    })?;
    let minutes: u32 = parts[1].parse().map_err(|_| TimestampError::InvalidValue {
        component: "minutes",
        value: parts[1].to_string(),
    })?;
    // SRT uses a comma as the decimal separator
    let seconds: f64 = parts[2]
        .replace(',', ".")
        .parse()
        .map_err(|_| TimestampError::InvalidValue {
            component: "seconds",
            value: parts[2].to_string(),
        })?;
    if seconds < 0.0 {
        return Err(TimestampError::InvalidValue {
            component: "seconds",
            value: parts[2].to_string(),
        });
    }

    Ok(f64::from(hours) * 3600.0 + f64::from(minutes) * 60.0 + seconds)
}

/// Format seconds as an SRT timestamp (`HH:MM:SS,mmm`).
///
/// Always two-digit hours/minutes/seconds and three-digit milliseconds,
/// so re-emitted caption tracks round-trip through [`parse_srt_timestamp`]
/// within 1 ms.
pub fn format_srt_timestamp(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;
    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
}

/// Parse SRT content into an ordered sequence of transcript segments.
///
/// A cue is a timing line (`HH:MM:SS,mmm --> HH:MM:SS,mmm`) followed by
/// one or more text lines, terminated by a blank line or end of input.
/// Index lines and anything that does not fit the grammar are skipped;
/// cues that violate `start < end` or carry no text are dropped.
pub fn parse_srt(content: &str) -> Vec<TranscriptSegment> {
    let mut segments = Vec::new();
    let mut lines = content.lines().peekable();

    while let Some(line) = lines.next() {
        let Some((start, end)) = parse_timing_line(line) else {
            continue;
        };

        let mut text_lines: Vec<&str> = Vec::new();
        while let Some(text) = lines.next_if(|l| !l.trim().is_empty()) {
            text_lines.push(text.trim());
        }
        let text = text_lines.join(" ");

        if start < end && !text.is_empty() {
            segments.push(TranscriptSegment { start, end, text });
        }
    }

    segments
}

/// Parse a `HH:MM:SS,mmm --> HH:MM:SS,mmm` timing line.
fn parse_timing_line(line: &str) -> Option<(f64, f64)> {
    let (start, end) = line.trim().split_once(" --> ")?;
    let start = parse_srt_timestamp(start).ok()?;
    let end = parse_srt_timestamp(end).ok()?;
    Some((start, end))
}

/// Serialize segments back to SRT, numbering cues from 1.
///
/// Inverse of [`parse_srt`] for single-line cues; used to emit the
/// re-timed caption track for one clip.
pub fn write_srt(segments: &[TranscriptSegment]) -> String {
    let mut out = String::new();
    for (idx, seg) in segments.iter().enumerate() {
        out.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            idx + 1,
            format_srt_timestamp(seg.start),
            format_srt_timestamp(seg.end),
            seg.text
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
1
00:00:01,000 --> 00:00:03,500
Hello there

2
00:00:04,000 --> 00:00:06,250
Split over
two lines

3
00:00:07,000 --> 00:00:08,000
Last cue
";

    #[test]
    fn test_parse_timestamp() {
        assert!((parse_srt_timestamp("00:00:00,000").unwrap()).abs() < 1e-9);
        assert!((parse_srt_timestamp("00:01:30,500").unwrap() - 90.5).abs() < 1e-9);
        assert!((parse_srt_timestamp("01:02:03,004").unwrap() - 3723.004).abs() < 1e-9);
        assert!(parse_srt_timestamp("1:2").is_err());
        assert!(parse_srt_timestamp("aa:bb:cc,ddd").is_err());
    }

    #[test]
    fn test_format_timestamp_stable() {
        assert_eq!(format_srt_timestamp(0.0), "00:00:00,000");
        assert_eq!(format_srt_timestamp(90.5), "00:01:30,500");
        assert_eq!(format_srt_timestamp(3723.004), "01:02:03,004");
        // Negative input clamps rather than wrapping
        assert_eq!(format_srt_timestamp(-1.0), "00:00:00,000");
    }

    #[test]
    fn test_timestamp_round_trip_within_1ms() {
        let samples = [
            0.0, 0.001, 0.999, 1.5, 59.999, 60.0, 61.25, 3599.5, 3600.0, 12345.678, 86399.999,
            359999.999,
        ];
        for &s in &samples {
            let recovered = parse_srt_timestamp(&format_srt_timestamp(s)).unwrap();
            assert!(
                (recovered - s).abs() <= 0.001,
                "round trip of {} gave {}",
                s,
                recovered
            );
        }
    }

    #[test]
    fn test_parse_srt() {
        let segments = parse_srt(SAMPLE);
        assert_eq!(segments.len(), 3);
        assert!((segments[0].start - 1.0).abs() < 1e-9);
        assert!((segments[0].end - 3.5).abs() < 1e-9);
        assert_eq!(segments[0].text, "Hello there");
        // Multi-line captions join with a single space
        assert_eq!(segments[1].text, "Split over two lines");
        // Ordered by start
        assert!(segments.windows(2).all(|w| w[0].start <= w[1].start));
    }

    #[test]
    fn test_parse_is_total() {
        assert!(parse_srt("").is_empty());
        assert!(parse_srt("not a subtitle file at all").is_empty());
        assert!(parse_srt("12:34 --> garbage\ntext\n").is_empty());
        // Reversed timing is dropped
        assert!(parse_srt("00:00:05,000 --> 00:00:01,000\noops\n").is_empty());
        // Timing with no text is dropped
        assert!(parse_srt("00:00:01,000 --> 00:00:02,000\n\n").is_empty());
    }

    #[test]
    fn test_write_srt_round_trip() {
        let segments = parse_srt(SAMPLE);
        let emitted = write_srt(&segments);
        assert_eq!(parse_srt(&emitted), segments);
        assert!(emitted.starts_with("1\n00:00:01,000 --> 00:00:03,500\nHello there\n"));
    }
}
