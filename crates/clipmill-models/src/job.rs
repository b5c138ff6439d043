//! Job identity, status, and progress records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::ClipResult;

/// Unique identifier for a pipeline job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pipeline job state.
///
/// Transitions are one-directional: `queued → downloading → analyzing →
/// creating_clips → complete`. `error` is reachable from any state; both
/// `complete` and `error` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Job accepted, not yet started
    #[default]
    Queued,
    /// Acquiring the source video
    Downloading,
    /// Probing duration and selecting moments
    Analyzing,
    /// Rendering selected clips
    CreatingClips,
    /// All clips rendered
    Complete,
    /// Pipeline aborted with a captured failure description
    Error,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Downloading => "downloading",
            JobStatus::Analyzing => "analyzing",
            JobStatus::CreatingClips => "creating_clips",
            JobStatus::Complete => "complete",
            JobStatus::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Complete | JobStatus::Error)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Externally observable record of one pipeline job.
///
/// Owned by the status sink; the pipeline is the single logical writer
/// for a given job ID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    /// Unique job ID
    pub id: JobId,

    /// Source video URL
    pub url: String,

    /// Current state
    #[serde(default)]
    pub status: JobStatus,

    /// Progress percentage (0-100, monotonically non-decreasing)
    #[serde(default)]
    pub progress: u8,

    /// Source video title, once known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_title: Option<String>,

    /// Number of moments selected for rendering
    #[serde(default)]
    pub total_clips: usize,

    /// Number of render attempts finished so far
    #[serde(default)]
    pub clips_created: usize,

    /// Successfully rendered clips
    #[serde(default)]
    pub clips: Vec<ClipResult>,

    /// Failure description (terminal `error` state only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Completion timestamp (terminal states only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl JobRecord {
    /// Create a new queued record.
    pub fn new(id: JobId, url: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
            status: JobStatus::Queued,
            progress: 0,
            video_title: None,
            total_clips: 0,
            clips_created: 0,
            clips: Vec::new(),
            error: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_strings() {
        assert_eq!(JobStatus::Queued.as_str(), "queued");
        assert_eq!(JobStatus::CreatingClips.as_str(), "creating_clips");
        assert_eq!(
            serde_json::to_string(&JobStatus::CreatingClips).unwrap(),
            "\"creating_clips\""
        );
    }

    #[test]
    fn test_terminal_states() {
        assert!(JobStatus::Complete.is_terminal());
        assert!(JobStatus::Error.is_terminal());
        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::CreatingClips.is_terminal());
    }

    #[test]
    fn test_new_record() {
        let record = JobRecord::new(JobId::new(), "https://youtube.com/watch?v=abc");
        assert_eq!(record.status, JobStatus::Queued);
        assert_eq!(record.progress, 0);
        assert!(record.clips.is_empty());
    }
}
