//! Job status reporting.
//!
//! The status sink is the sole channel through which pipeline progress
//! is externally observable. The pipeline is the single logical writer
//! for a given job ID; the sink only has to serialize its own storage.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;

use clipmill_models::{ClipResult, JobId, JobRecord, JobStatus};

/// One field-level update to a job's externally visible record.
#[derive(Debug, Clone)]
pub enum JobUpdate {
    /// State transition
    Status(JobStatus),
    /// Progress percentage checkpoint (non-decreasing)
    Progress(u8),
    /// Source video title became known
    Title(String),
    /// Number of moments selected for rendering
    TotalClips(usize),
    /// Render attempts finished so far
    ClipsCreated(usize),
    /// One clip rendered successfully
    ClipFinished(ClipResult),
    /// Terminal failure with a human-readable description
    Failed(String),
}

/// Sink for job status updates.
#[async_trait]
pub trait StatusSink: Send + Sync {
    /// Apply one update to the job's record.
    async fn publish(&self, job_id: &JobId, update: JobUpdate);

    async fn status(&self, job_id: &JobId, status: JobStatus) {
        self.publish(job_id, JobUpdate::Status(status)).await;
    }

    async fn progress(&self, job_id: &JobId, value: u8) {
        self.publish(job_id, JobUpdate::Progress(value)).await;
    }

    async fn title(&self, job_id: &JobId, title: String) {
        self.publish(job_id, JobUpdate::Title(title)).await;
    }

    async fn total_clips(&self, job_id: &JobId, total: usize) {
        self.publish(job_id, JobUpdate::TotalClips(total)).await;
    }

    async fn clips_created(&self, job_id: &JobId, count: usize) {
        self.publish(job_id, JobUpdate::ClipsCreated(count)).await;
    }

    async fn clip_finished(&self, job_id: &JobId, clip: ClipResult) {
        self.publish(job_id, JobUpdate::ClipFinished(clip)).await;
    }

    async fn failed(&self, job_id: &JobId, message: String) {
        self.publish(job_id, JobUpdate::Failed(message)).await;
    }
}

/// In-memory job record store.
///
/// Backs the worker binary and tests; a networked deployment would put
/// a remote store behind the same trait.
#[derive(Debug, Default)]
pub struct InMemoryStatusSink {
    records: Mutex<HashMap<JobId, JobRecord>>,
}

impl InMemoryStatusSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new queued job.
    pub fn register(&self, job_id: JobId, url: impl Into<String>) {
        let record = JobRecord::new(job_id.clone(), url);
        self.records
            .lock()
            .expect("status sink lock poisoned")
            .insert(job_id, record);
    }

    /// Snapshot a job's current record.
    pub fn get(&self, job_id: &JobId) -> Option<JobRecord> {
        self.records
            .lock()
            .expect("status sink lock poisoned")
            .get(job_id)
            .cloned()
    }
}

#[async_trait]
impl StatusSink for InMemoryStatusSink {
    async fn publish(&self, job_id: &JobId, update: JobUpdate) {
        let mut records = self.records.lock().expect("status sink lock poisoned");
        let Some(record) = records.get_mut(job_id) else {
            return;
        };

        match update {
            JobUpdate::Status(status) => {
                record.status = status;
                if status == JobStatus::Complete {
                    record.completed_at = Some(Utc::now());
                }
            }
            // Checkpoints are monotonically non-decreasing
            JobUpdate::Progress(value) => record.progress = record.progress.max(value.min(100)),
            JobUpdate::Title(title) => record.video_title = Some(title),
            JobUpdate::TotalClips(total) => record.total_clips = total,
            JobUpdate::ClipsCreated(count) => record.clips_created = count,
            JobUpdate::ClipFinished(clip) => record.clips.push(clip),
            JobUpdate::Failed(message) => {
                record.status = JobStatus::Error;
                record.error = Some(message);
                record.completed_at = Some(Utc::now());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_record_lifecycle() {
        let sink = InMemoryStatusSink::new();
        let job_id = JobId::new();
        sink.register(job_id.clone(), "https://youtube.com/watch?v=abc");

        sink.status(&job_id, JobStatus::Downloading).await;
        sink.progress(&job_id, 10).await;
        sink.title(&job_id, "My Video".to_string()).await;

        let record = sink.get(&job_id).unwrap();
        assert_eq!(record.status, JobStatus::Downloading);
        assert_eq!(record.progress, 10);
        assert_eq!(record.video_title.as_deref(), Some("My Video"));
        assert!(record.completed_at.is_none());
    }

    #[tokio::test]
    async fn test_progress_never_decreases() {
        let sink = InMemoryStatusSink::new();
        let job_id = JobId::new();
        sink.register(job_id.clone(), "url");

        sink.progress(&job_id, 40).await;
        sink.progress(&job_id, 30).await;
        assert_eq!(sink.get(&job_id).unwrap().progress, 40);

        sink.progress(&job_id, 90).await;
        assert_eq!(sink.get(&job_id).unwrap().progress, 90);
    }

    #[tokio::test]
    async fn test_failed_is_terminal() {
        let sink = InMemoryStatusSink::new();
        let job_id = JobId::new();
        sink.register(job_id.clone(), "url");

        sink.failed(&job_id, "No moments detected in video".to_string())
            .await;

        let record = sink.get(&job_id).unwrap();
        assert_eq!(record.status, JobStatus::Error);
        assert!(record.status.is_terminal());
        assert_eq!(record.error.as_deref(), Some("No moments detected in video"));
        assert!(record.completed_at.is_some());
    }

    #[tokio::test]
    async fn test_unknown_job_is_ignored() {
        let sink = InMemoryStatusSink::new();
        // No panic, no phantom record
        sink.progress(&JobId::new(), 50).await;
        assert!(sink.get(&JobId::new()).is_none());
    }
}
