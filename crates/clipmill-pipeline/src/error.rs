//! Pipeline error types.
//!
//! "No transcript" is deliberately absent here — it is a valid input
//! state handled by the selector's fallback path, not an error. Per-clip
//! render failures are isolated at the clip level and never surface as a
//! pipeline error either.

use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Acquisition produced no usable video file. Pipeline-fatal.
    #[error("Acquisition failed: {0}")]
    AcquisitionFailed(String),

    /// The primary selection path yielded zero candidates and the
    /// fallback was not applicable. Pipeline-fatal.
    #[error("No moments detected in video")]
    NoMomentsDetected,

    #[error("Media error: {0}")]
    Media(#[from] clipmill_media::MediaError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other failure during the pipeline.
    #[error("Unexpected failure: {0}")]
    Unexpected(String),
}

impl PipelineError {
    pub fn acquisition_failed(msg: impl Into<String>) -> Self {
        Self::AcquisitionFailed(msg.into())
    }

    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::Unexpected(msg.into())
    }
}
