//! Shared data models for the clipmill pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - SRT transcript segments and timestamp conversion
//! - Candidate clip moments
//! - Rendered clip artifacts
//! - Job identity, status, and progress records

pub mod clip;
pub mod job;
pub mod moment;
pub mod srt;

// Re-export common types
pub use clip::ClipResult;
pub use job::{JobId, JobRecord, JobStatus};
pub use moment::Moment;
pub use srt::{format_srt_timestamp, parse_srt, parse_srt_timestamp, write_srt, TranscriptSegment};
