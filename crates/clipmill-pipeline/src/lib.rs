//! Moment selection and clip rendering pipeline.
//!
//! This crate turns a source video plus its SRT transcript into a ranked
//! set of non-overlapping vertical clips:
//!
//! 1. [`scoring`] — deterministic keyword/punctuation heuristic over
//!    transcript segments
//! 2. [`selector`] — candidate window expansion, duration gating, and
//!    greedy non-overlap selection (with an interval fallback for videos
//!    without captions)
//! 3. [`pipeline`] — the orchestrator state machine driving acquisition,
//!    analysis, and per-clip rendering through the [`backend`] seam,
//!    reporting progress through the injected [`status`] sink

pub mod backend;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod scoring;
pub mod selector;
pub mod status;

pub use backend::{FfmpegBackend, MediaBackend};
pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use logging::JobLogger;
pub use pipeline::ClipPipeline;
pub use scoring::score_text;
pub use selector::select_moments;
pub use status::{InMemoryStatusSink, JobUpdate, StatusSink};
