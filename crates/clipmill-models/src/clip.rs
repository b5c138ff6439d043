//! Rendered clip artifacts.

use serde::{Deserialize, Serialize};

/// A durable output artifact describing one successfully rendered clip.
///
/// Created only after the render succeeded; size and duration are
/// computed by the orchestrator from the moment and the filesystem, not
/// reported by the renderer itself. Lifetime is tied to the enclosing
/// job's output directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipResult {
    /// Output file name within the job's output directory
    pub filename: String,
    /// Clip duration in whole seconds
    pub duration_seconds: u64,
    /// Output file size in bytes
    pub size_bytes: u64,
    /// Short excerpt of the transcript text that seeded the clip
    pub preview_text: String,
}
