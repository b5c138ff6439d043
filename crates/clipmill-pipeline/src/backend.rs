//! Narrow collaborator seam over external media tools.
//!
//! The pipeline only ever touches acquisition, probing, and rendering
//! through this trait, so tests can mock the external processes away
//! entirely.

use async_trait::async_trait;
use std::path::Path;
use tracing::warn;

use clipmill_media::{acquire_video, get_duration, render_clip, Acquisition, MediaResult,
    RenderRequest};
use clipmill_models::TranscriptSegment;

/// Media collaborator interface.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaBackend: Send + Sync {
    /// Download the source video (plus optional subtitles and title)
    /// into `workdir`. Producing no video file is a fatal failure.
    async fn acquire(&self, url: &str, workdir: &Path) -> MediaResult<Acquisition>;

    /// Probe the video's duration in seconds. Returns `0.0` on any
    /// failure — "unknown" triggers the selector's fallback path.
    async fn probe_duration(&self, video: &Path) -> f64;

    /// Render one clip window with burned-in captions. Exit status is
    /// the only contract; output metadata is the caller's job.
    async fn render(
        &self,
        request: &RenderRequest,
        transcript: &[TranscriptSegment],
    ) -> MediaResult<()>;
}

/// Real implementation backed by yt-dlp, ffprobe, and ffmpeg.
#[derive(Debug, Default, Clone)]
pub struct FfmpegBackend;

impl FfmpegBackend {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MediaBackend for FfmpegBackend {
    async fn acquire(&self, url: &str, workdir: &Path) -> MediaResult<Acquisition> {
        acquire_video(url, workdir).await
    }

    async fn probe_duration(&self, video: &Path) -> f64 {
        match get_duration(video).await {
            Ok(duration) => duration,
            Err(e) => {
                warn!(video = %video.display(), error = %e, "Duration probe failed, treating as unknown");
                0.0
            }
        }
    }

    async fn render(
        &self,
        request: &RenderRequest,
        transcript: &[TranscriptSegment],
    ) -> MediaResult<()> {
        render_clip(request, transcript).await
    }
}
