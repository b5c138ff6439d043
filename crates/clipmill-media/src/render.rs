//! Per-clip rendering: caption scoping, re-timing, and burn-in.
//!
//! Contract: captions are scoped to cues fully contained in the clip
//! window — cues partially overlapping a boundary are dropped entirely,
//! not truncated. The kept cues are re-timed relative to the clip start,
//! renumbered from 1, and burned into a 1080x1920 scale-to-cover +
//! center-crop frame.

use std::path::{Path, PathBuf};
use tracing::info;

use clipmill_models::srt::{write_srt, TranscriptSegment};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;

/// Target vertical frame.
const TARGET_WIDTH: u32 = 1080;
const TARGET_HEIGHT: u32 = 1920;

/// Burned-in caption style: bold condensed font, outlined, high-contrast
/// fill over a semi-transparent box, bottom-center anchored near the
/// lower third.
const CAPTION_STYLE: &str = concat!(
    "FontName=Arial Black,",
    "FontSize=32,",
    "PrimaryColour=&H0000E7FF,",
    "OutlineColour=&H00000000,",
    "BackColour=&H80000000,",
    "BorderStyle=1,",
    "Outline=4,",
    "Shadow=2,",
    "MarginV=100,",
    "Alignment=2,",
    "Bold=-1,",
    "Italic=-1"
);

/// A structured render request for one clip.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// Source video file
    pub source: PathBuf,
    /// Window start in seconds (absolute)
    pub start: f64,
    /// Window end in seconds (absolute)
    pub end: f64,
    /// Output video path
    pub output: PathBuf,
}

impl RenderRequest {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Scope a transcript to a clip window and re-time it to the clip.
///
/// Keeps only cues fully contained in `[start, end)` and subtracts
/// `start` from both bounds of each kept cue.
pub fn scope_captions(
    transcript: &[TranscriptSegment],
    start: f64,
    end: f64,
) -> Vec<TranscriptSegment> {
    transcript
        .iter()
        .filter(|seg| seg.start >= start && seg.end <= end)
        .map(|seg| TranscriptSegment {
            start: seg.start - start,
            end: seg.end - start,
            text: seg.text.clone(),
        })
        .collect()
}

/// Build the vertical transform + burn-in filter chain.
fn build_clip_filter(srt_path: &Path) -> String {
    format!(
        "scale={w}:{h}:force_original_aspect_ratio=increase,crop={w}:{h},\
         subtitles='{srt}':force_style='{style}'",
        w = TARGET_WIDTH,
        h = TARGET_HEIGHT,
        srt = srt_path.display(),
        style = CAPTION_STYLE
    )
}

/// Render one clip with burned-in captions.
///
/// Writes the clip's re-timed caption track next to the output file,
/// then trims, crops to 1080x1920, and burns the captions in. Exit
/// status of the external tool is the only success signal; output
/// metadata is the caller's job.
pub async fn render_clip(
    request: &RenderRequest,
    transcript: &[TranscriptSegment],
) -> MediaResult<()> {
    info!(
        "Rendering clip: {} -> {} ({:.2}s - {:.2}s)",
        request.source.display(),
        request.output.display(),
        request.start,
        request.end
    );

    let captions = scope_captions(transcript, request.start, request.end);
    let srt_path = request.output.with_extension("srt");
    tokio::fs::write(&srt_path, write_srt(&captions)).await?;

    let cmd = FfmpegCommand::new(&request.source, &request.output)
        .seek(request.start)
        .duration(request.duration())
        .video_filter(build_clip_filter(&srt_path))
        .video_codec("libx264")
        .preset("medium")
        .crf(23)
        .audio_codec("aac")
        .audio_bitrate("128k");

    FfmpegRunner::new().run(&cmd).await
}
