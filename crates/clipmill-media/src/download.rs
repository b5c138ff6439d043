//! Video acquisition using yt-dlp.
//!
//! Downloads the source video together with its English auto-generated
//! subtitles (converted to SRT) and the info JSON carrying the title.
//! A missing subtitle track is a valid outcome; a missing video file is
//! a fatal acquisition failure.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::error::{MediaError, MediaResult};

/// Result of a successful acquisition.
#[derive(Debug, Clone)]
pub struct Acquisition {
    /// Local path to the downloaded video file
    pub video_path: PathBuf,
    /// Local path to the downloaded SRT subtitle track, if one exists
    pub subtitle_path: Option<PathBuf>,
    /// Video title from the source metadata, if available
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InfoJson {
    title: Option<String>,
}

/// Download a video plus subtitles and metadata into `workdir`.
pub async fn acquire_video(url: &str, workdir: impl AsRef<Path>) -> MediaResult<Acquisition> {
    let workdir = workdir.as_ref();
    tokio::fs::create_dir_all(workdir).await?;

    which::which("yt-dlp").map_err(|_| MediaError::YtDlpNotFound)?;

    info!("Downloading video from {} to {}", url, workdir.display());

    let output_template = workdir.join("%(id)s.%(ext)s");
    let output_template_str = output_template.to_string_lossy();

    let args = [
        "-f",
        "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best",
        "--merge-output-format",
        "mp4",
        "--write-info-json",
        "--write-auto-sub",
        "--sub-lang",
        "en",
        "--convert-subs",
        "srt",
        "-o",
        &output_template_str,
        url,
    ];

    let output = Command::new("yt-dlp")
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!("yt-dlp stderr: {}", stderr);
        return Err(MediaError::download_failed(format!(
            "yt-dlp failed: {}",
            stderr.lines().last().unwrap_or("Unknown error")
        )));
    }

    let video_path = find_video_file(workdir).await?;

    // Subtitles land next to the video as <stem>.en.srt
    let subtitle_path = sibling_with_suffix(&video_path, ".en.srt").filter(|p| p.exists());
    if subtitle_path.is_none() {
        info!("No subtitle track downloaded for {}", url);
    }

    let title = read_title(&video_path).await;

    let file_size = video_path.metadata()?.len();
    info!(
        output = %video_path.display(),
        size_mb = file_size as f64 / (1024.0 * 1024.0),
        has_subtitles = subtitle_path.is_some(),
        "Downloaded video successfully"
    );

    Ok(Acquisition {
        video_path,
        subtitle_path,
        title,
    })
}

/// Locate the downloaded mp4 in the work directory.
async fn find_video_file(workdir: &Path) -> MediaResult<PathBuf> {
    let mut entries = tokio::fs::read_dir(workdir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("mp4") {
            return Ok(path);
        }
    }
    Err(MediaError::download_failed("Output file not created"))
}

/// Read the video title from the `<stem>.info.json` sidecar, if present.
async fn read_title(video_path: &Path) -> Option<String> {
    let info_path = sibling_with_suffix(video_path, ".info.json")?;
    let content = match tokio::fs::read_to_string(&info_path).await {
        Ok(content) => content,
        Err(_) => return None,
    };
    match serde_json::from_str::<InfoJson>(&content) {
        Ok(info) => info.title,
        Err(e) => {
            warn!(path = %info_path.display(), error = %e, "Failed to parse info JSON");
            None
        }
    }
}

/// Replace a video path's `.mp4` extension with a multi-part suffix.
fn sibling_with_suffix(video_path: &Path, suffix: &str) -> Option<PathBuf> {
    let stem = video_path.file_stem()?.to_str()?;
    Some(video_path.with_file_name(format!("{}{}", stem, suffix)))
}

/// Check if a URL is a supported video platform.
pub fn is_supported_url(url: &str) -> bool {
    let supported_domains = ["youtube.com", "youtu.be"];
    supported_domains.iter().any(|domain| url.contains(domain))
}
