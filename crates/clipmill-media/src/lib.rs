//! External media tool wrappers for clipmill.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building and execution
//! - FFprobe duration/stream probing
//! - yt-dlp video + subtitle acquisition
//! - The per-clip caption burn-in render contract

pub mod command;
pub mod download;
pub mod error;
pub mod probe;
pub mod render;

pub use command::{check_ffmpeg, check_ffprobe, check_ytdlp, FfmpegCommand, FfmpegRunner};
pub use download::{acquire_video, is_supported_url, Acquisition};
pub use error::{MediaError, MediaResult};
pub use probe::{get_duration, probe_video, VideoInfo};
pub use render::{render_clip, scope_captions, RenderRequest};
