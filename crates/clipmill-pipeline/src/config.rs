//! Pipeline configuration.

use std::path::PathBuf;

use crate::selector::DEFAULT_MAX_CLIPS;

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Maximum clips to select per job
    pub max_clips: usize,
    /// Directory for per-job download workspaces
    pub work_dir: PathBuf,
    /// Directory for per-job rendered clips
    pub output_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_clips: DEFAULT_MAX_CLIPS,
            work_dir: PathBuf::from("processing"),
            output_dir: PathBuf::from("output"),
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_clips: std::env::var("CLIPMILL_MAX_CLIPS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_clips),
            work_dir: std::env::var("CLIPMILL_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.work_dir),
            output_dir: std::env::var("CLIPMILL_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
        }
    }
}
