//! Clip pipeline worker binary.
//!
//! Takes a video URL, runs the full pipeline against it, and prints
//! the rendered clip artifacts.

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use clipmill_models::JobId;
use clipmill_pipeline::{ClipPipeline, FfmpegBackend, InMemoryStatusSink, PipelineConfig};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("clipmill=info".parse().expect("valid directive"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    let url = match std::env::args().nth(1) {
        Some(url) => url,
        None => {
            error!("Usage: clipmill-pipeline <video-url>");
            std::process::exit(2);
        }
    };

    info!("Starting clipmill pipeline");

    let config = PipelineConfig::from_env();
    info!("Pipeline config: {:?}", config);

    let sink = Arc::new(InMemoryStatusSink::new());
    let job_id = JobId::new();
    sink.register(job_id.clone(), url.clone());

    let pipeline = ClipPipeline::new(Arc::new(FfmpegBackend::new()), sink.clone(), config);

    match pipeline.run(&job_id, &url).await {
        Ok(clips) => {
            info!(job_id = %job_id, count = clips.len(), "Pipeline complete");
            for clip in &clips {
                info!(
                    filename = %clip.filename,
                    duration_seconds = clip.duration_seconds,
                    size_bytes = clip.size_bytes,
                    "Rendered clip"
                );
            }
        }
        Err(e) => {
            error!(job_id = %job_id, "Pipeline failed: {}", e);
            std::process::exit(1);
        }
    }
}
