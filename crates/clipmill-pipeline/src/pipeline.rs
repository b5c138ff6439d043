//! Pipeline orchestration.
//!
//! Drives one job through `queued → downloading → analyzing →
//! creating_clips → {complete | error}` with monotone progress
//! checkpoints (0/10/30/40, then linear 40→90 across renders, 100 on
//! completion). A failed render only removes that clip from the result
//! set; any other failure transitions the job straight to the terminal
//! `error` state. No step is ever retried here.

use std::path::Path;
use std::sync::Arc;
use tracing::info;

use clipmill_media::{Acquisition, RenderRequest};
use clipmill_models::{parse_srt, ClipResult, JobId, JobStatus, Moment, TranscriptSegment};

use crate::backend::MediaBackend;
use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::logging::JobLogger;
use crate::selector::select_moments;
use crate::status::StatusSink;

/// Progress checkpoints published at each state transition.
const PROGRESS_DOWNLOADING: u8 = 10;
const PROGRESS_ANALYZING: u8 = 30;
const PROGRESS_CREATING_CLIPS: u8 = 40;
const PROGRESS_RENDER_SPAN: f64 = 50.0;

/// One-shot moment-selection and clip-rendering pipeline.
///
/// Pure function of its inputs apart from the media backend's process
/// invocations and the injected status sink; one instance runs one job
/// on one logical thread of control.
pub struct ClipPipeline {
    backend: Arc<dyn MediaBackend>,
    sink: Arc<dyn StatusSink>,
    config: PipelineConfig,
}

impl ClipPipeline {
    pub fn new(
        backend: Arc<dyn MediaBackend>,
        sink: Arc<dyn StatusSink>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            backend,
            sink,
            config,
        }
    }

    /// Run the pipeline for one job.
    ///
    /// On failure the job is moved to the terminal `error` state with
    /// the failure description captured for display, and the error is
    /// returned to the caller.
    pub async fn run(&self, job_id: &JobId, url: &str) -> PipelineResult<Vec<ClipResult>> {
        match self.run_inner(job_id, url).await {
            Ok(clips) => Ok(clips),
            Err(e) => {
                self.sink.failed(job_id, e.to_string()).await;
                Err(e)
            }
        }
    }

    async fn run_inner(&self, job_id: &JobId, url: &str) -> PipelineResult<Vec<ClipResult>> {
        let logger = JobLogger::new(job_id, "clip_pipeline");
        logger.log_start("Starting clip pipeline");

        // Acquire the source video
        self.sink.status(job_id, JobStatus::Downloading).await;
        self.sink.progress(job_id, PROGRESS_DOWNLOADING).await;

        let work_dir = self.config.work_dir.join(job_id.as_str());
        tokio::fs::create_dir_all(&work_dir).await?;

        let acquisition = self
            .backend
            .acquire(url, &work_dir)
            .await
            .map_err(|e| PipelineError::AcquisitionFailed(e.to_string()))?;

        if let Some(title) = acquisition.title.clone() {
            self.sink.title(job_id, title).await;
        }

        // Probe and select moments
        self.sink.status(job_id, JobStatus::Analyzing).await;
        self.sink.progress(job_id, PROGRESS_ANALYZING).await;

        let duration = self.backend.probe_duration(&acquisition.video_path).await;
        let transcript = load_transcript(&acquisition).await;
        logger.log_progress(&format!(
            "Analyzing {:.1}s of video with {} transcript segments",
            duration,
            transcript.len()
        ));

        let moments = select_moments(&transcript, duration, self.config.max_clips);
        if moments.is_empty() {
            return Err(PipelineError::NoMomentsDetected);
        }

        // Render each selected moment
        self.sink.status(job_id, JobStatus::CreatingClips).await;
        self.sink.total_clips(job_id, moments.len()).await;
        self.sink.progress(job_id, PROGRESS_CREATING_CLIPS).await;

        let output_dir = self.config.output_dir.join(job_id.as_str());
        tokio::fs::create_dir_all(&output_dir).await?;

        let clips = self
            .render_moments(job_id, &logger, &acquisition, &transcript, &moments, &output_dir)
            .await;

        self.sink.status(job_id, JobStatus::Complete).await;
        self.sink.progress(job_id, 100).await;

        logger.log_completion(&format!(
            "Rendered {} of {} clips",
            clips.len(),
            moments.len()
        ));
        Ok(clips)
    }

    /// Render every moment, isolating per-clip failures.
    async fn render_moments(
        &self,
        job_id: &JobId,
        logger: &JobLogger,
        acquisition: &Acquisition,
        transcript: &[TranscriptSegment],
        moments: &[Moment],
        output_dir: &Path,
    ) -> Vec<ClipResult> {
        let mut clips = Vec::new();

        for (idx, moment) in moments.iter().enumerate() {
            let filename = format!("clip_{}.mp4", idx + 1);
            let request = RenderRequest {
                source: acquisition.video_path.clone(),
                start: moment.start,
                end: moment.end,
                output: output_dir.join(&filename),
            };

            match self.backend.render(&request, transcript).await {
                Ok(()) => match clip_result(&request, moment, &filename).await {
                    Some(clip) => {
                        info!(job_id = %job_id, clip = %filename, "Clip rendered");
                        self.sink.clip_finished(job_id, clip.clone()).await;
                        clips.push(clip);
                    }
                    None => {
                        logger.log_warning(&format!("Render of {} produced no output", filename));
                    }
                },
                // A failed clip is omitted from the results; the batch continues
                Err(e) => {
                    logger.log_warning(&format!("Render of {} failed: {}", filename, e));
                }
            }

            let done = idx + 1;
            let progress = PROGRESS_CREATING_CLIPS
                + ((done as f64 / moments.len() as f64) * PROGRESS_RENDER_SPAN) as u8;
            self.sink.clips_created(job_id, done).await;
            self.sink.progress(job_id, progress).await;
        }

        clips
    }
}

/// Load and parse the acquired subtitle track, if any.
///
/// Missing or unreadable subtitles yield an empty transcript — a valid
/// input state that routes the selector to its fallback path.
async fn load_transcript(acquisition: &Acquisition) -> Vec<TranscriptSegment> {
    let Some(path) = &acquisition.subtitle_path else {
        return Vec::new();
    };
    match tokio::fs::read_to_string(path).await {
        Ok(content) => parse_srt(&content),
        Err(_) => Vec::new(),
    }
}

/// Build the durable artifact record for a rendered clip.
///
/// The renderer only reports success; size comes from the filesystem
/// and a missing or empty output still counts as a failed render.
async fn clip_result(request: &RenderRequest, moment: &Moment, filename: &str) -> Option<ClipResult> {
    let size_bytes = tokio::fs::metadata(&request.output).await.ok()?.len();
    if size_bytes == 0 {
        return None;
    }
    Some(ClipResult {
        filename: filename.to_string(),
        duration_seconds: moment.duration() as u64,
        size_bytes,
        preview_text: moment.preview_text.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use clipmill_media::MediaError;
    use clipmill_models::srt::write_srt;

    use crate::backend::MockMediaBackend;
    use crate::status::InMemoryStatusSink;

    /// Transcript with one scoring hotspot every 100 s, each snapped to
    /// a caption boundary 65 s after the hotspot start.
    fn hotspot_transcript(hotspots: usize) -> Vec<TranscriptSegment> {
        let mut segments = Vec::new();
        for i in 0..hotspots {
            let s = i as f64 * 100.0;
            segments.push(TranscriptSegment::new(s, s + 2.0, "incredible!"));
            segments.push(TranscriptSegment::new(s + 58.0, s + 65.0, "plain words"));
        }
        segments
    }

    struct Fixture {
        pipeline: ClipPipeline,
        sink: Arc<InMemoryStatusSink>,
        job_id: JobId,
        _tmp: tempfile::TempDir,
    }

    /// Wire a pipeline around a mock backend, with work/output dirs in
    /// a temp directory and the job pre-registered with the sink.
    fn fixture(backend: MockMediaBackend) -> Fixture {
        let tmp = tempfile::tempdir().unwrap();
        let config = PipelineConfig {
            max_clips: 10,
            work_dir: tmp.path().join("processing"),
            output_dir: tmp.path().join("output"),
        };
        let sink = Arc::new(InMemoryStatusSink::new());
        let job_id = JobId::new();
        sink.register(job_id.clone(), "https://youtube.com/watch?v=abc");

        let pipeline = ClipPipeline::new(Arc::new(backend), sink.clone(), config);
        Fixture {
            pipeline,
            sink,
            job_id,
            _tmp: tmp,
        }
    }

    /// Acquisition fixture whose subtitle file holds the given segments.
    fn acquisition_with_transcript(
        dir: &Path,
        segments: &[TranscriptSegment],
    ) -> Acquisition {
        let video_path = dir.join("source.mp4");
        std::fs::write(&video_path, b"video bytes").unwrap();
        let subtitle_path = dir.join("source.en.srt");
        std::fs::write(&subtitle_path, write_srt(segments)).unwrap();
        Acquisition {
            video_path,
            subtitle_path: Some(subtitle_path),
            title: Some("Test Video".to_string()),
        }
    }

    fn expect_render_writing_output(backend: &mut MockMediaBackend) {
        backend
            .expect_render()
            .returning(|request, _transcript| {
                std::fs::write(&request.output, b"clip bytes").unwrap();
                Ok(())
            });
    }

    #[tokio::test]
    async fn test_happy_path() {
        let fixture_dir = tempfile::tempdir().unwrap();
        let acquisition = acquisition_with_transcript(fixture_dir.path(), &hotspot_transcript(3));

        let mut backend = MockMediaBackend::new();
        let acq = acquisition.clone();
        backend
            .expect_acquire()
            .times(1)
            .returning(move |_, _| Ok(acq.clone()));
        backend.expect_probe_duration().returning(|_| 1000.0);
        expect_render_writing_output(&mut backend);

        let f = fixture(backend);
        let clips = f.pipeline.run(&f.job_id, "https://youtube.com/watch?v=abc").await.unwrap();

        assert_eq!(clips.len(), 3);
        assert_eq!(clips[0].filename, "clip_1.mp4");
        assert_eq!(clips[0].duration_seconds, 65);
        assert!(clips.iter().all(|c| c.size_bytes > 0));

        let record = f.sink.get(&f.job_id).unwrap();
        assert_eq!(record.status, JobStatus::Complete);
        assert_eq!(record.progress, 100);
        assert_eq!(record.total_clips, 3);
        assert_eq!(record.clips_created, 3);
        assert_eq!(record.clips.len(), 3);
        assert_eq!(record.video_title.as_deref(), Some("Test Video"));
        assert!(record.completed_at.is_some());
    }

    #[tokio::test]
    async fn test_render_failure_is_isolated() {
        let fixture_dir = tempfile::tempdir().unwrap();
        let acquisition = acquisition_with_transcript(fixture_dir.path(), &hotspot_transcript(5));

        let mut backend = MockMediaBackend::new();
        let acq = acquisition.clone();
        backend
            .expect_acquire()
            .returning(move |_, _| Ok(acq.clone()));
        backend.expect_probe_duration().returning(|_| 1000.0);
        backend.expect_render().returning(|request, _| {
            // Clip 3 of 5 fails; the rest render normally
            if request.output.ends_with("clip_3.mp4") {
                Err(MediaError::ffmpeg_failed(
                    "FFmpeg exited with non-zero status",
                    None,
                    Some(1),
                ))
            } else {
                std::fs::write(&request.output, b"clip bytes").unwrap();
                Ok(())
            }
        });

        let f = fixture(backend);
        let clips = f.pipeline.run(&f.job_id, "https://youtube.com/watch?v=abc").await.unwrap();

        assert_eq!(clips.len(), 4);
        let names: Vec<&str> = clips.iter().map(|c| c.filename.as_str()).collect();
        assert_eq!(names, ["clip_1.mp4", "clip_2.mp4", "clip_4.mp4", "clip_5.mp4"]);

        // The batch still completes
        let record = f.sink.get(&f.job_id).unwrap();
        assert_eq!(record.status, JobStatus::Complete);
        assert_eq!(record.clips_created, 5);
        assert_eq!(record.clips.len(), 4);
    }

    #[tokio::test]
    async fn test_fallback_without_transcript() {
        let fixture_dir = tempfile::tempdir().unwrap();
        let video_path = fixture_dir.path().join("source.mp4");
        std::fs::write(&video_path, b"video bytes").unwrap();
        let acquisition = Acquisition {
            video_path,
            subtitle_path: None,
            title: None,
        };

        let mut backend = MockMediaBackend::new();
        backend
            .expect_acquire()
            .returning(move |_, _| Ok(acquisition.clone()));
        backend.expect_probe_duration().returning(|_| 600.0);
        expect_render_writing_output(&mut backend);

        let f = fixture(backend);
        let clips = f.pipeline.run(&f.job_id, "https://youtube.com/watch?v=abc").await.unwrap();

        // min(floor(600/60), 10) interval windows
        assert_eq!(clips.len(), 10);
        assert!(clips.iter().all(|c| c.preview_text == "Interval clip"));
    }

    #[tokio::test]
    async fn test_no_moments_is_fatal() {
        let fixture_dir = tempfile::tempdir().unwrap();
        // Transcript present but nothing scores above threshold
        let acquisition = acquisition_with_transcript(
            fixture_dir.path(),
            &[TranscriptSegment::new(0.0, 5.0, "plain narration")],
        );

        let mut backend = MockMediaBackend::new();
        backend
            .expect_acquire()
            .returning(move |_, _| Ok(acquisition.clone()));
        backend.expect_probe_duration().returning(|_| 600.0);
        backend.expect_render().never();

        let f = fixture(backend);
        let err = f
            .pipeline
            .run(&f.job_id, "https://youtube.com/watch?v=abc")
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::NoMomentsDetected));

        let record = f.sink.get(&f.job_id).unwrap();
        assert_eq!(record.status, JobStatus::Error);
        assert_eq!(record.error.as_deref(), Some("No moments detected in video"));
        // Never reached the rendering checkpoint
        assert!(record.progress <= 30);
    }

    #[tokio::test]
    async fn test_acquisition_failure_is_fatal() {
        let mut backend = MockMediaBackend::new();
        backend
            .expect_acquire()
            .returning(|_, _| Err(MediaError::download_failed("Output file not created")));
        backend.expect_probe_duration().never();
        backend.expect_render().never();

        let f = fixture(backend);
        let err = f
            .pipeline
            .run(&f.job_id, "https://youtube.com/watch?v=bad")
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::AcquisitionFailed(_)));

        let record = f.sink.get(&f.job_id).unwrap();
        assert_eq!(record.status, JobStatus::Error);
        assert!(record.error.unwrap().contains("Output file not created"));
    }

    #[tokio::test]
    async fn test_empty_render_output_is_omitted() {
        let fixture_dir = tempfile::tempdir().unwrap();
        let acquisition = acquisition_with_transcript(fixture_dir.path(), &hotspot_transcript(2));

        let mut backend = MockMediaBackend::new();
        let acq = acquisition.clone();
        backend
            .expect_acquire()
            .returning(move |_, _| Ok(acq.clone()));
        backend.expect_probe_duration().returning(|_| 1000.0);
        backend.expect_render().returning(|request, _| {
            // "Success" that leaves a zero-byte file behind
            if request.output.ends_with("clip_2.mp4") {
                std::fs::write(&request.output, b"").unwrap();
            } else {
                std::fs::write(&request.output, b"clip bytes").unwrap();
            }
            Ok(())
        });

        let f = fixture(backend);
        let clips = f.pipeline.run(&f.job_id, "https://youtube.com/watch?v=abc").await.unwrap();
        assert_eq!(clips.len(), 1);
        assert_eq!(clips[0].filename, "clip_1.mp4");
    }
}
