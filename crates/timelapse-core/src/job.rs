//! Time-lapse job orchestration.
//!
//! A job runs once, front to back:
//!
//! ```text
//! Initialized → Filtering → Scheduling → Fetching → Assembling → Encoding → Completed
//!                   │                                                  └──► CompletedWithWarning
//!                   └──► Failed (encoder missing, no eligible events, I/O)
//! ```

use std::path::PathBuf;

use futures::StreamExt;

use camlapse_camera_model::{Session, TimelapseParams, Timeline};
use camlapse_common::error::{CamlapseError, CamlapseResult};
use camlapse_encoder::{EncodeOutcome, Encoder};

use crate::assembler::{AssemblyReport, StreamAssembler};
use crate::fetcher::MediaFetcher;
use crate::filter::{eligible_events, EventFilter};
use crate::scheduler::build_schedule;
use crate::service::CameraService;

/// Lifecycle of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Initialized,
    Filtering,
    Scheduling,
    Fetching,
    Assembling,
    Encoding,
    Completed,
    CompletedWithWarning,
    Failed,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Completed | Self::CompletedWithWarning | Self::Failed
        )
    }
}

/// How a finished job ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Completed,
    CompletedWithWarning { warning: String },
}

/// Per-directive progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchProgress {
    /// Directives resolved so far.
    pub completed: usize,

    /// Directives in the timeline.
    pub total: usize,

    /// Directives that produced media so far.
    pub fetched: usize,
}

/// Progress callback for the fetch stage.
pub type ProgressCallback = Box<dyn Fn(FetchProgress) + Send + Sync>;

/// Summary of a finished job.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelapseReport {
    pub outcome: JobOutcome,

    /// The assembled motion-JPEG stream.
    pub intermediate: PathBuf,

    /// The requested video artifact.
    pub output: PathBuf,

    pub assembly: AssemblyReport,

    /// Eligible events offered to the scheduler.
    pub events: usize,

    /// Sample instants offered to the scheduler.
    pub still_frames: usize,

    /// Directives in the merged timeline.
    pub directives: usize,

    /// Encoder result, when the encoder ran.
    pub encode: Option<EncodeOutcome>,
}

/// One time-lapse run against a camera service and an encoder.
pub struct TimelapseJob<'a, S: CameraService + ?Sized, E: Encoder + ?Sized> {
    service: &'a S,
    encoder: &'a E,
    session: &'a Session,
    params: TimelapseParams,
    state: JobState,
    timeline: Option<Timeline>,
    progress: Option<ProgressCallback>,
}

impl<'a, S: CameraService + ?Sized, E: Encoder + ?Sized> TimelapseJob<'a, S, E> {
    pub fn new(
        service: &'a S,
        encoder: &'a E,
        session: &'a Session,
        params: TimelapseParams,
    ) -> Self {
        Self {
            service,
            encoder,
            session,
            params,
            state: JobState::Initialized,
            timeline: None,
            progress: None,
        }
    }

    /// Report fetch progress through `callback`.
    #[must_use]
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn params(&self) -> &TimelapseParams {
        &self.params
    }

    /// The scheduled timeline, once scheduling has run.
    pub fn timeline(&self) -> Option<&Timeline> {
        self.timeline.as_ref()
    }

    /// Run the job to a terminal state.
    ///
    /// `Err` means the job failed; the state is then [`JobState::Failed`].
    pub async fn run(&mut self) -> CamlapseResult<TimelapseReport> {
        if self.state != JobState::Initialized {
            return Err(CamlapseError::invalid_parameter(
                "a time-lapse job can only run once",
            ));
        }

        match self.execute().await {
            Ok(report) => {
                let terminal = match report.outcome {
                    JobOutcome::Completed => JobState::Completed,
                    JobOutcome::CompletedWithWarning { .. } => JobState::CompletedWithWarning,
                };
                self.transition(terminal);
                tracing::info!(output = %report.output.display(), "Time-Lapse Complete");
                Ok(report)
            }
            Err(err) => {
                self.transition(JobState::Failed);
                tracing::error!(error = %err, "Time-lapse failed");
                Err(err)
            }
        }
    }

    async fn execute(&mut self) -> CamlapseResult<TimelapseReport> {
        self.params.validate()?;
        // Fail before any network work when the encoder is missing.
        self.encoder.ensure_available().await?;

        self.transition(JobState::Filtering);
        let raw = self
            .service
            .list_events(
                self.session,
                &self.params.camera,
                self.params.start_time,
                self.params.end_time,
            )
            .await?;
        let events = eligible_events(&raw, &EventFilter::from_params(&self.params))?;

        self.transition(JobState::Scheduling);
        let schedule = build_schedule(&self.params, &events)?;
        let timeline = schedule.timeline.clone();
        let total = timeline.len();
        self.timeline = Some(schedule.timeline);

        self.transition(JobState::Fetching);
        let intermediate = self.params.intermediate_path();
        let output = self.params.output_path(self.encoder.video_extension());
        let fetcher = MediaFetcher::new(
            self.service,
            self.session,
            self.params.camera.clone(),
            self.params.width,
        )
        .with_concurrency(self.params.fetch_concurrency);

        let mut assembler = StreamAssembler::create(&intermediate)?;
        let mut results = fetcher.fetch_stream(timeline);
        let mut completed = 0;
        while let Some(result) = results.next().await {
            assembler.append(&result)?;
            completed += 1;
            if let Some(cb) = &self.progress {
                cb(FetchProgress {
                    completed,
                    total,
                    fetched: assembler.report().payloads_written,
                });
            }
        }
        drop(results);

        self.transition(JobState::Assembling);
        let assembly = assembler.finish()?;

        if assembly.payloads_written == 0 {
            return Ok(TimelapseReport {
                outcome: JobOutcome::CompletedWithWarning {
                    warning: "no media could be fetched; skipped encoding".to_string(),
                },
                intermediate,
                output,
                assembly,
                events: schedule.event_count,
                still_frames: schedule.sample_count,
                directives: total,
                encode: None,
            });
        }

        self.transition(JobState::Encoding);
        let (outcome, encode) = match self.encoder.encode(&intermediate, &output).await {
            Ok(encoded) if encoded.success() => (JobOutcome::Completed, Some(encoded)),
            Ok(encoded) => {
                let warning = format!(
                    "{} returned error code {} generating {}",
                    self.encoder.name(),
                    encoded
                        .status_code
                        .map_or_else(|| "(signal)".to_string(), |c| c.to_string()),
                    output.display()
                );
                tracing::warn!("Warning: {warning}");
                (JobOutcome::CompletedWithWarning { warning }, Some(encoded))
            }
            Err(err) => {
                let warning = err.to_string();
                tracing::warn!("Warning: {warning}");
                (JobOutcome::CompletedWithWarning { warning }, None)
            }
        };

        Ok(TimelapseReport {
            outcome,
            intermediate,
            output,
            assembly,
            events: schedule.event_count,
            still_frames: schedule.sample_count,
            directives: total,
            encode,
        })
    }

    fn transition(&mut self, next: JobState) {
        tracing::debug!(from = ?self.state, to = ?next, "Job state");
        self.state = next;
    }
}
