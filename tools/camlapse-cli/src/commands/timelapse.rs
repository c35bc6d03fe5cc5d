//! Build a time-lapse video.

use std::io::Write;

use camlapse_camera_model::TimelapseParams;
use camlapse_common::clock::{format_epoch, EpochSecs};
use camlapse_encoder::{Encoder, FfmpegEncoder};
use camlapse_timelapse_core::{FetchProgress, JobOutcome, TimelapseJob};

use super::Context;

/// Per-invocation overrides of the configured defaults.
pub struct TimelapseArgs {
    pub camera: String,
    pub filename: Option<String>,
    pub start: Option<EpochSecs>,
    pub end: Option<EpochSecs>,
    pub category: Option<String>,
    pub frames_per_event: Option<u32>,
    pub max_events: Option<usize>,
    pub frames_per_hour: Option<u32>,
    pub width: Option<u32>,
    pub concurrency: Option<usize>,
}

impl TimelapseArgs {
    fn into_params(self, camera_uuid: String, ctx: &Context) -> TimelapseParams {
        let mut params = TimelapseParams::from_defaults(camera_uuid, &ctx.config.timelapse);
        if let Some(filename) = self.filename {
            params.filename = filename;
        }
        params.start_time = self.start;
        params.end_time = self.end;
        params.category = self.category;
        if let Some(n) = self.frames_per_event {
            params.frames_per_event = n;
        }
        if let Some(n) = self.max_events {
            params.max_events = n;
        }
        if let Some(n) = self.frames_per_hour {
            params.frames_per_hour = n;
        }
        if let Some(width) = self.width {
            params.width = width;
        }
        if let Some(n) = self.concurrency {
            params.fetch_concurrency = n;
        }
        params
    }
}

pub async fn run(ctx: &Context, args: TimelapseArgs) -> anyhow::Result<()> {
    let encoder = FfmpegEncoder::from_config(&ctx.config.encoder);
    encoder.ensure_available().await?;
    let session = ctx.session().await?;
    let client = ctx.client()?;
    let camera = ctx.camera(&client, &session, &args.camera).await?;
    let params = args.into_params(camera.uuid.clone(), ctx);
    params.validate()?;

    println!("Building time-lapse for {camera}");
    match (params.start_time, params.end_time) {
        (Some(start), Some(end)) => {
            println!("  Range: {} .. {}", format_epoch(start), format_epoch(end))
        }
        (Some(start), None) => println!("  Range: {} .. last event", format_epoch(start)),
        (None, Some(end)) => println!("  Range: first event .. {}", format_epoch(end)),
        (None, None) => println!("  Range: first event .. last event"),
    }
    println!(
        "  Output: {}",
        params.output_path(&ctx.config.encoder.video_extension).display()
    );

    let progress_cb = Box::new(|p: FetchProgress| {
        print!(
            "\r  Fetching: {}/{} ({} with media)  ",
            p.completed, p.total, p.fetched
        );
        let _ = std::io::stdout().flush();
    });

    let mut job = TimelapseJob::new(&client, &encoder, &session, params).with_progress(progress_cb);
    let report = job.run().await?;
    println!();

    println!(
        "  {} events, {} still frames, {} directives ({} bytes assembled, {} skipped)",
        report.events,
        report.still_frames,
        report.directives,
        report.assembly.bytes_written,
        report.assembly.skipped
    );
    match report.outcome {
        JobOutcome::Completed => {
            println!("Time-Lapse Complete: {}", report.output.display());
        }
        JobOutcome::CompletedWithWarning { warning } => {
            println!("Warning: {warning}");
            println!(
                "Time-Lapse Complete (intermediate stream kept at {})",
                report.intermediate.display()
            );
        }
    }
    Ok(())
}
