//! Timeline scheduling.
//!
//! Interleaves uniformly spaced sample instants with eligible events. The
//! merge is a two-pointer walk over both ascending sequences and stops as
//! soon as either one runs out: trailing samples past the last event, or
//! trailing events past the last sample, are not scheduled.

use camlapse_camera_model::{Directive, Event, TimelapseParams, Timeline};
use camlapse_common::clock::{secs_to_hours, EpochSecs};
use camlapse_common::error::{CamlapseError, CamlapseResult};

/// Upper bound on sample instants for one job. Each one is a fetch.
pub const MAX_SAMPLE_INSTANTS: usize = 1_000_000;

/// A scheduled timeline together with the inputs it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    /// Effective range start.
    pub start_time: EpochSecs,

    /// Effective range end.
    pub end_time: EpochSecs,

    /// Number of generated sample instants.
    pub sample_count: usize,

    /// Number of eligible events offered to the merge.
    pub event_count: usize,

    /// Merged directives.
    pub timeline: Timeline,
}

/// Resolve the time range, defaulting open bounds to the first/last event.
pub fn effective_range(
    start_time: Option<EpochSecs>,
    end_time: Option<EpochSecs>,
    events: &[Event],
) -> CamlapseResult<(EpochSecs, EpochSecs)> {
    let start = match start_time {
        Some(start) => start,
        None => events
            .first()
            .map(|e| e.time)
            .ok_or(CamlapseError::NoEligibleEvents)?,
    };
    let end = match end_time {
        Some(end) => end,
        None => events
            .last()
            .map(|e| e.time)
            .ok_or(CamlapseError::NoEligibleEvents)?,
    };
    if end < start {
        return Err(CamlapseError::invalid_parameter(format!(
            "time range ends ({end}) before it starts ({start})"
        )));
    }
    Ok((start, end))
}

/// Uniform sample instants over `[start, end)`.
///
/// Produces `frames_per_hour × duration_hours` instants (at least one, at
/// `start`), equally spaced and strictly increasing. Ranges that would need
/// more than [`MAX_SAMPLE_INSTANTS`] are rejected before anything is allocated.
pub fn sample_instants(
    start: EpochSecs,
    end: EpochSecs,
    frames_per_hour: u32,
) -> CamlapseResult<Vec<EpochSecs>> {
    if frames_per_hour == 0 {
        return Err(CamlapseError::invalid_parameter(
            "frames_per_hour must be greater than zero",
        ));
    }
    if !start.is_finite() || !end.is_finite() || end < start {
        return Err(CamlapseError::invalid_parameter(format!(
            "invalid sample range [{start}, {end})"
        )));
    }

    let duration = end - start;
    let wanted = (secs_to_hours(duration) * f64::from(frames_per_hour)).floor();
    if wanted > MAX_SAMPLE_INSTANTS as f64 {
        return Err(CamlapseError::invalid_parameter(format!(
            "{wanted} still frames requested over [{start}, {end}); \
             narrow the range or lower frames_per_hour (limit {MAX_SAMPLE_INSTANTS})"
        )));
    }
    let count = (wanted as usize).max(1);
    let interval = duration / count as f64;

    let mut instants: Vec<EpochSecs> = (0..count).map(|n| start + n as f64 * interval).collect();
    // Sub-ulp intervals would otherwise repeat values.
    instants.dedup();
    Ok(instants)
}

/// Merge sample instants and events into one timeline.
///
/// `t < event.time` emits a still frame; otherwise (ties included) the
/// event clip wins. Halts when either side is exhausted.
pub fn merge(samples: &[EpochSecs], events: &[Event], frames_per_event: u32) -> Timeline {
    let mut timeline = Timeline::with_capacity(samples.len().min(events.len()) * 2);
    let (mut next_sample, mut next_event) = (0, 0);

    while next_sample < samples.len() && next_event < events.len() {
        let t = samples[next_sample];
        let event = &events[next_event];
        if t < event.time {
            timeline.push(Directive::StillFrame { time: t });
            next_sample += 1;
        } else {
            timeline.push(Directive::EventClip {
                event: event.clone(),
                frame_count: frames_per_event,
            });
            next_event += 1;
        }
    }

    timeline
}

/// Build the timeline for a job from its already-filtered events.
pub fn build_schedule(params: &TimelapseParams, events: &[Event]) -> CamlapseResult<Schedule> {
    if events.is_empty() {
        return Err(CamlapseError::NoEligibleEvents);
    }
    let (start_time, end_time) = effective_range(params.start_time, params.end_time, events)?;
    let samples = sample_instants(start_time, end_time, params.frames_per_hour)?;
    let timeline = merge(&samples, events, params.frames_per_event);

    tracing::info!(
        "Generating time-lapse from {} events and {} still frames",
        events.len(),
        samples.len()
    );
    tracing::debug!(
        start_time,
        end_time,
        directives = timeline.len(),
        clips = timeline.event_clips(),
        stills = timeline.still_frames(),
        "Scheduled timeline"
    );

    Ok(Schedule {
        start_time,
        end_time,
        sample_count: samples.len(),
        event_count: events.len(),
        timeline,
    })
}

/// Just the merged timeline.
pub fn build_timeline(params: &TimelapseParams, events: &[Event]) -> CamlapseResult<Timeline> {
    build_schedule(params, events).map(|schedule| schedule.timeline)
}
