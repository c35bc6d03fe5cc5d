//! Per-invocation time-lapse parameters.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use camlapse_common::clock::EpochSecs;
use camlapse_common::config::TimelapseDefaults;
use camlapse_common::error::{CamlapseError, CamlapseResult};

/// Extension of the intermediate motion-JPEG stream.
pub const INTERMEDIATE_EXTENSION: &str = "mjpeg";

/// Parameters of one time-lapse job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelapseParams {
    /// UUID of the camera to sample.
    pub camera: String,

    /// Base name for `<filename>.mjpeg` and the final video.
    pub filename: String,

    /// Range start in epoch seconds (defaults to the first eligible event).
    pub start_time: Option<EpochSecs>,

    /// Range end in epoch seconds (defaults to the last eligible event).
    pub end_time: Option<EpochSecs>,

    /// Only keep events with this classifier category.
    pub category: Option<String>,

    /// Frames requested per event clip.
    pub frames_per_event: u32,

    /// Event cap (0 = uncapped).
    pub max_events: usize,

    /// Still frames per hour of real time.
    pub frames_per_hour: u32,

    /// Requested image width.
    pub width: u32,

    /// Fetches kept in flight.
    pub fetch_concurrency: usize,
}

impl TimelapseParams {
    /// Parameters for a camera using the built-in defaults.
    pub fn new(camera: impl Into<String>) -> Self {
        Self::from_defaults(camera, &TimelapseDefaults::default())
    }

    /// Parameters for a camera using configured defaults.
    pub fn from_defaults(camera: impl Into<String>, defaults: &TimelapseDefaults) -> Self {
        Self {
            camera: camera.into(),
            filename: defaults.filename.clone(),
            start_time: None,
            end_time: None,
            category: None,
            frames_per_event: defaults.frames_per_event,
            max_events: defaults.max_events,
            frames_per_hour: defaults.frames_per_hour,
            width: defaults.image_width,
            fetch_concurrency: defaults.fetch_concurrency,
        }
    }

    /// Reject parameter combinations the pipeline cannot honor.
    pub fn validate(&self) -> CamlapseResult<()> {
        if self.camera.trim().is_empty() {
            return Err(CamlapseError::invalid_parameter("camera must not be empty"));
        }
        if self.filename.trim().is_empty() {
            return Err(CamlapseError::invalid_parameter(
                "filename must not be empty",
            ));
        }
        if self.frames_per_hour == 0 {
            return Err(CamlapseError::invalid_parameter(
                "frames_per_hour must be greater than zero",
            ));
        }
        if self.frames_per_event == 0 {
            return Err(CamlapseError::invalid_parameter(
                "frames_per_event must be greater than zero",
            ));
        }
        if self.width == 0 {
            return Err(CamlapseError::invalid_parameter(
                "width must be greater than zero",
            ));
        }
        if self.fetch_concurrency == 0 {
            return Err(CamlapseError::invalid_parameter(
                "fetch_concurrency must be at least one",
            ));
        }
        for (name, bound) in [("start_time", self.start_time), ("end_time", self.end_time)] {
            if bound.is_some_and(|t| !t.is_finite()) {
                return Err(CamlapseError::invalid_parameter(format!(
                    "{name} must be a finite time"
                )));
            }
        }
        if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            if end < start {
                return Err(CamlapseError::invalid_parameter(format!(
                    "end_time {end} is before start_time {start}"
                )));
            }
        }
        Ok(())
    }

    /// Path of the intermediate motion-JPEG stream.
    pub fn intermediate_path(&self) -> PathBuf {
        PathBuf::from(format!("{}.{INTERMEDIATE_EXTENSION}", self.filename))
    }

    /// Path of the final video for the given container extension.
    pub fn output_path(&self, video_extension: &str) -> PathBuf {
        PathBuf::from(format!("{}.{video_extension}", self.filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = TimelapseParams::new("cam");
        assert_eq!(params.filename, "timelapse");
        assert_eq!(params.frames_per_event, 9);
        assert_eq!(params.max_events, 25);
        assert_eq!(params.frames_per_hour, 4);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_artifact_paths() {
        let mut params = TimelapseParams::new("cam");
        params.filename = "out/porch".to_string();
        assert_eq!(params.intermediate_path(), PathBuf::from("out/porch.mjpeg"));
        assert_eq!(params.output_path("mp4"), PathBuf::from("out/porch.mp4"));
    }

    #[test]
    fn test_validate_rejects_zero_rate() {
        let mut params = TimelapseParams::new("cam");
        params.frames_per_hour = 0;
        assert!(matches!(
            params.validate(),
            Err(CamlapseError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let mut params = TimelapseParams::new("cam");
        params.start_time = Some(200.0);
        params.end_time = Some(100.0);
        assert!(params.validate().is_err());

        params.end_time = Some(200.0);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_finite_bound() {
        let mut params = TimelapseParams::new("cam");
        params.start_time = Some(f64::NAN);
        assert!(params.validate().is_err());
    }
}
