//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CamlapseError, CamlapseResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default time-lapse parameters.
    pub timelapse: TimelapseDefaults,

    /// External encoder settings.
    pub encoder: EncoderConfig,

    /// Session cache settings.
    pub session: SessionConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default time-lapse parameters, overridable per invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelapseDefaults {
    /// Base name for the intermediate and final artifacts.
    pub filename: String,

    /// Frames requested for each event clip.
    pub frames_per_event: u32,

    /// Cap on the number of events (0 = uncapped).
    pub max_events: usize,

    /// Still frames sampled per hour of real time.
    pub frames_per_hour: u32,

    /// Requested image width (X resolution).
    pub image_width: u32,

    /// Number of fetches kept in flight.
    pub fetch_concurrency: usize,
}

/// External transcoding utility settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Binary name or path.
    pub binary: String,

    /// Extension of the final video artifact.
    pub video_extension: String,

    /// Extra arguments inserted before the output path.
    pub extra_args: Vec<String>,
}

/// Session cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Cookie cache file.
    pub cookie_cache: PathBuf,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "camlapse=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for TimelapseDefaults {
    fn default() -> Self {
        Self {
            filename: "timelapse".to_string(),
            frames_per_event: 9,
            max_events: 25,
            frames_per_hour: 4,
            image_width: 720,
            fetch_concurrency: 1,
        }
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            binary: "ffmpeg".to_string(),
            video_extension: "mp4".to_string(),
            extra_args: Vec::new(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_cache: home_dir().join(".dropcam_cookie_cache"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from an explicit path.
    ///
    /// A missing file yields the defaults. A file that cannot be read or
    /// parsed is a [`CamlapseError::Config`] error.
    pub fn load_from(config_path: &Path) -> CamlapseResult<Self> {
        let content = match std::fs::read_to_string(config_path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(CamlapseError::config(format!(
                    "failed to read {}: {e}",
                    config_path.display()
                )))
            }
        };
        serde_json::from_str(&content).map_err(|e| {
            CamlapseError::config(format!("failed to parse {}: {e}", config_path.display()))
        })
    }

    /// Save config to an explicit path.
    pub fn save_to(&self, config_path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"));
    base.join("camlapse").join("config.json")
}

fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_classic_timelapse() {
        let config = AppConfig::default();
        assert_eq!(config.timelapse.frames_per_event, 9);
        assert_eq!(config.timelapse.max_events, 25);
        assert_eq!(config.timelapse.frames_per_hour, 4);
        assert_eq!(config.timelapse.image_width, 720);
        assert_eq!(config.encoder.binary, "ffmpeg");
        assert_eq!(config.encoder.video_extension, "mp4");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let raw = r#"{ "timelapse": { "frames_per_hour": 12 }, "logging": { "json": true } }"#;
        let config: AppConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.timelapse.frames_per_hour, 12);
        assert_eq!(config.timelapse.frames_per_event, 9);
        assert!(config.logging.json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_save_and_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = AppConfig::default();
        config.encoder.video_extension = "mkv".to_string();
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.encoder.video_extension, "mkv");
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = AppConfig::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(loaded.timelapse.filename, "timelapse");
    }

    #[test]
    fn test_malformed_config_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, CamlapseError::Config { .. }));
        assert!(err.to_string().starts_with("Configuration error: failed to parse"));
    }
}
