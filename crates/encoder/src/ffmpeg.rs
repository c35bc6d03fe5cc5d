//! Encoder backends.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use camlapse_common::config::EncoderConfig;
use camlapse_common::error::{CamlapseError, CamlapseResult};

/// Trait for external transcoders.
#[async_trait]
pub trait Encoder: Send + Sync {
    /// Backend name.
    fn name(&self) -> &str;

    /// Check if the transcoder is installed.
    async fn is_available(&self) -> bool;

    /// Platform-specific installation guidance.
    fn install_hint(&self) -> String;

    /// Extension of the produced video artifact.
    fn video_extension(&self) -> &str;

    /// Transcode `input` into `output`.
    ///
    /// A non-zero exit is reported through [`EncodeOutcome`], not as an error.
    async fn encode(&self, input: &Path, output: &Path) -> CamlapseResult<EncodeOutcome>;

    /// Fail fast with installation guidance when the transcoder is absent.
    async fn ensure_available(&self) -> CamlapseResult<()> {
        if self.is_available().await {
            Ok(())
        } else {
            Err(CamlapseError::encoder_missing(
                self.name(),
                self.install_hint(),
            ))
        }
    }
}

/// How a transcoder run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOutcome {
    /// Path the transcoder was asked to write.
    pub output: PathBuf,

    /// Process exit code (`None` when killed by a signal).
    pub status_code: Option<i32>,

    /// Captured standard error.
    pub stderr: String,
}

impl EncodeOutcome {
    pub fn success(&self) -> bool {
        self.status_code == Some(0)
    }
}

/// ffmpeg invoked as a subprocess with a discrete argument list.
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    binary: String,
    video_extension: String,
    extra_args: Vec<String>,
}

impl Default for FfmpegEncoder {
    fn default() -> Self {
        Self::from_config(&EncoderConfig::default())
    }
}

impl FfmpegEncoder {
    pub fn from_config(config: &EncoderConfig) -> Self {
        Self {
            binary: config.binary.clone(),
            video_extension: config.video_extension.clone(),
            extra_args: config.extra_args.clone(),
        }
    }

    /// Use a custom binary name or path.
    #[must_use]
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Arguments passed to the binary for one encode.
    pub fn build_args(&self, input: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-hide_banner", "-loglevel", "error", "-y", "-i"]
            .iter()
            .map(OsString::from)
            .collect();
        args.push(input.as_os_str().to_owned());
        args.extend(self.extra_args.iter().map(OsString::from));
        args.push(output.as_os_str().to_owned());
        args
    }
}

#[async_trait]
impl Encoder for FfmpegEncoder {
    fn name(&self) -> &str {
        &self.binary
    }

    async fn is_available(&self) -> bool {
        command_responds(&self.binary).await
    }

    fn install_hint(&self) -> String {
        install_hint_for(&self.binary)
    }

    fn video_extension(&self) -> &str {
        &self.video_extension
    }

    async fn encode(&self, input: &Path, output: &Path) -> CamlapseResult<EncodeOutcome> {
        let args = self.build_args(input, output);
        tracing::debug!(binary = %self.binary, args = ?args, "Running encoder");

        let started = std::time::Instant::now();
        let result = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| CamlapseError::encode(format!("Failed to start {}: {e}", self.binary)))?;

        let outcome = EncodeOutcome {
            output: output.to_path_buf(),
            status_code: result.status.code(),
            stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
        };

        if outcome.success() {
            tracing::info!(
                output = %output.display(),
                elapsed_secs = started.elapsed().as_secs_f64(),
                "Encoder finished"
            );
        } else {
            tracing::warn!(
                status = ?outcome.status_code,
                stderr = %outcome.stderr,
                "Encoder exited with an error"
            );
        }

        Ok(outcome)
    }
}

/// Probe a binary with its version query.
async fn command_responds(binary: &str) -> bool {
    Command::new(binary)
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map(|status| status.success())
        .unwrap_or(false)
}

fn install_hint_for(binary: &str) -> String {
    let program = Path::new(binary)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(binary);
    if program != "ffmpeg" {
        return format!("install {program} and make sure it is on PATH");
    }
    if cfg!(target_os = "macos") {
        "brew install ffmpeg".to_string()
    } else {
        "http://www.ffmpeg.org/download.html".to_string()
    }
}
