//! Error types shared across camlapse crates.

/// Top-level error type for camlapse operations.
#[derive(Debug, thiserror::Error)]
pub enum CamlapseError {
    #[error("Error generating time-lapse: no events available")]
    NoEligibleEvents,

    #[error("{encoder} is not installed! Install it: {hint}")]
    EncoderMissing { encoder: String, hint: String },

    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },

    #[error("Authentication error: {message}")]
    Auth { message: String },

    #[error("Camera service error: {message}")]
    Service { message: String },

    #[error("Camera not found: {reference}")]
    CameraNotFound { reference: String },

    #[error("Encode error: {message}")]
    Encode { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using CamlapseError.
pub type CamlapseResult<T> = Result<T, CamlapseError>;

impl CamlapseError {
    pub fn encoder_missing(encoder: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::EncoderMissing {
            encoder: encoder.into(),
            hint: hint.into(),
        }
    }

    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: msg.into(),
        }
    }

    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth {
            message: msg.into(),
        }
    }

    pub fn service(msg: impl Into<String>) -> Self {
        Self::Service {
            message: msg.into(),
        }
    }

    pub fn camera_not_found(reference: impl Into<String>) -> Self {
        Self::CameraNotFound {
            reference: reference.into(),
        }
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}
