//! camlapse Common Utilities
//!
//! Shared infrastructure for all camlapse crates:
//! - Error types and result aliases
//! - Epoch-seconds time helpers
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
