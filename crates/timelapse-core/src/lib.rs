//! camlapse Time-lapse Core
//!
//! Turns a camera's event feed into a time-lapse stream.
//!
//! # Pipeline Architecture
//!
//! ```text
//! event feed ──► filter ──► eligible events ──┐
//!                                             ├── scheduler ──► timeline
//! [start, end) ──► sample instants ───────────┘                    │
//!                                                                  ▼
//!                                         fetcher (CameraService) ──► fetch results
//!                                                                  │
//!                                                                  ▼
//!                                         assembler ──► <filename>.mjpeg
//!                                                                  │
//!                                                                  ▼
//!                                         encoder ──► <filename>.mp4
//! ```

pub mod assembler;
pub mod fetcher;
pub mod filter;
pub mod job;
pub mod scheduler;
pub mod service;

pub use assembler::*;
pub use fetcher::*;
pub use filter::*;
pub use job::*;
pub use scheduler::*;
pub use service::*;
