//! camlapse Encoder
//!
//! Hands the assembled motion-JPEG stream to an external transcoder and
//! reports how the process exited.
//!
//! ```text
//! timelapse.mjpeg ──► ffmpeg -y -i timelapse.mjpeg timelapse.mp4 ──► exit status
//! ```

pub mod ffmpeg;

pub use ffmpeg::*;
