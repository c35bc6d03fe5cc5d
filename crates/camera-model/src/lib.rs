//! camlapse Camera Model
//!
//! Defines the data contracts shared by the time-lapse pipeline:
//! - **Cameras:** Owned and subscribed camera records
//! - **Events:** Motion/sound cuepoints on a camera's timeline
//! - **Directives:** Scheduled still-frame and event-clip acquisitions
//! - **Session:** The authenticated cookie set threaded through service calls
//! - **Params:** Per-invocation time-lapse parameters
//!
//! All timestamps are fractional seconds since the Unix epoch.

mod de;

pub mod camera;
pub mod directive;
pub mod event;
pub mod params;
pub mod session;

pub use camera::*;
pub use directive::*;
pub use event::*;
pub use params::*;
pub use session::*;
