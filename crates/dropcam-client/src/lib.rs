//! Dropcam integration for camlapse.
//!
//! - [`SessionProvider`]: login, credential prompt and the cookie cache
//! - [`DropcamClient`]: [`CameraService`](camlapse_timelapse_core::CameraService)
//!   over the account and Nexus HTTP APIs

pub mod client;
pub mod endpoints;
pub mod session;

pub use client::DropcamClient;
pub use endpoints::DropcamEndpoints;
pub use session::SessionProvider;
