//! The camera service the pipeline consumes.

use camlapse_camera_model::{CameraList, Event, Session};
use camlapse_common::clock::EpochSecs;
use camlapse_common::error::CamlapseResult;

/// Data-access contract for a cloud camera service.
///
/// Every call receives the session explicitly. Media calls return
/// `Ok(None)` when the service has nothing for the request.
#[async_trait::async_trait]
pub trait CameraService: Send + Sync {
    /// Cameras visible to the session's account.
    async fn list_cameras(&self, session: &Session) -> CamlapseResult<CameraList>;

    /// Raw events for a camera, optionally bounded in time.
    async fn list_events(
        &self,
        session: &Session,
        camera: &str,
        start_time: Option<EpochSecs>,
        end_time: Option<EpochSecs>,
    ) -> CamlapseResult<Vec<Event>>;

    /// A single image, the latest one when `time` is absent.
    async fn fetch_image(
        &self,
        session: &Session,
        camera: &str,
        time: Option<EpochSecs>,
        width: u32,
    ) -> CamlapseResult<Option<Vec<u8>>>;

    /// A JPEG clip anchored at an event.
    async fn fetch_clip(
        &self,
        session: &Session,
        camera: &str,
        event_id: &str,
        frame_count: u32,
        width: u32,
    ) -> CamlapseResult<Option<Vec<u8>>>;
}
