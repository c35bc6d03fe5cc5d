//! Dropcam endpoint URLs, query construction and response parsing.
//!
//! Everything here is pure so request shapes can be tested without a
//! network.

use serde::{Deserialize, Serialize};

use camlapse_camera_model::CameraList;
use camlapse_common::clock::EpochSecs;
use camlapse_common::error::{CamlapseError, CamlapseResult};

/// Account API host (login, camera listing).
pub const API_BASE: &str = "https://www.dropcam.com";

/// Nexus media host (images, clips, cuepoints).
pub const NEXUS_BASE: &str = "https://nexusapi.dropcam.com";

/// Query string pairs for one request.
pub type Query = Vec<(&'static str, String)>;

/// Full URLs of every endpoint the client talks to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropcamEndpoints {
    pub login: String,
    pub cameras: String,
    pub image: String,
    pub clip: String,
    pub events: String,
}

impl Default for DropcamEndpoints {
    fn default() -> Self {
        Self::with_bases(API_BASE, NEXUS_BASE)
    }
}

impl DropcamEndpoints {
    /// Endpoints rooted at custom hosts (e.g. a local test server).
    pub fn with_bases(api_base: &str, nexus_base: &str) -> Self {
        let api = api_base.trim_end_matches('/');
        let nexus = nexus_base.trim_end_matches('/');
        Self {
            login: format!("{api}/api/login.login"),
            cameras: format!("{api}/api/v1/cameras.get_visible"),
            image: format!("{nexus}/get_image"),
            clip: format!("{nexus}/get_event_clip"),
            events: format!("{nexus}/get_cuepoint"),
        }
    }
}

pub fn cameras_query() -> Query {
    vec![("group_cameras", "true".to_string())]
}

/// Cuepoints for a camera, optionally bounded.
pub fn events_query(camera: &str, start: Option<EpochSecs>, end: Option<EpochSecs>) -> Query {
    let mut query = vec![("uuid", camera.to_string())];
    if let Some(start) = start {
        query.push(("start_time", start.to_string()));
    }
    if let Some(end) = end {
        query.push(("end_time", end.to_string()));
    }
    query.push(("human", "false".to_string()));
    query
}

/// A still frame; without `time` the service returns the live image.
pub fn image_query(camera: &str, time: Option<EpochSecs>, width: u32) -> Query {
    let mut query = vec![("uuid", camera.to_string()), ("width", width.to_string())];
    if let Some(time) = time {
        query.push(("time", time.to_string()));
    }
    query
}

/// A batch of JPEG frames spread over an event.
pub fn clip_query(camera: &str, event_id: &str, frame_count: u32, width: u32) -> Query {
    vec![
        ("uuid", camera.to_string()),
        ("width", width.to_string()),
        ("cuepoint_id", event_id.to_string()),
        ("num_frames", frame_count.to_string()),
        ("weigh_frames", "true".to_string()),
        ("format", "JPEG".to_string()),
    ]
}

#[derive(Debug, Deserialize)]
struct CamerasEnvelope {
    status: i64,

    #[serde(default)]
    status_description: Option<String>,

    #[serde(default)]
    items: Vec<CameraList>,
}

/// Parse the camera listing envelope `{status, items: [{owned, subscribed}]}`.
pub fn parse_camera_list(body: &str) -> CamlapseResult<CameraList> {
    let envelope: CamerasEnvelope = serde_json::from_str(body)?;
    if envelope.status != 0 {
        return Err(CamlapseError::service(format!(
            "camera listing returned status {}{}",
            envelope.status,
            envelope
                .status_description
                .map(|d| format!(": {d}"))
                .unwrap_or_default()
        )));
    }
    envelope
        .items
        .into_iter()
        .next()
        .ok_or_else(|| CamlapseError::service("camera listing returned no items"))
}
