//! Camera timeline events ("cuepoints").
//!
//! The camera service marks motion, sound and enhanced-review moments on a
//! camera's timeline. Motion cuepoints may carry a category label from the
//! service's learned classifier (e.g. humans, cars).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use camlapse_common::clock::EpochSecs;

use crate::de;

/// Type tag the service uses for motion cuepoints.
pub const MOTION_TAG: &str = "me2";

/// Type tag the service uses for audio cuepoints.
pub const SOUND_TAG: &str = "au1";

/// What triggered an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Motion,
    Sound,
    Combined,
}

impl EventKind {
    /// Classify a raw cuepoint type tag.
    ///
    /// The tag is a comma-separated list; only whole entries are matched.
    /// Anything without the motion tag is treated as sound-only.
    pub fn from_type_tag(tag: &str) -> Self {
        let has = |wanted: &str| {
            tag.split(',')
                .map(str::trim)
                .any(|part| part.eq_ignore_ascii_case(wanted))
        };
        match (has(MOTION_TAG), has(SOUND_TAG)) {
            (true, true) => Self::Combined,
            (true, false) => Self::Motion,
            _ => Self::Sound,
        }
    }

    /// Motion and combined events can anchor a time-lapse clip.
    pub fn is_timelapse_eligible(self) -> bool {
        matches!(self, Self::Motion | Self::Combined)
    }
}

/// A single event on a camera's timeline. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Cuepoint identifier, used to request the event clip.
    pub id: String,

    /// Event time in epoch seconds.
    pub time: EpochSecs,

    /// What triggered the event.
    pub kind: EventKind,

    /// Classifier category, if the service assigned one.
    pub category: Option<String>,

    /// UUID of the camera the event belongs to.
    pub camera_ref: String,

    /// Vendor fields not otherwise modeled.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl Event {
    /// Build an event without vendor extras.
    pub fn new(
        id: impl Into<String>,
        time: EpochSecs,
        kind: EventKind,
        category: Option<String>,
        camera_ref: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            time,
            kind,
            category,
            camera_ref: camera_ref.into(),
            extra: Map::new(),
        }
    }

    /// Convenience constructor for a motion event.
    pub fn motion(id: impl Into<String>, time: EpochSecs, camera_ref: impl Into<String>) -> Self {
        Self::new(id, time, EventKind::Motion, None, camera_ref)
    }

    /// Attach a category label.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// A cuepoint record as returned by the event feed.
#[derive(Debug, Clone, Deserialize)]
pub struct CuepointRecord {
    #[serde(deserialize_with = "de::string_or_number")]
    pub id: String,

    #[serde(deserialize_with = "de::epoch_secs")]
    pub time: EpochSecs,

    #[serde(rename = "type", default, deserialize_with = "de::type_tag")]
    pub type_tag: String,

    #[serde(
        rename = "cuepoint_category_id",
        default,
        deserialize_with = "de::opt_string_or_number"
    )]
    pub category: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CuepointRecord {
    /// Bind the record to the camera it was fetched for.
    pub fn into_event(self, camera_ref: &str) -> Event {
        let mut extra = self.extra;
        extra.insert("type".to_string(), Value::String(self.type_tag.clone()));
        Event {
            id: self.id,
            time: self.time,
            kind: EventKind::from_type_tag(&self.type_tag),
            category: self.category,
            camera_ref: camera_ref.to_string(),
            extra,
        }
    }
}

/// Parse the event feed's JSON array for a camera.
pub fn parse_cuepoints(json: &str, camera_ref: &str) -> Result<Vec<Event>, serde_json::Error> {
    let records: Vec<CuepointRecord> = serde_json::from_str(json)?;
    Ok(records
        .into_iter()
        .map(|record| record.into_event(camera_ref))
        .collect())
}
