//! Camera records visible to an account.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::de;

/// A camera the authenticated account can see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Camera UUID, the key for every media request.
    pub uuid: String,

    /// Human-readable camera title.
    #[serde(default)]
    pub title: String,

    /// Numeric account-level identifier, when reported.
    #[serde(default, deserialize_with = "de::opt_string_or_number")]
    pub id: Option<String>,

    /// Vendor fields not otherwise modeled.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Camera {
    pub fn new(uuid: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            title: title.into(),
            id: None,
            extra: Map::new(),
        }
    }
}

impl std::fmt::Display for Camera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Camera '{}'", self.title)
    }
}

/// Cameras grouped by ownership.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraList {
    #[serde(default)]
    pub owned: Vec<Camera>,

    #[serde(default)]
    pub subscribed: Vec<Camera>,
}

impl CameraList {
    /// Owned cameras first, then subscribed ones.
    pub fn all(&self) -> impl Iterator<Item = &Camera> {
        self.owned.iter().chain(self.subscribed.iter())
    }

    pub fn len(&self) -> usize {
        self.owned.len() + self.subscribed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve a camera by exact UUID, then by case-insensitive title.
    pub fn find(&self, reference: &str) -> Option<&Camera> {
        self.all()
            .find(|camera| camera.uuid == reference)
            .or_else(|| {
                self.all()
                    .find(|camera| camera.title.eq_ignore_ascii_case(reference))
            })
    }
}
