pub mod cameras;
pub mod check;
pub mod events;
pub mod login;
pub mod snapshot;
pub mod timelapse;

use std::path::PathBuf;

use camlapse_camera_model::{Camera, Session};
use camlapse_common::config::AppConfig;
use camlapse_common::error::CamlapseError;
use camlapse_dropcam::{DropcamClient, SessionProvider};
use camlapse_timelapse_core::CameraService;

/// State shared by every command.
pub struct Context {
    pub config: AppConfig,
    pub config_path: PathBuf,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Context {
    pub fn session_provider(&self) -> SessionProvider {
        SessionProvider::from_config(&self.config.session)
    }

    /// Cached session, or log in.
    pub async fn session(&self) -> anyhow::Result<Session> {
        let session = self
            .session_provider()
            .authenticate(self.username.as_deref(), self.password.as_deref())
            .await?;
        Ok(session)
    }

    pub fn client(&self) -> anyhow::Result<DropcamClient> {
        Ok(DropcamClient::new()?)
    }

    /// Resolve a camera by UUID or title.
    pub async fn camera(
        &self,
        client: &DropcamClient,
        session: &Session,
        reference: &str,
    ) -> anyhow::Result<Camera> {
        let cameras = client.list_cameras(session).await?;
        cameras
            .find(reference)
            .cloned()
            .ok_or_else(|| CamlapseError::camera_not_found(reference).into())
    }
}
