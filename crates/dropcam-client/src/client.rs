//! HTTP implementation of the camera service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, ClientBuilder, Response, StatusCode};

use camlapse_camera_model::{parse_cuepoints, CameraList, Event, Session};
use camlapse_common::clock::EpochSecs;
use camlapse_common::error::{CamlapseError, CamlapseResult};
use camlapse_timelapse_core::CameraService;

use crate::endpoints::{
    cameras_query, clip_query, events_query, image_query, parse_camera_list, DropcamEndpoints,
    Query,
};

const USER_AGENT: &str = concat!("camlapse/", env!("CARGO_PKG_VERSION"));

pub(crate) fn client_builder() -> ClientBuilder {
    Client::builder()
        .user_agent(USER_AGENT)
        .use_rustls_tls()
        .gzip(true)
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(30))
}

/// Build the shared HTTP client.
pub(crate) fn http_client() -> CamlapseResult<Client> {
    client_builder().build().map_err(http_error)
}

pub(crate) fn http_error(err: reqwest::Error) -> CamlapseError {
    CamlapseError::service(format!("HTTP request failed: {err}"))
}

/// Talks to the Dropcam account and Nexus APIs.
#[derive(Debug, Clone)]
pub struct DropcamClient {
    http: Client,
    endpoints: DropcamEndpoints,
}

impl DropcamClient {
    pub fn new() -> CamlapseResult<Self> {
        Self::with_endpoints(DropcamEndpoints::default())
    }

    pub fn with_endpoints(endpoints: DropcamEndpoints) -> CamlapseResult<Self> {
        Ok(Self {
            http: http_client()?,
            endpoints,
        })
    }

    pub fn endpoints(&self) -> &DropcamEndpoints {
        &self.endpoints
    }

    async fn get(&self, session: &Session, url: &str, query: &Query) -> CamlapseResult<Response> {
        let mut request = self.http.get(url).query(query);
        if !session.is_empty() {
            request = request.header(header::COOKIE, session.cookie_header());
        }
        tracing::trace!(url, ?query, "GET");
        request.send().await.map_err(http_error)
    }

    /// Metadata requests: any non-2xx is an error.
    async fn get_text(&self, session: &Session, url: &str, query: &Query) -> CamlapseResult<String> {
        let response = self.get(session, url, query).await?;
        let status = response.status();
        let body = response.text().await.map_err(http_error)?;
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(CamlapseError::auth(format!(
                "session rejected ({status}); run `camlapse login` again"
            )));
        }
        if !status.is_success() {
            return Err(CamlapseError::service(format!(
                "Request failed: {status}: {}",
                body.trim()
            )));
        }
        Ok(body)
    }

    /// Media requests: a non-2xx answer means "no media here".
    async fn get_data(
        &self,
        session: &Session,
        url: &str,
        query: &Query,
    ) -> CamlapseResult<Option<Vec<u8>>> {
        let response = self.get(session, url, query).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(url, %status, "Request failed: {}", body.trim());
            return Ok(None);
        }
        let bytes = response.bytes().await.map_err(http_error)?;
        Ok(Some(bytes.to_vec()))
    }
}

#[async_trait]
impl CameraService for DropcamClient {
    async fn list_cameras(&self, session: &Session) -> CamlapseResult<CameraList> {
        let body = self
            .get_text(session, &self.endpoints.cameras, &cameras_query())
            .await?;
        let cameras = parse_camera_list(&body)?;
        tracing::debug!(
            owned = cameras.owned.len(),
            subscribed = cameras.subscribed.len(),
            "Listed cameras"
        );
        Ok(cameras)
    }

    async fn list_events(
        &self,
        session: &Session,
        camera: &str,
        start: Option<EpochSecs>,
        end: Option<EpochSecs>,
    ) -> CamlapseResult<Vec<Event>> {
        let body = self
            .get_text(
                session,
                &self.endpoints.events,
                &events_query(camera, start, end),
            )
            .await?;
        let events = parse_cuepoints(&body, camera)?;
        tracing::debug!(camera, count = events.len(), "Listed events");
        Ok(events)
    }

    async fn fetch_image(
        &self,
        session: &Session,
        camera: &str,
        time: Option<EpochSecs>,
        width: u32,
    ) -> CamlapseResult<Option<Vec<u8>>> {
        self.get_data(
            session,
            &self.endpoints.image,
            &image_query(camera, time, width),
        )
        .await
    }

    async fn fetch_clip(
        &self,
        session: &Session,
        camera: &str,
        event_id: &str,
        frame_count: u32,
        width: u32,
    ) -> CamlapseResult<Option<Vec<u8>>> {
        self.get_data(
            session,
            &self.endpoints.clip,
            &clip_query(camera, event_id, frame_count, width),
        )
        .await
    }
}
