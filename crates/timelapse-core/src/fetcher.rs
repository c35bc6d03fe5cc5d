//! Media fetching.
//!
//! Resolves each directive to bytes through the camera service. Failures
//! are local: a missing or failed fetch is logged and reported as a
//! not-ok [`FetchResult`], and the remaining directives are still fetched.

use futures::stream::{self, BoxStream, StreamExt};

use camlapse_camera_model::{Directive, FetchResult, Session, Timeline};

use crate::service::CameraService;

/// Resolves directives for one camera and session.
pub struct MediaFetcher<'a, S: CameraService + ?Sized> {
    service: &'a S,
    session: &'a Session,
    camera: String,
    width: u32,
    concurrency: usize,
}

impl<'a, S: CameraService + ?Sized> MediaFetcher<'a, S> {
    pub fn new(service: &'a S, session: &'a Session, camera: impl Into<String>, width: u32) -> Self {
        Self {
            service,
            session,
            camera: camera.into(),
            width,
            concurrency: 1,
        }
    }

    /// Keep up to `concurrency` requests in flight. Results stay in order.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Fetch the media for a single directive.
    pub async fn fetch(&self, directive: Directive) -> FetchResult {
        let response = match &directive {
            Directive::StillFrame { time } => {
                self.service
                    .fetch_image(self.session, &self.camera, Some(*time), self.width)
                    .await
            }
            Directive::EventClip { event, frame_count } => {
                self.service
                    .fetch_clip(
                        self.session,
                        &self.camera,
                        &event.id,
                        *frame_count,
                        self.width,
                    )
                    .await
            }
        };

        match response {
            Ok(Some(bytes)) if !bytes.is_empty() => {
                tracing::debug!(directive = %directive, bytes = bytes.len(), "Fetched media");
                FetchResult::fetched(directive, bytes)
            }
            Ok(_) => {
                tracing::warn!(directive = %directive, "Skipping {directive}: no media available");
                FetchResult::missing(directive)
            }
            Err(err) => {
                tracing::warn!(
                    directive = %directive,
                    error = %err,
                    "Skipping {directive}: fetch failed"
                );
                FetchResult::missing(directive)
            }
        }
    }

    /// Fetch every directive, yielding results in timeline order.
    pub fn fetch_stream(&self, timeline: Timeline) -> BoxStream<'_, FetchResult> {
        stream::iter(timeline)
            .map(move |directive| self.fetch(directive))
            .buffered(self.concurrency)
            .boxed()
    }

    /// Fetch every directive and collect the results.
    pub async fn fetch_all(&self, timeline: Timeline) -> Vec<FetchResult> {
        self.fetch_stream(timeline).collect().await
    }
}
