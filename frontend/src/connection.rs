//! Backend collaborators: fleet API and new-event feed
//!
//! The dashboard only depends on the [`FleetApi`] and [`EventFeed`] traits.
//! [`HttpFleetApi`] is the production transport; failures surface as
//! [`FetchError`] and are logged and swallowed by the callers.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use shared::{AlertRecord, TimelineEvent, VesselSnapshot};
use std::sync::Arc;
use thiserror::Error;

pub const TRACKED_VESSELS_PATH: &str = "/api/get-tracked-vessels";
pub const ALERTS_PATH: &str = "/api/alerts/";

/// Any failure to obtain data from a collaborator. Never fatal.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0}")]
    Unavailable(String),
}

#[async_trait]
pub trait FleetApi: Send + Sync {
    async fn fetch_tracked_vessels(&self) -> Result<Vec<VesselSnapshot>, FetchError>;
    async fn fetch_alerts(&self) -> Result<Vec<AlertRecord>, FetchError>;
}

/// Source of candidate timeline events, polled on a fixed cadence.
#[async_trait]
pub trait EventFeed: Send + Sync {
    async fn fetch_new_event(&self) -> Result<Option<TimelineEvent>, FetchError>;
}

pub struct HttpFleetApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFleetApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = self.endpoint(path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|source| FetchError::Request {
            url: url.clone(),
            source,
        })?;
        serde_json::from_slice(&body).map_err(|source| FetchError::Decode { url, source })
    }
}

#[async_trait]
impl FleetApi for HttpFleetApi {
    async fn fetch_tracked_vessels(&self) -> Result<Vec<VesselSnapshot>, FetchError> {
        self.get_json(TRACKED_VESSELS_PATH).await
    }

    async fn fetch_alerts(&self) -> Result<Vec<AlertRecord>, FetchError> {
        self.get_json(ALERTS_PATH).await
    }
}

/// Event feed that surfaces the newest alert of the fleet API as an event.
pub struct AlertEventFeed {
    api: Arc<dyn FleetApi>,
}

impl AlertEventFeed {
    pub fn new(api: Arc<dyn FleetApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl EventFeed for AlertEventFeed {
    async fn fetch_new_event(&self) -> Result<Option<TimelineEvent>, FetchError> {
        let alerts = self.api.fetch_alerts().await?;
        Ok(alerts.last().map(TimelineEvent::from))
    }
}
