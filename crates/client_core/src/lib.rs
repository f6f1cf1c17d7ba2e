use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use reqwest::{header::AUTHORIZATION, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Destination, OfferGroup, Point, PointId, UpdateType},
    error::{ApiError, ApiException},
    protocol::{NewPointRecord, PointRecord},
};
use tracing::debug;
use url::Url;

pub mod catalog;
pub mod filter_store;
pub mod observable;
pub mod point_store;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod trip_info;

pub use catalog::{CitiesStore, OffersStore};
pub use filter_store::FilterStore;
pub use observable::{Observable, SubscriptionId};
pub use point_store::{PointStore, StoreError};
pub use trip_info::TripInfo;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Notification published by the point and filter stores.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreEvent {
    pub update: UpdateType,
    pub point: Option<Point>,
}

impl StoreEvent {
    pub fn new(update: UpdateType) -> Self {
        Self {
            update,
            point: None,
        }
    }

    pub fn with_point(update: UpdateType, point: Point) -> Self {
        Self {
            update,
            point: Some(point),
        }
    }
}

/// Remote trip service. Mutating calls answer with the server's canonical
/// representation of the affected point.
#[async_trait(?Send)]
pub trait TripService {
    async fn list_points(&self) -> Result<Vec<PointRecord>>;
    async fn list_destinations(&self) -> Result<Vec<Destination>>;
    async fn list_offers(&self) -> Result<Vec<OfferGroup>>;
    async fn create_point(&self, point: &NewPointRecord) -> Result<PointRecord>;
    async fn update_point(&self, point: &PointRecord) -> Result<PointRecord>;
    async fn delete_point(&self, id: &PointId) -> Result<()>;
}

pub struct RestTripService {
    http: Client,
    server_url: String,
    authorization: String,
}

impl RestTripService {
    pub fn new(server_url: &str, authorization: impl Into<String>) -> Result<Self> {
        Self::with_timeout(server_url, authorization, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(
        server_url: &str,
        authorization: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let server_url = normalize_server_url(server_url)?;
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build http client")?;
        Ok(Self {
            http,
            server_url,
            authorization: authorization.into(),
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.server_url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(AUTHORIZATION, &self.authorization)
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> Result<T> {
        let response = self
            .authorized(request)
            .send()
            .await
            .with_context(|| format!("failed to reach trip service for {what}"))?;
        let response = check_status(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("malformed trip service response for {what}"))
    }
}

#[async_trait(?Send)]
impl TripService for RestTripService {
    async fn list_points(&self) -> Result<Vec<PointRecord>> {
        debug!("listing points");
        self.fetch(self.http.get(self.endpoint("points")), "points")
            .await
    }

    async fn list_destinations(&self) -> Result<Vec<Destination>> {
        debug!("listing destinations");
        self.fetch(self.http.get(self.endpoint("destinations")), "destinations")
            .await
    }

    async fn list_offers(&self) -> Result<Vec<OfferGroup>> {
        debug!("listing offers");
        self.fetch(self.http.get(self.endpoint("offers")), "offers")
            .await
    }

    async fn create_point(&self, point: &NewPointRecord) -> Result<PointRecord> {
        debug!(kind = point.kind.as_str(), "creating point");
        self.fetch(
            self.http.post(self.endpoint("points")).json(point),
            "point creation",
        )
        .await
    }

    async fn update_point(&self, point: &PointRecord) -> Result<PointRecord> {
        debug!(point_id = %point.id, "updating point");
        self.fetch(
            self.http
                .put(self.endpoint(&format!("points/{}", point.id)))
                .json(point),
            "point update",
        )
        .await
    }

    async fn delete_point(&self, id: &PointId) -> Result<()> {
        debug!(point_id = %id, "deleting point");
        let response = self
            .authorized(self.http.delete(self.endpoint(&format!("points/{id}"))))
            .send()
            .await
            .context("failed to reach trip service for point deletion")?;
        check_status(response).await?;
        Ok(())
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ApiError>(&body) {
        Ok(api_error) => Err(ApiException::from(api_error).into()),
        Err(_) => Err(anyhow!("trip service responded with {status}")),
    }
}

pub fn normalize_server_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        bail!("trip service url must not be empty");
    }

    let parsed = Url::parse(trimmed).with_context(|| format!("invalid trip service url '{trimmed}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!(
            "trip service url '{trimmed}' must use http or https, got '{}'",
            parsed.scheme()
        );
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
