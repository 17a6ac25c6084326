//! Stateless HTTP request builder and response classifier for the provider.
//!
//! # Design
//! `AnimalsClient` holds only a `base_url` and carries no mutable state
//! between calls. The single operation is split into
//! `build_fetch_animals`, which produces an `HttpRequest`, and
//! `parse_fetch_animals`, which consumes an `HttpResponse`. The caller
//! executes the actual HTTP round-trip, keeping the core deterministic and
//! free of I/O dependencies.

use time::OffsetDateTime;

use crate::date;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::ServiceResponse;

const PROVIDER_PATH: &str = "provider.json";

/// Synchronous, stateless client for the provider API.
#[derive(Debug, Clone)]
pub struct AnimalsClient {
    base_url: String,
}

impl AnimalsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the `GET provider.json` request. Without a `valid_date` the
    /// query string is omitted entirely.
    pub fn build_fetch_animals(
        &self,
        valid_date: Option<OffsetDateTime>,
    ) -> Result<HttpRequest, ApiError> {
        let mut path = format!("{}/{PROVIDER_PATH}", self.base_url);
        if let Some(valid_date) = valid_date {
            path.push_str("?valid_date=");
            path.push_str(&date::encode(valid_date)?);
        }
        tracing::debug!(%path, "built fetch animals request");
        Ok(HttpRequest {
            method: HttpMethod::Get,
            path,
            headers: vec![("accept".to_string(), "application/json".to_string())],
        })
    }

    /// Classify a `provider.json` response.
    ///
    /// 404 is not an error: it means the provider has no animals and maps
    /// to `ServiceResponse::empty()`.
    pub fn parse_fetch_animals(&self, response: HttpResponse) -> Result<ServiceResponse, ApiError> {
        tracing::debug!(status = response.status, "parsing fetch animals response");
        match response.status {
            200..=299 => serde_json::from_str(&response.body)
                .map_err(|e| ApiError::Deserialization(e.to_string())),
            404 => Ok(ServiceResponse::empty()),
            400 => Err(ApiError::BadRequest {
                body: response.body,
            }),
            status => Err(ApiError::Http {
                status,
                body: response.body,
            }),
        }
    }
}
