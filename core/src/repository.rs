//! Data sources for the presenter.
//!
//! `Service` is the real repository: it builds the request with
//! `AnimalsClient`, hands it to a host-supplied `Transport`, and classifies
//! the response. `FakeRepository` answers from memory.

use std::sync::Mutex;

use time::OffsetDateTime;

use crate::client::AnimalsClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::ServiceResponse;

/// Executes an `HttpRequest` on behalf of the core.
///
/// Implementations must return non-2xx responses as data, not as `Err`;
/// `Err` is reserved for failures to complete the round-trip at all.
pub trait Transport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Something that can produce a `ServiceResponse` for a given date.
pub trait Repository: Send + Sync {
    fn fetch_response(&self, valid_date: Option<OffsetDateTime>)
        -> Result<ServiceResponse, ApiError>;
}

/// Repository backed by the provider over HTTP.
#[derive(Debug)]
pub struct Service<T> {
    client: AnimalsClient,
    transport: T,
}

impl<T: Transport> Service<T> {
    pub fn new(client: AnimalsClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &AnimalsClient {
        &self.client
    }
}

impl<T: Transport> Repository for Service<T> {
    fn fetch_response(
        &self,
        valid_date: Option<OffsetDateTime>,
    ) -> Result<ServiceResponse, ApiError> {
        let request = self.client.build_fetch_animals(valid_date)?;
        let response = self.transport.execute(request)?;
        self.client.parse_fetch_animals(response)
    }
}

/// In-memory repository. Returns the same outcome on every call and records
/// the dates it was asked for.
#[derive(Debug)]
pub struct FakeRepository {
    outcome: Result<ServiceResponse, ApiError>,
    requests: Mutex<Vec<Option<OffsetDateTime>>>,
}

impl FakeRepository {
    /// A fake with no animals.
    pub fn new() -> Self {
        Self::with_response(ServiceResponse::empty())
    }

    pub fn with_response(response: ServiceResponse) -> Self {
        Self {
            outcome: Ok(response),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: ApiError) -> Self {
        Self {
            outcome: Err(error),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Dates passed to `fetch_response`, oldest first.
    pub fn requests(&self) -> Vec<Option<OffsetDateTime>> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

impl Default for FakeRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for FakeRepository {
    fn fetch_response(
        &self,
        valid_date: Option<OffsetDateTime>,
    ) -> Result<ServiceResponse, ApiError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(valid_date);
        }
        self.outcome.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use crate::types::Animal;
    use time::macros::datetime;

    /// Answers every request with a canned response and remembers the last path.
    struct CannedTransport {
        response: Result<HttpResponse, ApiError>,
        last_path: Mutex<Option<String>>,
    }

    impl CannedTransport {
        fn new(response: Result<HttpResponse, ApiError>) -> Self {
            Self {
                response,
                last_path: Mutex::new(None),
            }
        }
    }

    impl Transport for CannedTransport {
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            assert_eq!(request.method, HttpMethod::Get);
            *self.last_path.lock().unwrap() = Some(request.path);
            self.response.clone()
        }
    }

    fn service(response: Result<HttpResponse, ApiError>) -> Service<CannedTransport> {
        Service::new(
            AnimalsClient::new("http://provider"),
            CannedTransport::new(response),
        )
    }

    #[test]
    fn service_decodes_success() {
        let service = service(Ok(HttpResponse::new(
            200,
            r#"{"test":"NO","valid_date":"2017-02-01T12:23+11:00","animals":[{"name":"Doggy","image":"dog"}]}"#,
        )));
        let response = service
            .fetch_response(Some(datetime!(2017-02-01 12:23 +11:00)))
            .unwrap();
        assert_eq!(
            response,
            ServiceResponse::new(
                Some(datetime!(2017-02-01 12:23 +11:00)),
                vec![Animal::new("Doggy", "dog")]
            )
        );
        assert_eq!(
            service.transport.last_path.lock().unwrap().as_deref(),
            Some("http://provider/provider.json?valid_date=2017-02-01T12%3A23%2B11%3A00")
        );
    }

    #[test]
    fn service_maps_not_found_to_empty() {
        let service = service(Ok(HttpResponse::new(404, "")));
        assert_eq!(service.fetch_response(None).unwrap(), ServiceResponse::empty());
    }

    #[test]
    fn service_propagates_bad_request() {
        let service = service(Ok(HttpResponse::new(400, "valid_date is required")));
        let err = service.fetch_response(None).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest { .. }));
    }

    #[test]
    fn service_propagates_transport_failure() {
        let service = service(Err(ApiError::Transport("connection refused".to_string())));
        let err = service.fetch_response(None).unwrap_err();
        assert_eq!(err, ApiError::Transport("connection refused".to_string()));
    }

    #[test]
    fn fake_repository_defaults_to_empty() {
        let fake = FakeRepository::default();
        assert_eq!(fake.fetch_response(None).unwrap(), ServiceResponse::empty());
    }

    #[test]
    fn fake_repository_records_requests() {
        let fake = FakeRepository::failing(ApiError::Http {
            status: 503,
            body: String::new(),
        });
        let when = datetime!(2021-01-01 00:00 UTC);
        assert!(fake.fetch_response(Some(when)).is_err());
        assert!(fake.fetch_response(None).is_err());
        assert_eq!(fake.requests(), vec![Some(when), None]);
    }
}
