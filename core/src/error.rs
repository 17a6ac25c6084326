//! Error types for the animals client.
//!
//! # Design
//! `BadRequest` gets a dedicated variant because the provider answers 400
//! when the request itself is wrong (e.g. a missing `valid_date`), and
//! callers need to tell that apart from an unexpected status. A 404 is not
//! an error at all: the client maps it to an empty result. All other non-2xx
//! responses land in `Http` with the raw status code and body.

use thiserror::Error;

/// Errors returned by `AnimalsClient` and `Repository` implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The provider returned 400 for the request.
    #[error("bad request: {body}")]
    BadRequest { body: String },

    /// The provider returned a non-2xx status other than 400 or 404.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// A timestamp could not be formatted or parsed.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// The host could not complete the HTTP round-trip.
    #[error("transport failed: {0}")]
    Transport(String),
}
