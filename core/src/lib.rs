//! Synchronous client core for the animals provider.
//!
//! # Overview
//! Builds `HttpRequest` values and classifies `HttpResponse` values without
//! touching the network (host-does-IO pattern). On top of that sit a
//! `Repository` abstraction and a `Presenter` that maps the outcome of a
//! fetch onto one of four `ViewState`s.
//!
//! # Design
//! - `AnimalsClient` is stateless: it holds only `base_url`.
//! - The fetch is split into `build_fetch_animals` and
//!   `parse_fetch_animals`, so the I/O boundary is explicit. Hosts plug in
//!   the round-trip through the `Transport` trait.
//! - A 404 from the provider is an empty result, a 400 is
//!   `ApiError::BadRequest`.
//! - DTOs are defined independently from the mock-provider crate; the
//!   contract tests catch schema drift.

pub mod binder;
pub mod client;
pub mod date;
pub mod error;
pub mod http;
pub mod presenter;
pub mod repository;
pub mod types;
pub mod view_state;

pub use binder::Binder;
pub use client::AnimalsClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use presenter::{Clock, Presenter};
pub use repository::{FakeRepository, Repository, Service, Transport};
pub use types::{Animal, ServiceResponse};
pub use view_state::{MessageKey, View, ViewState};
