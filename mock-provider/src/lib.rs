//! In-memory provider for the animals contract.
//!
//! Serves `GET /provider.json` and lets tests switch between named provider
//! states through `POST /provider-states`.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::OffsetDateTime;
use tokio::{net::TcpListener, sync::RwLock};

/// Provider state with the default three animals.
pub const STATE_WITH_DATA: &str = "data count is > 0";
/// Provider state with no animals; `provider.json` answers 404.
pub const STATE_NO_DATA: &str = "data count is == 0";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animal {
    pub name: String,
    pub image: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProviderResponse {
    pub test: String,
    pub valid_date: String,
    pub animals: Vec<Animal>,
}

#[derive(Deserialize)]
pub struct ProviderQuery {
    pub valid_date: Option<String>,
}

#[derive(Deserialize)]
pub struct ProviderStateRequest {
    pub state: String,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("valid_date is required")]
    MissingValidDate,

    #[error("valid_date is invalid")]
    InvalidValidDate,

    #[error("no animals available")]
    NoAnimals,

    #[error("unknown provider state: {0}")]
    UnknownState(String),

    #[error("could not format timestamp: {0}")]
    Clock(#[from] time::error::Format),
}

impl IntoResponse for ProviderError {
    fn into_response(self) -> Response {
        match self {
            ProviderError::NoAnimals => StatusCode::NOT_FOUND.into_response(),
            ProviderError::MissingValidDate
            | ProviderError::InvalidValidDate
            | ProviderError::UnknownState(_) => {
                (StatusCode::BAD_REQUEST, Json(self.to_string())).into_response()
            }
            ProviderError::Clock(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(self.to_string())).into_response()
            }
        }
    }
}

pub type Db = Arc<RwLock<Vec<Animal>>>;

pub fn default_animals() -> Vec<Animal> {
    [("Buddy", "dog"), ("Cathy", "cat"), ("Birdy", "bird")]
        .into_iter()
        .map(|(name, image)| Animal {
            name: name.to_string(),
            image: image.to_string(),
        })
        .collect()
}

/// Router in the `data count is > 0` state.
pub fn app() -> Router {
    app_with_animals(default_animals())
}

pub fn app_with_animals(animals: Vec<Animal>) -> Router {
    let db: Db = Arc::new(RwLock::new(animals));
    Router::new()
        .route("/provider.json", get(provider_json))
        .route("/provider-states", post(set_provider_state))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "mock provider serving");
    }
    axum::serve(listener, app()).await
}

/// Accepts the consumer's minute-precision format as well as RFC 3339.
fn parse_valid_date(raw: &str) -> Result<OffsetDateTime, ProviderError> {
    // Keep in sync with `MINUTE_PRECISION` in animals-core's date module.
    let minute_precision = format_description!(
        "[year]-[month]-[day]T[hour]:[minute][offset_hour sign:mandatory]:[offset_minute]"
    );
    OffsetDateTime::parse(raw, minute_precision)
        .or_else(|_| OffsetDateTime::parse(raw, &Rfc3339))
        .map_err(|_| ProviderError::InvalidValidDate)
}

async fn provider_json(
    State(db): State<Db>,
    Query(query): Query<ProviderQuery>,
) -> Result<Json<ProviderResponse>, ProviderError> {
    let raw = query.valid_date.ok_or(ProviderError::MissingValidDate)?;
    let valid_date = parse_valid_date(&raw)?;
    tracing::debug!(%valid_date, "provider.json requested");

    let animals = db.read().await.clone();
    if animals.is_empty() {
        return Err(ProviderError::NoAnimals);
    }

    Ok(Json(ProviderResponse {
        test: "NO".to_string(),
        valid_date: OffsetDateTime::now_utc().format(&Rfc3339)?,
        animals,
    }))
}

async fn set_provider_state(
    State(db): State<Db>,
    Json(input): Json<ProviderStateRequest>,
) -> Result<StatusCode, ProviderError> {
    let animals = match input.state.as_str() {
        STATE_WITH_DATA => default_animals(),
        STATE_NO_DATA => Vec::new(),
        _ => return Err(ProviderError::UnknownState(input.state)),
    };
    tracing::info!(state = %input.state, "provider state set");
    *db.write().await = animals;
    Ok(StatusCode::NO_CONTENT)
}
