//! Domain DTOs for the provider API.
//!
//! # Design
//! These types mirror the mock provider's schema but are defined
//! independently. The contract tests catch any schema drift between the two
//! crates. Unknown JSON fields (the provider also sends `test`) are ignored.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A single animal record. On the wire the image key is called `image`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Animal {
    pub name: String,
    #[serde(rename = "image")]
    pub image_key: String,
}

impl Animal {
    pub fn new(name: impl Into<String>, image_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image_key: image_key.into(),
        }
    }
}

/// Body of a successful `provider.json` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceResponse {
    #[serde(
        default,
        with = "crate::date::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub valid_date: Option<OffsetDateTime>,
    pub animals: Vec<Animal>,
}

impl ServiceResponse {
    pub fn new(valid_date: Option<OffsetDateTime>, animals: Vec<Animal>) -> Self {
        Self { valid_date, animals }
    }

    /// The result a 404 maps to: no date, no animals.
    pub fn empty() -> Self {
        Self::default()
    }
}
