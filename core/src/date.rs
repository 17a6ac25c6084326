//! Timestamp formatting for the `valid_date` query parameter and JSON field.
//!
//! The wire format is minute precision with a numeric offset, e.g.
//! `2017-02-01T20:23+11:00`. Parsing also accepts RFC 3339, since providers
//! commonly emit seconds and fractions.

use std::fmt::Write;

use time::format_description::well_known::Rfc3339;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

use crate::error::ApiError;

const MINUTE_PRECISION: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute][offset_hour sign:mandatory]:[offset_minute]"
);

/// Render `value` in the minute-precision wire format.
pub fn format(value: OffsetDateTime) -> Result<String, ApiError> {
    value
        .format(MINUTE_PRECISION)
        .map_err(|e| ApiError::InvalidDate(e.to_string()))
}

/// Render `value` and form-urlencode it for use as a query value.
pub fn encode(value: OffsetDateTime) -> Result<String, ApiError> {
    Ok(form_urlencode(&format(value)?))
}

/// Parse a wire timestamp, falling back to RFC 3339.
pub fn parse(raw: &str) -> Result<OffsetDateTime, ApiError> {
    OffsetDateTime::parse(raw, MINUTE_PRECISION)
        .or_else(|_| OffsetDateTime::parse(raw, &Rfc3339))
        .map_err(|e| ApiError::InvalidDate(format!("{raw}: {e}")))
}

/// `application/x-www-form-urlencoded` encoding: alphanumerics and `.-*_`
/// pass through, space becomes `+`, every other byte is `%XX`.
fn form_urlencode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() * 3);
    for byte in raw.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'.' | b'-' | b'*' | b'_' => {
                out.push(byte as char)
            }
            b' ' => out.push('+'),
            other => {
                let _ = write!(out, "%{other:02X}");
            }
        }
    }
    out
}

/// Serde adapter for an optional wire timestamp.
pub(crate) mod optional {
    use serde::{de::Error as _, ser::Error as _, Deserialize, Deserializer, Serializer};
    use time::OffsetDateTime;

    pub fn serialize<S>(value: &Option<OffsetDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(value) => {
                let raw = super::format(*value).map_err(S::Error::custom)?;
                serializer.serialize_some(&raw)
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| super::parse(&raw).map_err(D::Error::custom))
            .transpose()
    }
}
