//! Catalog feed envelopes.
//!
//! Each feed answers with `{ "response": [...] }`. A feed only counts as
//! delivered when `response` is truthy in the JavaScript sense the catalog
//! backend was written against: `null`, `false`, `0`, `""` and a missing key
//! all mean "no data", while any array (even an empty one) is data.

use std::fmt;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::CatalogError;

/// The three catalog feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feed {
    Categories,
    Products,
    Brands,
}

impl Feed {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Categories => "categories",
            Self::Products => "products",
            Self::Brands => "brands",
        }
    }
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    response: Option<Value>,
}

/// Decode a feed body into its records.
///
/// # Errors
///
/// - `CatalogError::Parse` if the body is not a JSON object or the payload
///   does not match the record type
/// - `CatalogError::MissingPayload` if `response` is absent or falsy
pub fn decode<T: DeserializeOwned>(feed: Feed, body: &str) -> Result<Vec<T>, CatalogError> {
    let envelope: Envelope =
        serde_json::from_str(body).map_err(|source| CatalogError::Parse { feed, source })?;

    let payload = envelope
        .response
        .filter(is_truthy)
        .ok_or(CatalogError::MissingPayload(feed))?;

    serde_json::from_value(payload).map_err(|source| CatalogError::Parse { feed, source })
}

/// JavaScript truthiness of a JSON value.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
