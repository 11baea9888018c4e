//! Product price as delivered by the catalog feed.
//!
//! Feeds send prices as JSON numbers, numeric strings, `null`, or garbage.
//! Anything that is not a number becomes an absent price rather than a
//! parse failure, so one bad record never breaks the whole product feed.

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize};

/// Text shown when a price is missing or zero.
pub const PRICE_UNAVAILABLE: &str = "No Disponible";

/// A product price in US dollars, possibly absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Price(Option<Decimal>);

impl Price {
    /// A price the feed did not provide.
    #[must_use]
    pub const fn absent() -> Self {
        Self(None)
    }

    /// The amount, if the feed provided one.
    #[must_use]
    pub const fn amount(&self) -> Option<Decimal> {
        self.0
    }

    /// Format for display, e.g. `USD $19.50` or `No Disponible`.
    ///
    /// Zero counts as unavailable: catalog entries use `0` for "ask for a quote".
    #[must_use]
    pub fn display(&self) -> String {
        match self.0 {
            Some(amount) if !amount.is_zero() => {
                let rounded =
                    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
                format!("USD ${rounded:.2}")
            }
            _ => PRICE_UNAVAILABLE.to_string(),
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let amount = match value {
            serde_json::Value::Number(number) => Decimal::from_str(&number.to_string())
                .or_else(|_| Decimal::from_scientific(&number.to_string()))
                .ok(),
            serde_json::Value::String(text) => Decimal::from_str(text.trim()).ok(),
            _ => None,
        };
        Ok(Self(amount))
    }
}
