//! Market metadata.

use serde::{Deserialize, Serialize};

/// Market descriptor as supplied by the metadata source.
///
/// `decimal_places` is signed so that a misconfigured negative precision
/// can be loaded and treated as zero instead of failing the whole load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Market {
    /// Market identifier, as referenced by [`crate::Trade::market_id`].
    pub id: String,

    /// Human-readable market name.
    #[serde(default)]
    pub name: Option<String>,

    /// Scaling exponent between raw tick prices and decimal prices.
    #[serde(default, alias = "decimalPlaces")]
    pub decimal_places: i64,
}

impl Market {
    /// Create a market with the given precision.
    pub fn new(id: impl Into<String>, decimal_places: i64) -> Self {
        Self {
            id: id.into(),
            name: None,
            decimal_places,
        }
    }
}
