//! Trade types.
//!
//! This module provides [`Trade`], a decoded trade between two parties on
//! one market. Prices are kept raw (unscaled integer ticks); turning them
//! into human-readable decimals needs the market's decimal places and is
//! done by the export pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The side whose order triggered the trade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Aggressor {
    /// Side was not recorded.
    #[default]
    Unspecified,
    /// The buy order crossed the book.
    Buy,
    /// The sell order crossed the book.
    Sell,
}

impl Aggressor {
    /// Textual name used in exported rows.
    pub fn as_str(&self) -> &'static str {
        match self {
            Aggressor::Buy => "Buy",
            Aggressor::Sell => "Sell",
            Aggressor::Unspecified => "Unknown",
        }
    }
}

impl fmt::Display for Aggressor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A trade decoded from the store.
///
/// Immutable once decoded. `price` is in market ticks; `timestamp_ns` is
/// nanoseconds since the Unix epoch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Unique trade identifier.
    pub id: String,

    /// Market the trade happened on.
    pub market_id: String,

    /// Selling party.
    pub seller: String,

    /// Buying party.
    pub buyer: String,

    /// Traded size.
    pub size: u64,

    /// Raw, unscaled price.
    pub price: u64,

    /// Side whose order triggered the trade.
    pub aggressor: Aggressor,

    /// Reference of the buy order.
    pub buy_order: String,

    /// Reference of the sell order.
    pub sell_order: String,

    /// Trade time, nanoseconds since Unix epoch.
    pub timestamp_ns: i64,
}

impl Trade {
    /// Get the timestamp as a DateTime.
    pub fn timestamp(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_nanos(self.timestamp_ns)
    }
}
