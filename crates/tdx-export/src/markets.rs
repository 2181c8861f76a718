//! Market decimal-place lookup.
//!
//! The lookup holds a snapshot of market metadata taken before the scan
//! starts and never refreshes it, so every trade of a market is scaled
//! with the same precision for the whole run.

use crate::error::ExportError;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tdx_types::Market;
use tracing::{debug, warn};

/// Largest precision accepted from market metadata. Anything above is
/// treated as misconfigured and resolves to 0.
pub const MAX_DECIMAL_PLACES: u32 = 38;

/// Decimal places resolved for a market.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketPrecision {
    /// Scaling exponent to apply (0 when defaulted).
    pub decimal_places: u32,
    /// The market was present in the metadata snapshot.
    pub known: bool,
}

/// Read-only map from market identifier to market descriptor.
#[derive(Debug, Clone, Default)]
pub struct MarketLookup {
    markets: HashMap<String, Market>,
}

impl MarketLookup {
    /// Build a lookup from market descriptors, keyed by their id.
    pub fn from_markets<I: IntoIterator<Item = Market>>(markets: I) -> Self {
        Self {
            markets: markets.into_iter().map(|m| (m.id.clone(), m)).collect(),
        }
    }

    /// Load a JSON array of market descriptors.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tdx_export::MarketLookup;
    ///
    /// let json = r#"[{"id": "BTCUSD", "decimalPlaces": 5}]"#;
    /// let lookup = MarketLookup::from_json_reader(json.as_bytes()).unwrap();
    /// assert_eq!(lookup.decimal_places("BTCUSD"), 5);
    /// ```
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, ExportError> {
        let markets: Vec<Market> = serde_json::from_reader(reader)?;
        Ok(Self::from_markets(markets))
    }

    /// Load a JSON market file.
    pub fn load(path: &Path) -> Result<Self, ExportError> {
        let file = File::open(path).map_err(|source| ExportError::Input {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_reader(BufReader::new(file))
    }

    /// Number of markets in the snapshot.
    pub fn len(&self) -> usize {
        self.markets.len()
    }

    /// Returns true if the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }

    /// Get a market descriptor.
    pub fn get(&self, market_id: &str) -> Option<&Market> {
        self.markets.get(market_id)
    }

    /// Resolve the precision for a market.
    ///
    /// Unknown markets and markets configured with non-positive (or
    /// unrepresentable) decimal places resolve to 0. Every occurrence emits a
    /// diagnostic: a warning for unknown or misconfigured markets, a debug
    /// line for markets that simply have no decimal places.
    pub fn resolve(&self, market_id: &str) -> MarketPrecision {
        let Some(market) = self.markets.get(market_id) else {
            warn!(
                market_id = %market_id,
                "No market found for trade market - using default DP [0]"
            );
            return MarketPrecision {
                decimal_places: 0,
                known: false,
            };
        };

        if market.decimal_places <= 0 {
            if market.decimal_places < 0 {
                warn!(
                    market_id = %market_id,
                    decimal_places = market.decimal_places,
                    "Negative market decimal places - using default DP [0]"
                );
            } else {
                debug!(market_id = %market_id, "Market has no decimal places");
            }
            return MarketPrecision {
                decimal_places: 0,
                known: true,
            };
        }

        match u32::try_from(market.decimal_places) {
            Ok(decimal_places) if decimal_places <= MAX_DECIMAL_PLACES => MarketPrecision {
                decimal_places,
                known: true,
            },
            _ => {
                warn!(
                    market_id = %market_id,
                    decimal_places = market.decimal_places,
                    "Market decimal places out of range - using default DP [0]"
                );
                MarketPrecision {
                    decimal_places: 0,
                    known: true,
                }
            }
        }
    }

    /// Decimal places to scale a market's prices with.
    pub fn decimal_places(&self, market_id: &str) -> u32 {
        self.resolve(market_id).decimal_places
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup() -> MarketLookup {
        MarketLookup::from_markets([
            Market::new("BTCUSD", 5),
            Market::new("FLAT", 0),
            Market::new("BROKEN", -3),
            Market::new("WIDE", 4_000_000_000),
            Market::new("HUGE", i64::MAX),
            Market::new("FINEST", 38),
        ])
    }

    #[test]
    fn test_known_market() {
        let precision = lookup().resolve("BTCUSD");
        assert_eq!(precision.decimal_places, 5);
        assert!(precision.known);
    }

    #[test]
    fn test_unknown_market_defaults_to_zero() {
        let precision = lookup().resolve("NOPE");
        assert_eq!(precision.decimal_places, 0);
        assert!(!precision.known);
    }

    #[test]
    fn test_non_positive_precision_defaults_to_zero() {
        assert_eq!(lookup().decimal_places("FLAT"), 0);
        assert_eq!(lookup().decimal_places("BROKEN"), 0);
        assert!(lookup().resolve("BROKEN").known);
    }

    #[test]
    fn test_out_of_range_precision_defaults_to_zero() {
        assert_eq!(lookup().decimal_places("HUGE"), 0);
        assert_eq!(lookup().decimal_places("WIDE"), 0);
        assert!(lookup().resolve("WIDE").known);
    }

    #[test]
    fn test_precision_cap_is_inclusive() {
        assert_eq!(lookup().decimal_places("FINEST"), MAX_DECIMAL_PLACES);
    }

    #[test]
    fn test_from_json_reader() {
        let json = r#"[
            {"id": "ETHUSD", "name": "Ether", "decimal_places": 2},
            {"id": "SOLUSD", "decimalPlaces": 3}
        ]"#;
        let lookup = MarketLookup::from_json_reader(json.as_bytes()).unwrap();

        assert_eq!(lookup.len(), 2);
        assert_eq!(lookup.decimal_places("ETHUSD"), 2);
        assert_eq!(lookup.decimal_places("SOLUSD"), 3);
        assert_eq!(lookup.get("ETHUSD").and_then(|m| m.name.as_deref()), Some("Ether"));
    }

    #[test]
    fn test_from_json_reader_rejects_garbage() {
        let result = MarketLookup::from_json_reader("{not json".as_bytes());
        assert!(matches!(result, Err(ExportError::MarketData(_))));
    }
}
