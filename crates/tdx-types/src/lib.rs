//! tdx-types: Shared data structures for the trade export pipeline
//!
//! This crate defines the types used across the workspace:
//! - [`Trade`] - A decoded trade record with raw (unscaled) price
//! - [`Aggressor`] - The side whose order triggered the trade
//! - [`Market`] - Market descriptor carrying decimal-place precision
//! - [`decode_trade`] - Decoder for the binary trade records kept in the store
//!
//! # Example
//!
//! ```rust
//! use tdx_types::{decode_trade, encode_trade, Aggressor, Trade};
//!
//! let trade = Trade {
//!     id: "t-1".to_string(),
//!     market_id: "BTCUSD".to_string(),
//!     price: 4_200_000,
//!     size: 3,
//!     aggressor: Aggressor::Buy,
//!     ..Default::default()
//! };
//!
//! let bytes = encode_trade(&trade);
//! let decoded = decode_trade(&bytes).unwrap();
//! assert_eq!(decoded, trade);
//! ```

mod error;
mod market;
mod record;
mod trade;

pub use error::TypeError;
pub use market::Market;
pub use record::{decode_trade, encode_trade};
pub use trade::{Aggressor, Trade};
