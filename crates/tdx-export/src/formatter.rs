//! Projection of trades into CSV rows.
//!
//! Each row carries the price twice: `Price` scaled by the market's decimal
//! places and `TickPrice` exactly as stored, so downstream consumers can
//! reconcile one against the other.

use rust_decimal::Decimal;
use serde::Serialize;
use tdx_types::Trade;

/// Column names, in output order.
pub const HEADER: [&str; 13] = [
    "ChainID",
    "ID",
    "MarketID",
    "Seller",
    "Buyer",
    "Size",
    "Price",
    "TickPrice",
    "Aggressor",
    "BuyOrder",
    "SellOrder",
    "Timestamp",
    "IsBot",
];

/// Format of the `Timestamp` column (UTC).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One output row. Field order matches [`HEADER`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradeRow {
    #[serde(rename = "ChainID")]
    pub chain_id: String,
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "MarketID")]
    pub market_id: String,
    #[serde(rename = "Seller")]
    pub seller: String,
    #[serde(rename = "Buyer")]
    pub buyer: String,
    #[serde(rename = "Size")]
    pub size: String,
    /// Decimal-corrected price.
    #[serde(rename = "Price")]
    pub price: String,
    /// Raw price as stored.
    #[serde(rename = "TickPrice")]
    pub tick_price: String,
    #[serde(rename = "Aggressor")]
    pub aggressor: String,
    #[serde(rename = "BuyOrder")]
    pub buy_order: String,
    #[serde(rename = "SellOrder")]
    pub sell_order: String,
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "IsBot")]
    pub is_bot: String,
}

/// Convert a classified trade into an output row.
pub fn format_trade(trade: &Trade, decimal_places: u32, is_bot: bool, chain_id: &str) -> TradeRow {
    TradeRow {
        chain_id: chain_id.to_string(),
        id: trade.id.clone(),
        market_id: trade.market_id.clone(),
        seller: trade.seller.clone(),
        buyer: trade.buyer.clone(),
        size: trade.size.to_string(),
        price: scale_price(trade.price, decimal_places),
        tick_price: trade.price.to_string(),
        aggressor: trade.aggressor.to_string(),
        buy_order: trade.buy_order.clone(),
        sell_order: trade.sell_order.clone(),
        timestamp: format_timestamp(trade),
        is_bot: bool_flag(is_bot).to_string(),
    }
}

/// Render `raw / 10^decimal_places` with exactly `decimal_places`
/// fractional digits.
///
/// ```rust
/// use tdx_export::scale_price;
///
/// assert_eq!(scale_price(123000, 3), "123.000");
/// assert_eq!(scale_price(5, 3), "0.005");
/// assert_eq!(scale_price(42, 0), "42");
/// ```
pub fn scale_price(raw: u64, decimal_places: u32) -> String {
    if decimal_places == 0 {
        return raw.to_string();
    }

    match Decimal::try_from_i128_with_scale(i128::from(raw), decimal_places) {
        Ok(price) => price.to_string(),
        // Scale beyond what Decimal can hold.
        Err(_) => place_decimal_point(raw, decimal_places),
    }
}

fn place_decimal_point(raw: u64, decimal_places: u32) -> String {
    let digits = raw.to_string();
    let scale = decimal_places as usize;

    if digits.len() > scale {
        let (int_part, frac_part) = digits.split_at(digits.len() - scale);
        format!("{}.{}", int_part, frac_part)
    } else {
        format!("0.{}{}", "0".repeat(scale - digits.len()), digits)
    }
}

fn format_timestamp(trade: &Trade) -> String {
    trade.timestamp().format(TIMESTAMP_FORMAT).to_string()
}

fn bool_flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}
