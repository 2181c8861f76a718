//! Binary trade records as persisted in the store.
//!
//! Records are Protocol Buffers messages. Only the fields the export needs
//! are declared; anything else on the wire is skipped by the decoder.

use crate::error::TypeError;
use crate::trade::{Aggressor, Trade};
use prost::Message;

/// Wire-level side enumeration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum WireSide {
    Unspecified = 0,
    Buy = 1,
    Sell = 2,
}

/// Wire-level trade message.
#[derive(Clone, PartialEq, Message)]
pub struct TradeRecord {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub market_id: String,
    #[prost(uint64, tag = "3")]
    pub price: u64,
    #[prost(uint64, tag = "4")]
    pub size: u64,
    #[prost(string, tag = "5")]
    pub buyer: String,
    #[prost(string, tag = "6")]
    pub seller: String,
    #[prost(enumeration = "WireSide", tag = "7")]
    pub aggressor: i32,
    #[prost(string, tag = "8")]
    pub buy_order: String,
    #[prost(string, tag = "9")]
    pub sell_order: String,
    #[prost(int64, tag = "10")]
    pub timestamp: i64,
}

/// Decode a stored payload into a [`Trade`].
///
/// # Errors
///
/// Returns [`TypeError::Decode`] if the bytes are not a well-formed record.
/// Aggressor values outside the known range decode as
/// [`Aggressor::Unspecified`].
pub fn decode_trade(bytes: &[u8]) -> Result<Trade, TypeError> {
    let record = TradeRecord::decode(bytes)?;
    Ok(convert_record(record))
}

/// Encode a [`Trade`] into its stored representation.
pub fn encode_trade(trade: &Trade) -> Vec<u8> {
    let record = TradeRecord {
        id: trade.id.clone(),
        market_id: trade.market_id.clone(),
        price: trade.price,
        size: trade.size,
        buyer: trade.buyer.clone(),
        seller: trade.seller.clone(),
        aggressor: wire_side(trade.aggressor) as i32,
        buy_order: trade.buy_order.clone(),
        sell_order: trade.sell_order.clone(),
        timestamp: trade.timestamp_ns,
    };
    record.encode_to_vec()
}

fn convert_record(record: TradeRecord) -> Trade {
    let aggressor = match WireSide::try_from(record.aggressor) {
        Ok(WireSide::Buy) => Aggressor::Buy,
        Ok(WireSide::Sell) => Aggressor::Sell,
        Ok(WireSide::Unspecified) | Err(_) => Aggressor::Unspecified,
    };

    Trade {
        id: record.id,
        market_id: record.market_id,
        seller: record.seller,
        buyer: record.buyer,
        size: record.size,
        price: record.price,
        aggressor,
        buy_order: record.buy_order,
        sell_order: record.sell_order,
        timestamp_ns: record.timestamp,
    }
}

fn wire_side(aggressor: Aggressor) -> WireSide {
    match aggressor {
        Aggressor::Buy => WireSide::Buy,
        Aggressor::Sell => WireSide::Sell,
        Aggressor::Unspecified => WireSide::Unspecified,
    }
}
