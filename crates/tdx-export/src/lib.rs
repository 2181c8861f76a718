//! tdx-export: Trade extraction, filtering and CSV export.
//!
//! This crate turns the trade records of one chain's store into a flat CSV
//! snapshot for reporting consumers.
//!
//! # Overview
//!
//! One pipeline instance:
//! - Opens the store read-only and scans the trade prefix in key order
//! - Decodes each record and counts it
//! - Classifies it against the whitelist (drop or tag bot trades)
//! - Scales its price by the market's decimal places
//! - Writes a row to `trades-<chain>.csv`
//! - Pauses after every batch of records
//! - Signals completion to the orchestrator, whatever the outcome
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use tdx_export::{run_trade_export, Completion, MarketLookup, PipelineConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PipelineConfig::new("mainnet-1").with_exclude_bots(true);
//!     let markets = MarketLookup::default();
//!
//!     let mut completion = Completion::new();
//!     let signal = completion.signal();
//!
//!     let report = run_trade_export(Path::new("store.db"), &config, &markets, signal)?;
//!     completion.wait();
//!
//!     println!(
//!         "{} rows, {} trades seen, {} excluded",
//!         report.rows_written, report.counters.total_trades, report.counters.excluded_trades
//!     );
//!     Ok(())
//! }
//! ```
//!
//! # Errors
//!
//! Failing to open the store or create the output is fatal for the whole
//! run. A record that fails to decode, or a failed write, aborts only this
//! pipeline; rows already written stay in the flushed file.

mod classifier;
mod completion;
mod config;
mod error;
mod exporter;
mod formatter;
mod markets;
mod sink;
mod throttle;

pub use classifier::{classify, Classification, TradeClassifier, Whitelist};
pub use completion::{Completion, CompletionSignal};
pub use config::{
    CounterSnapshot, PipelineConfig, TradeCounters, DEFAULT_BATCH_SIZE, DEFAULT_PAUSE,
    TRADE_KEY_PREFIX,
};
pub use error::ExportError;
pub use exporter::{export_trades, run_trade_export, ExportReport};
pub use formatter::{format_trade, scale_price, TradeRow, HEADER, TIMESTAMP_FORMAT};
pub use markets::{MarketLookup, MarketPrecision, MAX_DECIMAL_PLACES};
pub use sink::CsvSink;
pub use throttle::{pause, BatchThrottle};

// Re-export commonly used types from dependencies for convenience
pub use tdx_store::{KvStore, MemoryStore, SqliteStore};
pub use tdx_types::{Aggressor, Market, Trade};
