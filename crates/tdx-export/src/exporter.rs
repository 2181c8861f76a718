//! Scan driver: store prefix scan to CSV file.
//!
//! For every entry under the trade prefix, in key order:
//! decode -> count -> classify -> resolve precision -> format -> write,
//! then count the record against the batch throttle.
//!
//! The first record that fails to decode, or the first failed write, stops
//! the scan. Rows written up to that point are flushed and kept.

use crate::classifier::TradeClassifier;
use crate::completion::CompletionSignal;
use crate::config::{CounterSnapshot, PipelineConfig};
use crate::error::ExportError;
use crate::formatter::format_trade;
use crate::markets::MarketLookup;
use crate::sink::CsvSink;
use crate::throttle::BatchThrottle;
use serde::Serialize;
use std::fs::File;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use tdx_store::{KvStore, SqliteStore};
use tdx_types::decode_trade;
use tracing::{error, info};

/// Summary of a finished export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportReport {
    /// Chain the export ran for.
    pub chain_id: String,

    /// File the rows were written to.
    pub output_path: PathBuf,

    /// Data rows written (header excluded).
    pub rows_written: u64,

    /// Kept trades whose market was missing from the metadata snapshot.
    pub unknown_market_trades: u64,

    /// Batch boundaries reached.
    pub batch_pauses: u64,

    /// Counters at the end of the run. Includes peers' increments when the
    /// counters object is shared.
    pub counters: CounterSnapshot,
}

/// Run one trade export against the store at `store_path`.
///
/// Opens the store read-only, exports through [`export_trades`], closes
/// the store, and completes `signal` whatever the outcome.
///
/// # Errors
///
/// - [`ExportError::StoreOpen`] / [`ExportError::OutputCreate`] are fatal
///   (see [`ExportError::is_fatal`]); the caller should stop the whole run.
/// - Any other error aborted this scan only.
pub fn run_trade_export(
    store_path: &Path,
    config: &PipelineConfig,
    markets: &MarketLookup,
    signal: CompletionSignal,
) -> Result<ExportReport, ExportError> {
    info!(chain_id = %config.chain_id, "Processing trades STARTED");

    let result = SqliteStore::open_read_only(store_path)
        .map_err(ExportError::StoreOpen)
        .and_then(|store| export_trades(&store, config, markets));

    match &result {
        Ok(report) => info!(
            chain_id = %report.chain_id,
            rows = report.rows_written,
            total = report.counters.total_trades,
            excluded = report.counters.excluded_trades,
            "Processing trades COMPLETED"
        ),
        Err(e) if e.is_fatal() => error!(chain_id = %config.chain_id, error = %e, "Processing trades FAILED"),
        Err(e) => error!(
            chain_id = %config.chain_id,
            error = %e,
            total = config.counters.total_trades(),
            excluded = config.counters.excluded_trades(),
            "Processing trades ABORTED"
        ),
    }

    signal.done();
    result
}

/// Export all trade records of `store` into the configured output file.
///
/// Creates (or truncates) the output, writes the header, scans the trade
/// prefix, and flushes the output on every exit path.
pub fn export_trades<S: KvStore>(
    store: &S,
    config: &PipelineConfig,
    markets: &MarketLookup,
) -> Result<ExportReport, ExportError> {
    let output_path = config.output_path();
    let sink = CsvSink::create(&output_path).map_err(|source| ExportError::OutputCreate {
        path: output_path.clone(),
        source,
    })?;

    let mut scan = TradeScan {
        config,
        markets,
        classifier: TradeClassifier::from_config(config),
        throttle: BatchThrottle::new(config.batch_size, config.pause),
        sink,
        unknown_market_trades: 0,
        failure: None,
    };

    let outcome = scan.run(store);

    let flushed = scan.sink.flush();
    match (outcome, flushed) {
        (Err(e), Err(flush_error)) => {
            error!(error = %flush_error, "Flush after aborted scan failed");
            return Err(e);
        }
        (Err(e), Ok(())) => return Err(e),
        (Ok(()), Err(flush_error)) => return Err(ExportError::Flush(flush_error)),
        (Ok(()), Ok(())) => {}
    }

    Ok(ExportReport {
        chain_id: config.chain_id.clone(),
        output_path,
        rows_written: scan.sink.rows_written(),
        unknown_market_trades: scan.unknown_market_trades,
        batch_pauses: scan.throttle.pauses(),
        counters: config.counters.snapshot(),
    })
}

/// State of one scan in progress.
struct TradeScan<'a> {
    config: &'a PipelineConfig,
    markets: &'a MarketLookup,
    classifier: TradeClassifier,
    throttle: BatchThrottle,
    sink: CsvSink<File>,
    unknown_market_trades: u64,
    failure: Option<ExportError>,
}

impl TradeScan<'_> {
    fn run<S: KvStore>(&mut self, store: &S) -> Result<(), ExportError> {
        self.sink.write_header()?;

        let config = self.config;
        store.scan_prefix(&config.key_prefix, |key, value| {
            if let Err(e) = self.process(key, value) {
                self.failure = Some(e);
                return ControlFlow::Break(());
            }
            self.throttle.record();
            ControlFlow::Continue(())
        })?;

        match self.failure.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn process(&mut self, key: &[u8], value: &[u8]) -> Result<(), ExportError> {
        let trade = decode_trade(value).map_err(|source| ExportError::Decode {
            key: String::from_utf8_lossy(key).into_owned(),
            source,
        })?;

        self.config.counters.record_trade();

        let classification = self.classifier.classify(&trade);
        if !classification.keep {
            return Ok(());
        }

        let precision = self.markets.resolve(&trade.market_id);
        if !precision.known {
            self.unknown_market_trades += 1;
        }

        let row = format_trade(
            &trade,
            precision.decimal_places,
            classification.is_bot,
            &self.config.chain_id,
        );
        self.sink.write_row(&row)?;

        Ok(())
    }
}
