//! Pipeline configuration and run counters.

use crate::classifier::Whitelist;
use serde::Serialize;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Key prefix reserved for trade records in the store.
pub const TRADE_KEY_PREFIX: &[u8] = b"M:";

/// Records scanned between two pauses unless configured otherwise.
pub const DEFAULT_BATCH_SIZE: NonZeroUsize = match NonZeroUsize::new(1000) {
    Some(n) => n,
    None => panic!("batch size must be non-zero"),
};

/// Pause at each batch boundary unless configured otherwise.
pub const DEFAULT_PAUSE: Duration = Duration::ZERO;

/// Live counters shared between a pipeline and its caller.
///
/// Increments are atomic, so several peer pipelines may share one
/// `Arc<TradeCounters>` without extra locking.
#[derive(Debug, Default)]
pub struct TradeCounters {
    total_trades: AtomicU64,
    excluded_trades: AtomicU64,
}

impl TradeCounters {
    /// Create zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a successfully decoded trade.
    #[inline]
    pub fn record_trade(&self) {
        self.total_trades.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a trade dropped by the exclusion policy.
    #[inline]
    pub fn record_excluded(&self) {
        self.excluded_trades.fetch_add(1, Ordering::Relaxed);
    }

    /// Trades decoded so far.
    pub fn total_trades(&self) -> u64 {
        self.total_trades.load(Ordering::Relaxed)
    }

    /// Trades dropped so far.
    pub fn excluded_trades(&self) -> u64 {
        self.excluded_trades.load(Ordering::Relaxed)
    }

    /// Point-in-time copy of both counters.
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            total_trades: self.total_trades(),
            excluded_trades: self.excluded_trades(),
        }
    }
}

/// Copy of [`TradeCounters`] for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CounterSnapshot {
    pub total_trades: u64,
    pub excluded_trades: u64,
}

impl CounterSnapshot {
    /// Trades that were not excluded.
    pub fn kept_trades(&self) -> u64 {
        self.total_trades.saturating_sub(self.excluded_trades)
    }
}

/// Configuration for one trade export pipeline.
///
/// # Example
///
/// ```rust
/// use std::num::NonZeroUsize;
/// use std::time::Duration;
/// use tdx_export::{PipelineConfig, Whitelist};
///
/// let config = PipelineConfig::new("mainnet-1")
///     .with_batch_size(NonZeroUsize::new(500).unwrap())
///     .with_pause(Duration::from_millis(250))
///     .with_exclude_bots(true)
///     .with_whitelist(Whitelist::from_parties(["market-maker-1"]));
///
/// assert_eq!(config.output_file_name(), "trades-mainnet-1.csv");
/// ```
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Chain identifier, copied into every row and the file name.
    pub chain_id: String,

    /// Records scanned between two pauses.
    pub batch_size: NonZeroUsize,

    /// Length of each pause.
    pub pause: Duration,

    /// Drop trades with no whitelisted party instead of tagging them.
    pub exclude_bots: bool,

    /// Parties considered non-bot.
    pub whitelist: Arc<Whitelist>,

    /// Counters updated during the run.
    pub counters: Arc<TradeCounters>,

    /// Store prefix holding trade records.
    pub key_prefix: Vec<u8>,

    /// Directory the output file is created in.
    pub output_dir: PathBuf,
}

impl PipelineConfig {
    /// Create config for a chain with default settings.
    pub fn new(chain_id: impl Into<String>) -> Self {
        Self {
            chain_id: chain_id.into(),
            batch_size: DEFAULT_BATCH_SIZE,
            pause: DEFAULT_PAUSE,
            exclude_bots: false,
            whitelist: Arc::new(Whitelist::default()),
            counters: Arc::new(TradeCounters::new()),
            key_prefix: TRADE_KEY_PREFIX.to_vec(),
            output_dir: PathBuf::from("."),
        }
    }

    /// Set the number of records scanned between pauses.
    pub fn with_batch_size(mut self, batch_size: NonZeroUsize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the pause taken at each batch boundary.
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Choose between dropping (`true`) and tagging (`false`) bot trades.
    pub fn with_exclude_bots(mut self, exclude: bool) -> Self {
        self.exclude_bots = exclude;
        self
    }

    /// Set the whitelist of known parties.
    pub fn with_whitelist(mut self, whitelist: impl Into<Arc<Whitelist>>) -> Self {
        self.whitelist = whitelist.into();
        self
    }

    /// Use counters owned by the caller, possibly shared with peers.
    pub fn with_counters(mut self, counters: Arc<TradeCounters>) -> Self {
        self.counters = counters;
        self
    }

    /// Override the store prefix to scan.
    pub fn with_key_prefix(mut self, prefix: impl Into<Vec<u8>>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Set the directory the output file is written to.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// File name derived from the chain identifier.
    pub fn output_file_name(&self) -> String {
        format!("trades-{}.csv", self.chain_id)
    }

    /// Full path of the output file.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(self.output_file_name())
    }
}
