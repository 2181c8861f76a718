//! Bot classification against a whitelist of known parties.
//!
//! A trade is "known" when at least one of its parties is whitelisted.
//! Trades between two unknown parties are treated as bot trades: they are
//! either dropped or kept with a bot flag, depending on the exclusion
//! policy.

use crate::config::{PipelineConfig, TradeCounters};
use crate::error::ExportError;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;
use tdx_types::Trade;

/// Set of party identifiers considered non-bot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Whitelist {
    parties: HashSet<String>,
}

impl Whitelist {
    /// Create an empty whitelist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a whitelist from party identifiers.
    pub fn from_parties<I, S>(parties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parties: parties.into_iter().map(Into::into).collect(),
        }
    }

    /// Read one party per line. Blank lines and lines starting with `#`
    /// are skipped; surrounding whitespace is trimmed.
    pub fn from_reader<R: BufRead>(reader: R) -> std::io::Result<Self> {
        let mut parties = HashSet::new();
        for line in reader.lines() {
            let line = line?;
            let party = line.trim();
            if party.is_empty() || party.starts_with('#') {
                continue;
            }
            parties.insert(party.to_string());
        }
        Ok(Self { parties })
    }

    /// Load a whitelist file (same format as [`from_reader`](Self::from_reader)).
    pub fn load(path: &Path) -> Result<Self, ExportError> {
        let input = |source| ExportError::Input {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(input)?;
        Self::from_reader(BufReader::new(file)).map_err(input)
    }

    /// Returns true if `party` is whitelisted.
    #[inline]
    pub fn contains(&self, party: &str) -> bool {
        self.parties.contains(party)
    }

    /// Number of whitelisted parties.
    pub fn len(&self) -> usize {
        self.parties.len()
    }

    /// Returns true if no party is whitelisted.
    pub fn is_empty(&self) -> bool {
        self.parties.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Whitelist {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_parties(iter)
    }
}

/// Outcome of classifying one trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Emit a row for this trade.
    pub keep: bool,
    /// Neither party is whitelisted.
    pub is_bot: bool,
}

impl Classification {
    /// At least one party is whitelisted.
    pub const KNOWN: Self = Self {
        keep: true,
        is_bot: false,
    };

    /// Bot trade kept with the bot flag.
    pub const TAGGED_BOT: Self = Self {
        keep: true,
        is_bot: true,
    };

    /// Bot trade dropped by the exclusion policy.
    pub const EXCLUDED: Self = Self {
        keep: false,
        is_bot: true,
    };
}

/// Classify a trade without side effects.
pub fn classify(trade: &Trade, whitelist: &Whitelist, exclude: bool) -> Classification {
    if whitelist.contains(&trade.buyer) || whitelist.contains(&trade.seller) {
        Classification::KNOWN
    } else if exclude {
        Classification::EXCLUDED
    } else {
        Classification::TAGGED_BOT
    }
}

/// Classifier bound to one pipeline's whitelist, policy and counters.
///
/// The only side effect is bumping the excluded counter when a trade is
/// dropped.
#[derive(Debug, Clone)]
pub struct TradeClassifier {
    whitelist: Arc<Whitelist>,
    exclude: bool,
    counters: Arc<TradeCounters>,
}

impl TradeClassifier {
    /// Create a classifier.
    pub fn new(whitelist: Arc<Whitelist>, exclude: bool, counters: Arc<TradeCounters>) -> Self {
        Self {
            whitelist,
            exclude,
            counters,
        }
    }

    /// Create a classifier from a pipeline configuration.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(
            Arc::clone(&config.whitelist),
            config.exclude_bots,
            Arc::clone(&config.counters),
        )
    }

    /// Classify a trade, counting it as excluded if it is dropped.
    pub fn classify(&self, trade: &Trade) -> Classification {
        let classification = classify(trade, &self.whitelist, self.exclude);
        if !classification.keep {
            self.counters.record_excluded();
        }
        classification
    }
}
