//! Run settings read from the environment.
//!
//! # Environment Variables
//!
//! - `TDX_STORE_PATH`: store file to export (required)
//! - `TDX_CHAIN_ID`: chain identifier written to every row (required)
//! - `TDX_BATCH_SIZE`: records per batch before pausing (default: 1000)
//! - `TDX_PAUSE_MS`: pause after each batch, in milliseconds (default: 0)
//! - `TDX_EXCLUDE_BOTS`: "true" or "1" drops bot trades instead of tagging them
//! - `TDX_WHITELIST_FILE`: known parties, one per line (default: none)
//! - `TDX_MARKETS_FILE`: JSON array of market descriptors (default: none)
//! - `TDX_OUTPUT_DIR`: directory for `trades-<chain>.csv` (default: ".")

use anyhow::{anyhow, Context};
use std::env;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;
use tdx_export::{DEFAULT_BATCH_SIZE, DEFAULT_PAUSE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub store_path: PathBuf,
    pub chain_id: String,
    pub batch_size: NonZeroUsize,
    pub pause: Duration,
    pub exclude_bots: bool,
    pub whitelist_file: Option<PathBuf>,
    pub markets_file: Option<PathBuf>,
    pub output_dir: PathBuf,
}

impl Settings {
    /// Load settings from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load settings through `lookup`, which returns the value of a variable
    /// if it is set.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &str| var(name).ok_or_else(|| anyhow!("{} is not set", name));

        let batch_size = match var("TDX_BATCH_SIZE") {
            Some(raw) => raw
                .trim()
                .parse::<NonZeroUsize>()
                .with_context(|| format!("invalid TDX_BATCH_SIZE {:?}", raw))?,
            None => DEFAULT_BATCH_SIZE,
        };

        let pause = match var("TDX_PAUSE_MS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .with_context(|| format!("invalid TDX_PAUSE_MS {:?}", raw))?,
            None => DEFAULT_PAUSE,
        };

        let exclude_bots = matches!(
            var("TDX_EXCLUDE_BOTS")
                .map(|s| s.trim().to_lowercase())
                .as_deref(),
            Some("true" | "1")
        );

        Ok(Self {
            store_path: required("TDX_STORE_PATH")?.into(),
            chain_id: required("TDX_CHAIN_ID")?,
            batch_size,
            pause,
            exclude_bots,
            whitelist_file: var("TDX_WHITELIST_FILE").map(PathBuf::from),
            markets_file: var("TDX_MARKETS_FILE").map(PathBuf::from),
            output_dir: var("TDX_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<Settings> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|name| vars.get(name).cloned())
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("TDX_STORE_PATH", "/data/store.db"),
        ("TDX_CHAIN_ID", "chain-1"),
    ];

    #[test]
    fn test_defaults() {
        let settings = load(&REQUIRED).unwrap();

        assert_eq!(settings.store_path, PathBuf::from("/data/store.db"));
        assert_eq!(settings.chain_id, "chain-1");
        assert_eq!(settings.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(settings.pause, DEFAULT_PAUSE);
        assert!(!settings.exclude_bots);
        assert_eq!(settings.whitelist_file, None);
        assert_eq!(settings.markets_file, None);
        assert_eq!(settings.output_dir, PathBuf::from("."));
    }

    #[test]
    fn test_all_values() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("TDX_BATCH_SIZE", "250"),
            ("TDX_PAUSE_MS", "15"),
            ("TDX_EXCLUDE_BOTS", "TRUE"),
            ("TDX_WHITELIST_FILE", "wl.txt"),
            ("TDX_MARKETS_FILE", "markets.json"),
            ("TDX_OUTPUT_DIR", "/tmp/out"),
        ]);
        let settings = load(&vars).unwrap();

        assert_eq!(settings.batch_size.get(), 250);
        assert_eq!(settings.pause, Duration::from_millis(15));
        assert!(settings.exclude_bots);
        assert_eq!(settings.whitelist_file, Some(PathBuf::from("wl.txt")));
        assert_eq!(settings.markets_file, Some(PathBuf::from("markets.json")));
        assert_eq!(settings.output_dir, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn test_exclude_bots_values() {
        for (raw, expected) in [("1", true), ("true", true), ("0", false), ("yes", false)] {
            let mut vars = REQUIRED.to_vec();
            vars.push(("TDX_EXCLUDE_BOTS", raw));
            assert_eq!(load(&vars).unwrap().exclude_bots, expected, "{}", raw);
        }
    }

    #[test]
    fn test_missing_required() {
        assert!(load(&[("TDX_CHAIN_ID", "c")]).is_err());
        assert!(load(&[("TDX_STORE_PATH", "s")]).is_err());
        assert!(load(&[("TDX_STORE_PATH", " "), ("TDX_CHAIN_ID", "c")]).is_err());
    }

    #[test]
    fn test_invalid_numbers() {
        for (name, raw) in [
            ("TDX_BATCH_SIZE", "0"),
            ("TDX_BATCH_SIZE", "lots"),
            ("TDX_PAUSE_MS", "-5"),
        ] {
            let mut vars = REQUIRED.to_vec();
            vars.push((name, raw));
            assert!(load(&vars).is_err(), "{}={}", name, raw);
        }
    }
}
