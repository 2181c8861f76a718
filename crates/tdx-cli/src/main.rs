//! tdx-cli: Export one chain's trades to CSV.
//!
//! Reads its settings from the environment (see [`settings`]), runs the
//! export pipeline on a blocking worker and waits for it to signal
//! completion before reporting.

mod settings;

use anyhow::{bail, Context};
use settings::Settings;
use std::sync::Arc;
use tdx_export::{run_trade_export, Completion, MarketLookup, PipelineConfig, Whitelist};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if present)
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tdx_cli=info,tdx_export=info,tdx_store=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env().context("invalid configuration")?;

    let whitelist = match &settings.whitelist_file {
        Some(path) => Whitelist::load(path)?,
        None => Whitelist::new(),
    };
    let markets = match &settings.markets_file {
        Some(path) => MarketLookup::load(path)?,
        None => MarketLookup::default(),
    };

    tracing::info!(
        chain_id = %settings.chain_id,
        store = %settings.store_path.display(),
        whitelisted = whitelist.len(),
        markets = markets.len(),
        exclude_bots = settings.exclude_bots,
        "Starting trade export"
    );

    let config = PipelineConfig::new(settings.chain_id.clone())
        .with_batch_size(settings.batch_size)
        .with_pause(settings.pause)
        .with_exclude_bots(settings.exclude_bots)
        .with_whitelist(whitelist)
        .with_output_dir(settings.output_dir.clone());
    let counters = Arc::clone(&config.counters);

    let mut completion = Completion::new();
    let signal = completion.signal();

    let store_path = settings.store_path.clone();
    let markets = Arc::new(markets);
    let pipeline = tokio::task::spawn_blocking(move || {
        run_trade_export(&store_path, &config, &markets, signal)
    });

    tokio::task::spawn_blocking(move || completion.wait()).await?;

    let result = pipeline.await.context("export worker panicked")?;

    let totals = counters.snapshot();
    match result {
        Ok(report) => {
            tracing::info!(
                output = %report.output_path.display(),
                total = totals.total_trades,
                excluded = totals.excluded_trades,
                rows = report.rows_written,
                unknown_markets = report.unknown_market_trades,
                "Export finished"
            );
            Ok(())
        }
        Err(e) if e.is_fatal() => Err(e).context("trade export failed"),
        Err(e) => {
            tracing::error!(
                total = totals.total_trades,
                excluded = totals.excluded_trades,
                "Export aborted before the end of the store"
            );
            bail!("trade export aborted: {}", e)
        }
    }
}
