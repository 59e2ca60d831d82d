use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use common::{Config, PriceFeed, PriceSourceKind};
use engine::{BinancePriceFeed, CycleOutcome, ReplayFeed, TradingLoop};
use paper::PaperLedger;
use strategy::{build_strategy, StrategyFileConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── Logging ──────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = Config::from_env().context("loading configuration")?;
    let strategy_file = StrategyFileConfig::load(&cfg.strategy_config_path)?;
    let symbol = cfg
        .symbol
        .clone()
        .unwrap_or_else(|| strategy_file.strategy.symbol.clone());
    info!(source = %cfg.price_source, %symbol, "SMABot starting");

    // ── Strategy ──────────────────────────────────────────────────────────────
    let strategy = build_strategy(&strategy_file.strategy).context("building strategy")?;

    // ── Price feed ────────────────────────────────────────────────────────────
    let feed: Arc<dyn PriceFeed> = match cfg.price_source {
        PriceSourceKind::Binance => {
            info!(base_url = %cfg.binance_base_url, "Using Binance ticker feed");
            Arc::new(BinancePriceFeed::new(&cfg.binance_base_url)?)
        }
        PriceSourceKind::Replay => {
            let path = cfg
                .replay_file
                .as_deref()
                .context("REPLAY_FILE is not set")?;
            info!(path, "Using replay feed");
            Arc::new(ReplayFeed::from_file(path).with_context(|| format!("loading {path}"))?)
        }
    };

    // ── Trading loop ──────────────────────────────────────────────────────────
    let ledger = PaperLedger::new(cfg.initial_balance);
    let mut trading = TradingLoop::new(strategy, ledger, feed, symbol)
        .with_quantity(strategy_file.strategy.quantity)?;

    let mut ticker = tokio::time::interval(Duration::from_secs(cfg.interval_secs));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let (mut fills, mut rejections, mut gaps) = (0u64, 0u64, 0u64);

    for _ in 0..cfg.iterations {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                warn!("Shutdown signal received. Stopping early.");
                break;
            }
        }

        let report = trading.run_cycle().await;
        match report.outcome {
            CycleOutcome::Filled(_) => fills += 1,
            CycleOutcome::Rejected { .. } => rejections += 1,
            CycleOutcome::NoData => gaps += 1,
            CycleOutcome::Hold => {}
        }
    }

    let ledger = trading.ledger();
    info!(
        cycles = trading.cycles(),
        fills,
        rejections,
        gaps,
        starting_balance = ledger.starting_balance(),
        balance = ledger.balance(),
        pnl = ledger.pnl(),
        "Trading session completed"
    );
    Ok(())
}
