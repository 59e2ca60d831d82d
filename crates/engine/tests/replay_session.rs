use std::sync::Arc;

use common::Signal;
use engine::{CycleOutcome, ReplayFeed, TradingLoop};
use paper::PaperLedger;
use strategy::{build_strategy, StrategyFileConfig};

const STRATEGY_TOML: &str = r#"
[strategy]
type = "sma"
name = "Replay SMA 3/5"
symbol = "AAPL"

[strategy.params]
short_window = 3
long_window = 5
"#;

const SCRIPT: &str = "\
# warm-up
100
100
-
100
100
100
# breakout
130
# slide
60
50
";

#[tokio::test]
async fn replayed_session_books_buy_then_sells() {
    let file = StrategyFileConfig::parse(STRATEGY_TOML).unwrap();
    let strategy = build_strategy(&file.strategy).unwrap();
    let feed = Arc::new(ReplayFeed::parse(SCRIPT).unwrap());
    let mut trading = TradingLoop::new(
        strategy,
        PaperLedger::new(1_000.0),
        feed,
        file.strategy.symbol.clone(),
    )
    .with_quantity(file.strategy.quantity)
    .unwrap();

    let mut reports = Vec::new();
    while trading.cycles() < 9 {
        reports.push(trading.run_cycle().await);
    }

    let signals: Vec<Option<Signal>> = reports.iter().map(|r| r.signal).collect();
    assert_eq!(
        signals,
        vec![
            Some(Signal::Hold),
            Some(Signal::Hold),
            None, // gap
            Some(Signal::Hold),
            Some(Signal::Hold),
            Some(Signal::Hold), // five flat prices
            Some(Signal::Buy),  // [100, 100, 100, 100, 130]
            Some(Signal::Sell), // [100, 100, 100, 130, 60]
            Some(Signal::Sell), // [100, 100, 130, 60, 50]
        ]
    );
    assert_eq!(reports[2].outcome, CycleOutcome::NoData);

    let filled = reports
        .iter()
        .filter(|r| matches!(r.outcome, CycleOutcome::Filled(_)))
        .count();
    assert_eq!(filled, 3);

    // -130 + 60 + 50
    assert_eq!(trading.ledger().balance(), 980.0);
    assert_eq!(trading.ledger().pnl(), -20.0);
    assert_eq!(trading.symbol(), "AAPL");
    assert_eq!(trading.strategy().name(), "Replay SMA 3/5");
}
