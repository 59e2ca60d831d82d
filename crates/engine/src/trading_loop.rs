use std::sync::Arc;

use tracing::{debug, info, warn};

use common::{Error, Fill, PriceFeed, RejectionReason, Result, Signal, Trade};
use paper::PaperLedger;
use strategy::Strategy;

use crate::window::PriceWindow;

/// What happened during one cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// The feed had no usable price. Nothing else was touched.
    NoData,
    /// The strategy held. No trade was built.
    Hold,
    /// A trade was booked against the ledger.
    Filled(Fill),
    /// The ledger refused the trade; the balance is unchanged.
    Rejected {
        trade: Trade,
        reason: RejectionReason,
    },
}

/// Observable result of one `TradingLoop::run_cycle` call.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    /// 1-based cycle counter.
    pub cycle: u64,
    pub price: Option<f64>,
    pub signal: Option<Signal>,
    pub outcome: CycleOutcome,
    /// Ledger balance after the cycle.
    pub balance: f64,
}

/// Fetch price → decide → maybe trade, one cycle per call.
///
/// The only state carried between cycles is the rolling price window. The
/// loop owns its ledger; cycles run strictly one after another.
pub struct TradingLoop {
    strategy: Box<dyn Strategy>,
    ledger: PaperLedger,
    feed: Arc<dyn PriceFeed>,
    symbol: String,
    window: PriceWindow,
    quantity: f64,
    cycles: u64,
}

impl TradingLoop {
    /// Units traded on every actionable signal unless overridden.
    pub const DEFAULT_QUANTITY: f64 = 1.0;

    pub fn new(
        strategy: Box<dyn Strategy>,
        ledger: PaperLedger,
        feed: Arc<dyn PriceFeed>,
        symbol: impl Into<String>,
    ) -> Self {
        let window = PriceWindow::new(strategy.required_history());
        Self {
            strategy,
            ledger,
            feed,
            symbol: symbol.into(),
            window,
            quantity: Self::DEFAULT_QUANTITY,
            cycles: 0,
        }
    }

    /// Override the units traded per signal. Must be finite and positive.
    pub fn with_quantity(mut self, quantity: f64) -> Result<Self> {
        if !Trade::is_valid_quantity(quantity) {
            return Err(Error::Config(format!(
                "trade quantity must be a positive number, got {quantity}"
            )));
        }
        self.quantity = quantity;
        Ok(self)
    }

    /// Run a single cycle. Per-cycle problems (no data, rejected buy) are
    /// reported in the outcome and never end the loop.
    pub async fn run_cycle(&mut self) -> CycleReport {
        self.cycles += 1;
        let cycle = self.cycles;

        let Some(price) = self.fetch_price().await else {
            warn!(cycle, symbol = %self.symbol, "No data fetched");
            return self.report(cycle, None, None, CycleOutcome::NoData);
        };

        if let Some(evicted) = self.window.push(price) {
            debug!(evicted, "Evicted oldest price from window");
        }
        info!(
            cycle,
            symbol = %self.symbol,
            price,
            window = self.window.len(),
            capacity = self.window.capacity(),
            "Fetched new price"
        );

        let signal = self.strategy.generate_signal(self.window.as_slice());
        info!(cycle, %signal, "Generated signal");

        let Some(side) = signal.side() else {
            return self.report(cycle, Some(price), Some(signal), CycleOutcome::Hold);
        };

        let trade = Trade::new(self.strategy.name(), side, self.quantity);
        info!(trade_id = %trade.id(), "Executing {trade}");

        let outcome = match self.ledger.apply(trade.clone(), price) {
            Ok(fill) => {
                info!(
                    side = %side,
                    qty = fill.trade.quantity(),
                    price,
                    balance = fill.balance_after,
                    "Placed {} order",
                    signal
                );
                CycleOutcome::Filled(fill)
            }
            Err(Error::OrderRejected { reason }) => {
                warn!(side = %side, price, %reason, "Order rejected");
                CycleOutcome::Rejected { trade, reason }
            }
            // The paper ledger only rejects today; kept for any other ledger error
            Err(e) => {
                warn!(side = %side, price, error = %e, "Order failed");
                CycleOutcome::Rejected {
                    trade,
                    reason: RejectionReason::Other(e.to_string()),
                }
            }
        };

        self.report(cycle, Some(price), Some(signal), outcome)
    }

    async fn fetch_price(&self) -> Option<f64> {
        match self.feed.latest_price(&self.symbol).await {
            Ok(Some(price)) if price.is_finite() && price > 0.0 => Some(price),
            Ok(Some(price)) => {
                warn!(symbol = %self.symbol, price, "Discarding unusable price");
                None
            }
            Ok(None) => None,
            Err(e) => {
                warn!(symbol = %self.symbol, error = %e, "Price feed failed");
                None
            }
        }
    }

    fn report(
        &self,
        cycle: u64,
        price: Option<f64>,
        signal: Option<Signal>,
        outcome: CycleOutcome,
    ) -> CycleReport {
        let balance = self.ledger.balance();
        info!(cycle, balance, "Current balance");
        CycleReport {
            cycle,
            price,
            signal,
            outcome,
            balance,
        }
    }

    pub fn strategy(&self) -> &dyn Strategy {
        self.strategy.as_ref()
    }

    pub fn ledger(&self) -> &PaperLedger {
        &self.ledger
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn window(&self) -> &PriceWindow {
        &self.window
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use common::OrderSide;
    use strategy::MovingAverageStrategy;

    use crate::replay::ReplayFeed;

    struct FailingFeed;

    #[async_trait]
    impl PriceFeed for FailingFeed {
        async fn latest_price(&self, _symbol: &str) -> Result<Option<f64>> {
            Err(Error::Http("connection refused".into()))
        }
    }

    fn make_loop(feed: Arc<dyn PriceFeed>, balance: f64) -> TradingLoop {
        let strategy = MovingAverageStrategy::new(3, 5).unwrap();
        TradingLoop::new(Box::new(strategy), PaperLedger::new(balance), feed, "AAPL")
    }

    async fn run_all(trading: &mut TradingLoop, n: usize) -> Vec<CycleReport> {
        let mut reports = Vec::with_capacity(n);
        for _ in 0..n {
            reports.push(trading.run_cycle().await);
        }
        reports
    }

    #[tokio::test]
    async fn flat_prices_hold_without_trading() {
        let feed = Arc::new(ReplayFeed::from_prices([10.0; 5]));
        let mut trading = make_loop(feed, 10_000.0);

        let reports = run_all(&mut trading, 5).await;

        assert!(reports.iter().all(|r| r.outcome == CycleOutcome::Hold));
        assert_eq!(reports[4].signal, Some(Signal::Hold));
        assert!(trading.window().is_full());
        assert_eq!(trading.ledger().balance(), 10_000.0);
    }

    #[tokio::test]
    async fn upturn_buys_one_unit_at_latest_price() {
        let feed = Arc::new(ReplayFeed::from_prices([1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 10.0]));
        let mut trading = make_loop(feed, 10_000.0);

        let reports = run_all(&mut trading, 7).await;

        for r in &reports[..6] {
            assert_eq!(r.outcome, CycleOutcome::Hold, "cycle {}", r.cycle);
        }
        let last = &reports[6];
        assert_eq!(last.cycle, 7);
        assert_eq!(last.signal, Some(Signal::Buy));
        match &last.outcome {
            CycleOutcome::Filled(fill) => {
                assert_eq!(fill.trade.side(), OrderSide::Buy);
                assert_eq!(fill.trade.quantity(), 1.0);
                assert_eq!(fill.trade.strategy_name(), MovingAverageStrategy::DEFAULT_NAME);
                assert_eq!(fill.price, 10.0);
            }
            other => panic!("Expected Filled, got {other:?}"),
        }
        assert_eq!(last.balance, 9_990.0);
        assert_eq!(trading.window().as_slice(), &[1.0, 1.0, 1.0, 1.0, 10.0]);
    }

    #[tokio::test]
    async fn downturn_sells_and_credits_balance() {
        let feed = Arc::new(ReplayFeed::from_prices([10.0, 10.0, 10.0, 10.0, 4.0]));
        let mut trading = make_loop(feed, 100.0);

        let reports = run_all(&mut trading, 5).await;

        let last = reports.last().unwrap();
        assert_eq!(last.signal, Some(Signal::Sell));
        assert!(matches!(last.outcome, CycleOutcome::Filled(_)));
        assert_eq!(last.balance, 104.0);
    }

    #[tokio::test]
    async fn unaffordable_buy_is_rejected_and_loop_continues() {
        let feed = Arc::new(ReplayFeed::from_prices([1.0, 1.0, 1.0, 1.0, 10.0, 20.0]));
        let mut trading = make_loop(feed, 5.0);

        let reports = run_all(&mut trading, 6).await;

        for r in &reports[4..] {
            assert_eq!(r.signal, Some(Signal::Buy));
            match &r.outcome {
                CycleOutcome::Rejected { trade, reason } => {
                    assert_eq!(trade.side(), OrderSide::Buy);
                    assert!(matches!(reason, RejectionReason::InsufficientFunds { .. }));
                }
                other => panic!("Expected Rejected, got {other:?}"),
            }
            assert_eq!(r.balance, 5.0);
        }
        assert_eq!(trading.cycles(), 6);
    }

    #[tokio::test]
    async fn missing_price_skips_cycle_without_touching_state() {
        let feed = Arc::new(ReplayFeed::new([Some(1.0), None, Some(2.0)]));
        let mut trading = make_loop(feed, 50.0);

        let reports = run_all(&mut trading, 3).await;

        assert_eq!(reports[1].outcome, CycleOutcome::NoData);
        assert_eq!(reports[1].price, None);
        assert_eq!(reports[1].signal, None);
        assert_eq!(reports[1].balance, 50.0);
        assert_eq!(trading.window().as_slice(), &[1.0, 2.0]);
    }

    #[tokio::test]
    async fn feed_errors_count_as_no_data() {
        let mut trading = make_loop(Arc::new(FailingFeed), 50.0);

        let report = trading.run_cycle().await;

        assert_eq!(report.outcome, CycleOutcome::NoData);
        assert!(trading.window().is_empty());
        assert_eq!(trading.ledger().balance(), 50.0);
    }

    #[tokio::test]
    async fn non_positive_prices_are_discarded() {
        let feed = Arc::new(ReplayFeed::new([Some(0.0), Some(-3.0), Some(f64::NAN)]));
        let mut trading = make_loop(feed, 50.0);

        let reports = run_all(&mut trading, 3).await;

        assert!(reports.iter().all(|r| r.outcome == CycleOutcome::NoData));
        assert!(trading.window().is_empty());
    }

    #[tokio::test]
    async fn window_never_exceeds_long_window() {
        let feed = Arc::new(ReplayFeed::from_prices((1..=20).map(f64::from)));
        let mut trading = make_loop(feed, 1_000_000.0);

        for _ in 0..20 {
            trading.run_cycle().await;
            assert!(trading.window().len() <= 5);
        }
        assert_eq!(trading.window().as_slice(), &[16.0, 17.0, 18.0, 19.0, 20.0]);
    }

    #[tokio::test]
    async fn configured_quantity_is_used_for_trades() {
        let feed = Arc::new(ReplayFeed::from_prices([10.0, 10.0, 10.0, 10.0, 4.0]));
        let mut trading = make_loop(feed, 0.0).with_quantity(2.5).unwrap();

        let report = run_all(&mut trading, 5).await.pop().unwrap();

        match report.outcome {
            CycleOutcome::Filled(fill) => assert_eq!(fill.trade.quantity(), 2.5),
            other => panic!("Expected Filled, got {other:?}"),
        }
        assert_eq!(report.balance, 10.0);
    }

    #[test]
    fn invalid_quantities_are_refused_up_front() {
        for bad in [0.0, -3.0, f64::NAN, f64::INFINITY] {
            let feed = Arc::new(ReplayFeed::from_prices([1.0]));
            let result = make_loop(feed, 5.0).with_quantity(bad);
            assert!(
                matches!(result, Err(Error::Config(_))),
                "quantity {bad} should be refused"
            );
        }
    }
}
