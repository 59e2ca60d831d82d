use tracing::{debug, info, warn};

use common::{Error, Fill, OrderSide, RejectionReason, Result, Trade};

/// Simulated brokerage account for paper trading.
///
/// Holds a single cash balance. Buys are only booked when the balance covers
/// `quantity × price`; sells always succeed and no position inventory is
/// tracked, so selling without a prior buy is allowed.
#[derive(Debug, Clone)]
pub struct PaperLedger {
    starting_balance: f64,
    balance: f64,
}

impl PaperLedger {
    pub fn new(initial_balance: f64) -> Self {
        info!(balance = initial_balance, "PaperLedger initialized");
        Self {
            starting_balance: initial_balance,
            balance: initial_balance,
        }
    }

    /// Book a trade at `price`.
    ///
    /// An unaffordable buy, or a non-positive / non-finite quantity or price,
    /// returns `Error::OrderRejected` and leaves the balance untouched. The
    /// caller decides whether to carry on.
    pub fn apply(&mut self, trade: Trade, price: f64) -> Result<Fill> {
        let notional = trade.notional(price);

        if !Trade::is_valid_quantity(trade.quantity()) || !(price.is_finite() && price > 0.0) {
            let reason = RejectionReason::InvalidAmount {
                quantity: trade.quantity(),
                price,
            };
            warn!(trade_id = %trade.id(), %reason, "Paper order rejected");
            return Err(Error::OrderRejected { reason });
        }

        match trade.side() {
            OrderSide::Buy => {
                // Written so a NaN balance cannot buy
                if !(self.balance >= notional) {
                    let reason = RejectionReason::InsufficientFunds {
                        required: notional,
                        available: self.balance,
                    };
                    warn!(
                        trade_id = %trade.id(),
                        price,
                        qty = trade.quantity(),
                        %reason,
                        "Paper buy rejected"
                    );
                    return Err(Error::OrderRejected { reason });
                }
                self.balance -= notional;
            }
            OrderSide::Sell => {
                self.balance += notional;
            }
        }

        debug!(
            trade_id = %trade.id(),
            side = %trade.side(),
            price,
            qty = trade.quantity(),
            balance = self.balance,
            "Paper fill booked"
        );

        Ok(Fill {
            trade,
            price,
            notional,
            balance_after: self.balance,
        })
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn starting_balance(&self) -> f64 {
        self.starting_balance
    }

    /// Cash gained or lost since the ledger was opened.
    pub fn pnl(&self) -> f64 {
        self.balance - self.starting_balance
    }
}
