use std::cmp::Ordering;

use common::{Error, Result, Signal};

use crate::indicators::Sma;
use crate::Strategy;

/// Compares a short and a long simple moving average over the tail of the
/// price history.
///
/// Short above long → `Buy`, short below long → `Sell`, equal or not enough
/// history → `Hold`.
#[derive(Debug, Clone)]
pub struct MovingAverageStrategy {
    name: String,
    short: Sma,
    long: Sma,
}

impl MovingAverageStrategy {
    pub const DEFAULT_NAME: &'static str = "Simple Moving Average Strategy";

    /// Build the strategy, rejecting windows that could never produce a
    /// meaningful comparison.
    pub fn new(short_window: usize, long_window: usize) -> Result<Self> {
        if short_window == 0 || long_window == 0 {
            return Err(Error::InvalidStrategy(format!(
                "windows must be positive (short={short_window}, long={long_window})"
            )));
        }
        if short_window >= long_window {
            return Err(Error::InvalidStrategy(format!(
                "short window ({short_window}) must be less than long window ({long_window})"
            )));
        }
        Ok(Self {
            name: Self::DEFAULT_NAME.to_string(),
            short: Sma::new(short_window),
            long: Sma::new(long_window),
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn short_window(&self) -> usize {
        self.short.period
    }

    pub fn long_window(&self) -> usize {
        self.long.period
    }
}

impl Strategy for MovingAverageStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn required_history(&self) -> usize {
        self.long.period
    }

    fn generate_signal(&self, prices: &[f64]) -> Signal {
        let (Some(short_avg), Some(long_avg)) =
            (self.short.compute(prices), self.long.compute(prices))
        else {
            return Signal::Hold;
        };

        match short_avg.partial_cmp(&long_avg) {
            Some(Ordering::Greater) => Signal::Buy,
            Some(Ordering::Less) => Signal::Sell,
            // Equal, or a NaN slipped into the window
            _ => Signal::Hold,
        }
    }
}
