pub mod config;
pub mod indicators;
pub mod moving_average;
pub mod registry;

pub use config::{StrategyConfig, StrategyFileConfig};
pub use moving_average::MovingAverageStrategy;
pub use registry::build_strategy;

use common::Signal;

/// All strategy implementations must satisfy this trait.
pub trait Strategy: Send + Sync {
    /// Human-readable name of this strategy instance.
    fn name(&self) -> &str;

    /// Number of most recent prices the strategy looks at. The trading loop
    /// sizes its rolling price window to this, so it must be at least 1.
    fn required_history(&self) -> usize;

    /// Derive a signal from a price history (oldest first).
    ///
    /// Must be a pure function of `prices` and the strategy's fixed
    /// parameters. A history too short to evaluate yields `Signal::Hold`.
    fn generate_signal(&self, prices: &[f64]) -> Signal;
}
