pub mod binance;
pub mod replay;
pub mod trading_loop;
pub mod window;

pub use binance::BinancePriceFeed;
pub use replay::ReplayFeed;
pub use trading_loop::{CycleOutcome, CycleReport, TradingLoop};
pub use window::PriceWindow;
