pub mod rest;

pub use rest::BinancePriceFeed;
