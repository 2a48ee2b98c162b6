//! Price data access port trait.

use crate::domain::error::SignalError;
use crate::domain::price::PriceSeries;
use chrono::Duration;

pub trait PriceSource {
    /// The newest `count` closes for `symbol`, oldest first.
    fn fetch_latest(&self, symbol: &str, count: usize) -> Result<PriceSeries, SignalError>;

    /// All closes within `lookback` of the newest available bar.
    fn fetch_since(&self, symbol: &str, lookback: Duration) -> Result<PriceSeries, SignalError>;
}
