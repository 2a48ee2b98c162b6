//! Close-price series supplied by a price source.

use chrono::NaiveDateTime;

/// A single close observation. The timestamp is optional: live snapshots
/// may arrive as bare closes, backtest history is always timestamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBar {
    pub time: Option<NaiveDateTime>,
    pub close: f64,
}

/// Chronologically ordered closes; insertion order is time order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    pub bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(bars: Vec<PriceBar>) -> Self {
        Self { bars }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.bars.last().map(|b| b.close)
    }

    pub fn time_at(&self, index: usize) -> Option<NaiveDateTime> {
        self.bars.get(index).and_then(|b| b.time)
    }

    pub fn last_time(&self) -> Option<NaiveDateTime> {
        self.bars.last().and_then(|b| b.time)
    }
}
