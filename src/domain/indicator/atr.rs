//! Average True Range from close prices only.
//!
//! Without an intrabar high/low feed, high = low = close and the three
//! true-range components collapse to |C[i] - C[i-1]|. The first bar has no
//! previous close and contributes 0. ATR(n) is the n-bar simple mean of the
//! true range, so it reads lower than an intrabar ATR would.
//! Warmup: first (n-1) bars are undefined.

use crate::domain::indicator::sma::rolling_mean;
use crate::domain::indicator::{IndicatorSeries, IndicatorType};

pub fn calculate_atr(closes: &[f64], period: usize) -> IndicatorSeries {
    IndicatorSeries {
        indicator_type: IndicatorType::Atr(period),
        values: rolling_mean(&true_ranges(closes), period),
    }
}

pub(crate) fn true_ranges(closes: &[f64]) -> Vec<f64> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| if i == 0 { 0.0 } else { close_true_range(closes[i - 1], close) })
        .collect()
}

/// max(high - low, |high - prev_close|, |low - prev_close|) with high = low = close.
pub(crate) fn close_true_range(prev_close: f64, close: f64) -> f64 {
    (close - prev_close).abs()
}
