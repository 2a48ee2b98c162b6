//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seeded with the first close, then EMA[i] = EMA[i-1] + k*(C[i] - EMA[i-1]).
//! No warmup: every bar is defined.

use crate::domain::indicator::{ema_alpha, IndicatorSeries, IndicatorType};

pub fn calculate_ema(closes: &[f64], period: usize) -> IndicatorSeries {
    if period == 0 {
        return IndicatorSeries::undefined(IndicatorType::Ema(period), closes.len());
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Ema(period),
        values: ema_values(closes, period).into_iter().map(Some).collect(),
    }
}

/// Raw EMA recurrence over `values`. Caller guarantees `period > 0`.
pub(crate) fn ema_values(values: &[f64], period: usize) -> Vec<f64> {
    let k = ema_alpha(period);
    let mut out = Vec::with_capacity(values.len());
    let mut ema = 0.0;

    for (i, &value) in values.iter().enumerate() {
        ema = if i == 0 {
            value
        } else {
            ema + k * (value - ema)
        };
        out.push(ema);
    }

    out
}
