//! RSI (Relative Strength Index) indicator implementation.
//!
//! Average gain/loss are simple n-bar means of the per-bar moves. The first
//! bar has no predecessor and counts as a zero move, so RSI(n) is defined
//! from bar n-1.
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0 and avg_gain > 0: RSI = 100
//! If both averages are 0 the window never moved and RSI is undefined.

use crate::domain::indicator::sma::rolling_mean;
use crate::domain::indicator::{IndicatorSeries, IndicatorType};

pub fn calculate_rsi(closes: &[f64], period: usize) -> IndicatorSeries {
    if period == 0 {
        return IndicatorSeries::undefined(IndicatorType::Rsi(period), closes.len());
    }

    let (gains, losses) = price_moves(closes);
    let avg_gains = rolling_mean(&gains, period);
    let avg_losses = rolling_mean(&losses, period);

    let values = avg_gains
        .into_iter()
        .zip(avg_losses)
        .map(|(gain, loss)| rsi_from_averages(gain?, loss?))
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values,
    }
}

/// Per-bar upward and downward moves, zero for the first bar.
pub(crate) fn price_moves(closes: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let mut gains = Vec::with_capacity(closes.len());
    let mut losses = Vec::with_capacity(closes.len());

    for (i, &close) in closes.iter().enumerate() {
        let (gain, loss) = if i == 0 {
            (0.0, 0.0)
        } else {
            bar_move(closes[i - 1], close)
        };
        gains.push(gain);
        losses.push(loss);
    }

    (gains, losses)
}

pub(crate) fn bar_move(prev_close: f64, close: f64) -> (f64, f64) {
    let change = close - prev_close;
    if change > 0.0 {
        (change, 0.0)
    } else if change < 0.0 {
        (0.0, -change)
    } else {
        (0.0, 0.0)
    }
}

pub(crate) fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if avg_loss == 0.0 {
        if avg_gain > 0.0 { Some(100.0) } else { None }
    } else {
        Some(100.0 - (100.0 / (1.0 + avg_gain / avg_loss)))
    }
}
