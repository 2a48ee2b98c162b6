//! Simple Moving Average indicator.
//!
//! SMA(n)[i] = mean(C[i-n+1..=i]).
//! Warmup: first (n-1) bars are undefined.

use crate::domain::indicator::{window_mean, IndicatorSeries, IndicatorType};

pub fn calculate_sma(closes: &[f64], period: usize) -> IndicatorSeries {
    IndicatorSeries {
        indicator_type: IndicatorType::Sma(period),
        values: rolling_mean(closes, period),
    }
}

/// Rolling mean over `period` values, `None` until a full window exists.
/// Also used for the RSI gain/loss averages and the ATR.
pub(crate) fn rolling_mean(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; values.len()];
    }

    (0..values.len())
        .map(|i| {
            if i + 1 < period {
                None
            } else {
                Some(window_mean(values[i + 1 - period..=i].iter().copied(), period))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sma_warmup() {
        let series = calculate_sma(&[10.0, 20.0, 30.0, 40.0, 50.0], 3);

        assert_eq!(series.values[0], None);
        assert_eq!(series.values[1], None);
        assert!(series.values[2].is_some());
        assert!(series.values[4].is_some());
    }

    #[test]
    fn sma_values() {
        let series = calculate_sma(&[10.0, 20.0, 30.0, 40.0, 50.0], 3);

        assert_relative_eq!(series.values[2].unwrap(), 20.0);
        assert_relative_eq!(series.values[3].unwrap(), 30.0);
        assert_relative_eq!(series.values[4].unwrap(), 40.0);
    }

    #[test]
    fn sma_period_1_is_identity() {
        let closes = [3.0, 1.0, 4.0, 1.5];
        let series = calculate_sma(&closes, 1);
        let values: Vec<f64> = series.values.iter().map(|v| v.unwrap()).collect();
        assert_eq!(values, closes.to_vec());
    }

    #[test]
    fn sma_longer_than_input_is_all_undefined() {
        let series = calculate_sma(&[1.0, 2.0], 5);
        assert_eq!(series.values, vec![None, None]);
    }

    #[test]
    fn sma_period_0() {
        let series = calculate_sma(&[1.0, 2.0, 3.0], 0);
        assert_eq!(series.values, vec![None, None, None]);
    }

    #[test]
    fn sma_indicator_type() {
        assert_eq!(calculate_sma(&[], 20).indicator_type, IndicatorType::Sma(20));
    }
}
