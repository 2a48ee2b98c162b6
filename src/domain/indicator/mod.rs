//! Technical indicator pipeline.
//!
//! This module provides types for representing indicator values and series:
//! - `IndicatorType`: indicator identity + parameters
//! - `IndicatorSeries`: one indicator column aligned with the price series
//! - `IndicatorRow` / `IndicatorFrame`: the per-bar tuple the rule evaluator reads
//!
//! Undefined values (warm-up bars, degenerate windows) are `None`, never a
//! float sentinel.

pub mod atr;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod stream;

pub use atr::calculate_atr;
pub use ema::calculate_ema;
pub use macd::{calculate_macd, MacdSeries};
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;

use crate::domain::signal_config::SignalConfig;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
    Atr(usize),
    Macd {
        fast: usize,
        slow: usize,
    },
    MacdSignal {
        fast: usize,
        slow: usize,
        signal: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<Option<f64>>,
}

impl IndicatorSeries {
    /// A column of the given length with every value undefined.
    pub fn undefined(indicator_type: IndicatorType, len: usize) -> Self {
        Self {
            indicator_type,
            values: vec![None; len],
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Atr(period) => write!(f, "ATR({})", period),
            IndicatorType::Macd { fast, slow } => write!(f, "MACD({},{})", fast, slow),
            IndicatorType::MacdSignal { fast, slow, signal } => {
                write!(f, "MACD_SIGNAL({},{},{})", fast, slow, signal)
            }
        }
    }
}

/// One bar of aligned indicator output.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IndicatorRow {
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
    pub ema_short: Option<f64>,
    pub ema_long: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub atr: Option<f64>,
}

impl IndicatorRow {
    pub fn sma_diff(&self) -> Option<f64> {
        Some(self.sma_short? - self.sma_long?)
    }

    pub fn ema_diff(&self) -> Option<f64> {
        Some(self.ema_short? - self.ema_long?)
    }
}

/// Indicator output for one price snapshot, one row per input bar.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorFrame {
    pub rows: Vec<IndicatorRow>,
}

impl IndicatorFrame {
    pub fn last(&self) -> Option<&IndicatorRow> {
        self.rows.last()
    }

    /// The `(t-1, t)` pair the rule evaluator consults.
    pub fn last_two(&self) -> Option<(&IndicatorRow, &IndicatorRow)> {
        match self.rows.as_slice() {
            [.., prev, curr] => Some((prev, curr)),
            _ => None,
        }
    }
}

/// Compute every indicator the rule evaluator needs over `closes`.
pub fn compute_frame(closes: &[f64], config: &SignalConfig) -> IndicatorFrame {
    let sma_short = calculate_sma(closes, config.short_period);
    let sma_long = calculate_sma(closes, config.long_period);
    let ema_short = calculate_ema(closes, config.short_period);
    let ema_long = calculate_ema(closes, config.long_period);
    let rsi = calculate_rsi(closes, config.rsi_period);
    let macd = calculate_macd(closes, config.macd_fast, config.macd_slow, config.macd_signal);
    let atr = calculate_atr(closes, config.atr_period);

    let rows = (0..closes.len())
        .map(|i| IndicatorRow {
            sma_short: sma_short.values[i],
            sma_long: sma_long.values[i],
            ema_short: ema_short.values[i],
            ema_long: ema_long.values[i],
            rsi: rsi.values[i],
            macd: macd.line.values[i],
            macd_signal: macd.signal.values[i],
            atr: atr.values[i],
        })
        .collect();

    IndicatorFrame { rows }
}

/// Arithmetic mean of a full window. Shared by the batch indicators and
/// [`stream::IndicatorState`] so both sum in the same order.
pub(crate) fn window_mean<I: Iterator<Item = f64>>(window: I, period: usize) -> f64 {
    window.sum::<f64>() / period as f64
}

/// EMA smoothing factor for span `period`.
pub(crate) fn ema_alpha(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}
