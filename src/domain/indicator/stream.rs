//! Incremental indicator state.
//!
//! `IndicatorState::push` yields, bar by bar, exactly the rows that
//! [`compute_frame`](super::compute_frame) produces for the whole series:
//! windows are summed oldest-first over the same values and the EMA
//! recurrences use the same expressions, so the results are bit-identical.

use crate::domain::indicator::atr::close_true_range;
use crate::domain::indicator::rsi::{bar_move, rsi_from_averages};
use crate::domain::indicator::{ema_alpha, window_mean, IndicatorRow};
use crate::domain::signal_config::SignalConfig;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct IndicatorState {
    short_period: usize,
    long_period: usize,
    rsi_period: usize,
    atr_period: usize,
    macd_fast: usize,
    macd_slow: usize,
    macd_signal: usize,
    closes: VecDeque<f64>,
    gains: VecDeque<f64>,
    losses: VecDeque<f64>,
    ranges: VecDeque<f64>,
    prev_close: Option<f64>,
    ema_short: Option<f64>,
    ema_long: Option<f64>,
    ema_fast: Option<f64>,
    ema_slow: Option<f64>,
    signal_ema: Option<f64>,
    bars: usize,
}

impl IndicatorState {
    pub fn new(config: &SignalConfig) -> Self {
        Self {
            short_period: config.short_period,
            long_period: config.long_period,
            rsi_period: config.rsi_period,
            atr_period: config.atr_period,
            macd_fast: config.macd_fast,
            macd_slow: config.macd_slow,
            macd_signal: config.macd_signal,
            closes: VecDeque::new(),
            gains: VecDeque::new(),
            losses: VecDeque::new(),
            ranges: VecDeque::new(),
            prev_close: None,
            ema_short: None,
            ema_long: None,
            ema_fast: None,
            ema_slow: None,
            signal_ema: None,
            bars: 0,
        }
    }

    /// Number of bars pushed so far.
    pub fn bars(&self) -> usize {
        self.bars
    }

    pub fn push(&mut self, close: f64) -> IndicatorRow {
        let (gain, loss, range) = match self.prev_close {
            None => (0.0, 0.0, 0.0),
            Some(prev) => {
                let (gain, loss) = bar_move(prev, close);
                (gain, loss, close_true_range(prev, close))
            }
        };

        push_window(
            &mut self.closes,
            close,
            self.short_period.max(self.long_period),
        );
        push_window(&mut self.gains, gain, self.rsi_period);
        push_window(&mut self.losses, loss, self.rsi_period);
        push_window(&mut self.ranges, range, self.atr_period);
        self.prev_close = Some(close);
        self.bars += 1;

        self.ema_short = ema_step(self.ema_short, close, self.short_period);
        self.ema_long = ema_step(self.ema_long, close, self.long_period);

        let (macd, macd_signal) = self.step_macd(close);

        let rsi = match (
            tail_mean(&self.gains, self.rsi_period),
            tail_mean(&self.losses, self.rsi_period),
        ) {
            (Some(gain), Some(loss)) => rsi_from_averages(gain, loss),
            _ => None,
        };

        IndicatorRow {
            sma_short: tail_mean(&self.closes, self.short_period),
            sma_long: tail_mean(&self.closes, self.long_period),
            ema_short: self.ema_short,
            ema_long: self.ema_long,
            rsi,
            macd,
            macd_signal,
            atr: tail_mean(&self.ranges, self.atr_period),
        }
    }

    fn step_macd(&mut self, close: f64) -> (Option<f64>, Option<f64>) {
        if self.macd_fast == 0 || self.macd_slow == 0 || self.macd_signal == 0 {
            return (None, None);
        }
        self.ema_fast = ema_step(self.ema_fast, close, self.macd_fast);
        self.ema_slow = ema_step(self.ema_slow, close, self.macd_slow);

        let line = match (self.ema_fast, self.ema_slow) {
            (Some(fast), Some(slow)) => fast - slow,
            _ => return (None, None),
        };
        self.signal_ema = ema_step(self.signal_ema, line, self.macd_signal);
        (Some(line), self.signal_ema)
    }
}

fn push_window(window: &mut VecDeque<f64>, value: f64, capacity: usize) {
    if capacity == 0 {
        return;
    }
    if window.len() == capacity {
        window.pop_front();
    }
    window.push_back(value);
}

/// Mean of the newest `period` values, `None` until that many exist.
fn tail_mean(window: &VecDeque<f64>, period: usize) -> Option<f64> {
    if period == 0 || window.len() < period {
        return None;
    }
    let skip = window.len() - period;
    Some(window_mean(window.iter().skip(skip).copied(), period))
}

fn ema_step(prev: Option<f64>, value: f64, period: usize) -> Option<f64> {
    if period == 0 {
        return None;
    }
    let k = ema_alpha(period);
    Some(match prev {
        None => value,
        Some(ema) => ema + k * (value - ema),
    })
}
