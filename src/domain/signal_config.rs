//! Signal engine parameters.
//!
//! Built once at startup (see `cli::build_signal_config`) and passed by
//! reference into every engine call; nothing in the engine reads global state.

use crate::domain::indicator::macd::{DEFAULT_FAST, DEFAULT_SIGNAL, DEFAULT_SLOW};

#[derive(Debug, Clone, PartialEq)]
pub struct SignalConfig {
    /// Window of the short SMA and span of the short EMA.
    pub short_period: usize,
    /// Window of the long SMA and span of the long EMA.
    pub long_period: usize,
    pub rsi_period: usize,
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub atr_period: usize,
    /// Both |SMA short - long| and |EMA short - long| must exceed this.
    pub min_divergence: f64,
    pub risk: RiskConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RiskConfig {
    pub base_tp_pips: u32,
    pub base_sl_pips: u32,
    pub tp_atr_multiplier: f64,
    pub sl_atr_multiplier: f64,
    /// Pips per unit of price.
    pub pip_scale: f64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            short_period: 10,
            long_period: 20,
            rsi_period: 14,
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            macd_fast: DEFAULT_FAST,
            macd_slow: DEFAULT_SLOW,
            macd_signal: DEFAULT_SIGNAL,
            atr_period: 14,
            min_divergence: 0.1,
            risk: RiskConfig::default(),
        }
    }
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            base_tp_pips: 50,
            base_sl_pips: 30,
            tp_atr_multiplier: 2.0,
            sl_atr_multiplier: 1.0,
            pip_scale: 10.0,
        }
    }
}

impl SignalConfig {
    /// Bars before both moving averages are defined.
    pub fn warmup_bars(&self) -> usize {
        self.short_period.max(self.long_period)
    }

    /// Bars needed before a snapshot is evaluated: the full long window, and
    /// at least two rows to compare for a crossover.
    pub fn required_bars(&self) -> usize {
        self.warmup_bars().max(2)
    }
}
