//! Volatility-based take-profit / stop-loss sizing.
//!
//! Distances are whole pips: `max(base, trunc(atr * multiplier * pip_scale))`.
//! The base distance is a floor, so a quiet market never produces a
//! degenerately tight pair. Prices are `entry ± pips / pip_scale`.

use crate::domain::signal::SignalSide;
use crate::domain::signal_config::RiskConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskLevels {
    pub tp_pips: u32,
    pub sl_pips: u32,
    pub take_profit: f64,
    pub stop_loss: f64,
}

/// TP/SL distances in pips for the latest ATR. An undefined ATR (not enough
/// bars for the ATR window) sizes at the base distances.
pub fn risk_distances(atr: Option<f64>, risk: &RiskConfig) -> (u32, u32) {
    let atr = atr.unwrap_or(0.0);
    let tp = atr_pips(atr, risk.tp_atr_multiplier, risk.pip_scale);
    let sl = atr_pips(atr, risk.sl_atr_multiplier, risk.pip_scale);
    (tp.max(risk.base_tp_pips), sl.max(risk.base_sl_pips))
}

// `as u32` truncates toward zero and saturates; NaN and negatives become 0.
fn atr_pips(atr: f64, multiplier: f64, pip_scale: f64) -> u32 {
    (atr * multiplier * pip_scale) as u32
}

/// Price levels for `side` entered at `entry`.
pub fn price_levels(
    side: SignalSide,
    entry: f64,
    tp_pips: u32,
    sl_pips: u32,
    pip_scale: f64,
) -> RiskLevels {
    let tp_offset = tp_pips as f64 / pip_scale;
    let sl_offset = sl_pips as f64 / pip_scale;
    let (take_profit, stop_loss) = match side {
        SignalSide::Buy => (entry + tp_offset, entry - sl_offset),
        SignalSide::Sell => (entry - tp_offset, entry + sl_offset),
    };

    RiskLevels {
        tp_pips,
        sl_pips,
        take_profit,
        stop_loss,
    }
}

pub fn size_risk(side: SignalSide, entry: f64, atr: Option<f64>, risk: &RiskConfig) -> RiskLevels {
    let (tp_pips, sl_pips) = risk_distances(atr, risk);
    price_levels(side, entry, tp_pips, sl_pips, risk.pip_scale)
}
