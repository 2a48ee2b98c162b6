//! Human-readable signal reports.

use crate::domain::risk::price_levels;
use crate::domain::signal::{Rationale, SignalSide, TradeSignal};
use crate::domain::signal_config::RiskConfig;
use rand::Rng;
use std::fmt;

/// The fields a notification carries for one signal.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalReport {
    pub side: SignalSide,
    pub entry_price: f64,
    pub take_profit: f64,
    pub stop_loss: f64,
    pub timeframe: String,
    pub rationale: Vec<Rationale>,
}

impl SignalReport {
    pub fn from_signal(signal: &TradeSignal, timeframe: &str) -> Self {
        Self {
            side: signal.side,
            entry_price: signal.entry_price,
            take_profit: signal.risk.take_profit,
            stop_loss: signal.risk.stop_loss,
            timeframe: timeframe.to_string(),
            rationale: signal.rationale.clone(),
        }
    }
}

impl fmt::Display for SignalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Signal: {}", self.side)?;
        writeln!(f, "Entry: {:.2}", self.entry_price)?;
        writeln!(f, "Take-Profit (TP): {:.2}", self.take_profit)?;
        writeln!(f, "Stop-Loss (SL): {:.2}", self.stop_loss)?;
        writeln!(f, "Timeframe: {}", self.timeframe)?;
        write!(f, "Rationale:")?;
        for reason in &self.rationale {
            write!(f, "\n- {}", reason)?;
        }
        Ok(())
    }
}

/// A synthetic report for exercising the notification path: random entry
/// in [2500, 2550), random side, base TP/SL distances.
pub fn demo_report<R: Rng + ?Sized>(rng: &mut R, risk: &RiskConfig, timeframe: &str) -> SignalReport {
    let entry_price = rng.gen_range(2500.0..2550.0);
    let side = if rng.gen_bool(0.5) {
        SignalSide::Buy
    } else {
        SignalSide::Sell
    };
    let levels = price_levels(
        side,
        entry_price,
        risk.base_tp_pips,
        risk.base_sl_pips,
        risk.pip_scale,
    );

    SignalReport {
        side,
        entry_price,
        take_profit: levels.take_profit,
        stop_loss: levels.stop_loss,
        timeframe: timeframe.to_string(),
        rationale: vec![Rationale::Demo],
    }
}
