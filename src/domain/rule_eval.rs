//! Rule evaluation over the last two indicator rows.
//!
//! # Evaluation Semantics
//!
//! - Crossovers compare bar `t-1` with bar `t` and only detect upward crosses:
//!   `left[t-1] <= right[t-1] && left[t] > right[t]`
//! - Any comparison touching an undefined value is `false`
//! - BUY: trend crossover (SMA or EMA) + RSI oversold + MACD crossover + divergence
//! - SELL: the same upward crossovers + RSI overbought + divergence
//! - BUY is checked first; nothing else matches -> no signal

use crate::domain::indicator::IndicatorRow;
use crate::domain::risk::size_risk;
use crate::domain::signal::{Decision, NoSignalReason, Rationale, SignalSide, TradeSignal};
use crate::domain::signal_config::SignalConfig;
use tracing::debug;

/// The independent boolean conditions behind a decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConditionSet {
    pub sma_crossover: bool,
    pub ema_crossover: bool,
    pub rsi_oversold: bool,
    pub rsi_overbought: bool,
    pub macd_crossover: bool,
    pub min_divergence: bool,
}

impl ConditionSet {
    pub fn trend_crossover(&self) -> bool {
        self.sma_crossover || self.ema_crossover
    }

    /// Side selected by the decision rule, if any.
    pub fn side(&self) -> Option<SignalSide> {
        let confirmed = self.trend_crossover() && self.macd_crossover && self.min_divergence;
        if confirmed && self.rsi_oversold {
            Some(SignalSide::Buy)
        } else if confirmed && self.rsi_overbought {
            Some(SignalSide::Sell)
        } else {
            None
        }
    }
}

/// `left` moved from at-or-below `right` to strictly above it.
pub fn crossed_above(
    prev_left: Option<f64>,
    prev_right: Option<f64>,
    curr_left: Option<f64>,
    curr_right: Option<f64>,
) -> bool {
    match (prev_left, prev_right, curr_left, curr_right) {
        (Some(pl), Some(pr), Some(cl), Some(cr)) => pl <= pr && cl > cr,
        _ => false,
    }
}

pub fn evaluate_conditions(
    prev: &IndicatorRow,
    curr: &IndicatorRow,
    config: &SignalConfig,
) -> ConditionSet {
    let divergence = |diff: Option<f64>| diff.is_some_and(|d| d.abs() > config.min_divergence);

    ConditionSet {
        sma_crossover: crossed_above(prev.sma_short, prev.sma_long, curr.sma_short, curr.sma_long),
        ema_crossover: crossed_above(prev.ema_short, prev.ema_long, curr.ema_short, curr.ema_long),
        rsi_oversold: curr.rsi.is_some_and(|rsi| rsi < config.rsi_oversold),
        rsi_overbought: curr.rsi.is_some_and(|rsi| rsi > config.rsi_overbought),
        macd_crossover: crossed_above(prev.macd, prev.macd_signal, curr.macd, curr.macd_signal),
        min_divergence: divergence(curr.sma_diff()) && divergence(curr.ema_diff()),
    }
}

/// Classify the `(t-1, t)` row pair. `last_close` is the entry price.
pub fn evaluate(
    prev: &IndicatorRow,
    curr: &IndicatorRow,
    last_close: f64,
    config: &SignalConfig,
) -> Decision {
    let conditions = evaluate_conditions(prev, curr, config);

    debug!(
        sma_crossover = conditions.sma_crossover,
        ema_crossover = conditions.ema_crossover,
        rsi_oversold = conditions.rsi_oversold,
        rsi_overbought = conditions.rsi_overbought,
        macd_crossover = conditions.macd_crossover,
        min_divergence = conditions.min_divergence,
        rsi = ?curr.rsi,
        sma_diff = ?curr.sma_diff(),
        ema_diff = ?curr.ema_diff(),
        "evaluated signal conditions"
    );

    let (Some(side), Some(rsi), Some(sma_diff), Some(ema_diff)) =
        (conditions.side(), curr.rsi, curr.sma_diff(), curr.ema_diff())
    else {
        debug!("no signal: conditions not met");
        return Decision::NoSignal(NoSignalReason::ConditionsNotMet(conditions));
    };

    let mut rationale = Vec::with_capacity(5);
    if conditions.sma_crossover {
        rationale.push(Rationale::SmaCrossover);
    }
    if conditions.ema_crossover {
        rationale.push(Rationale::EmaCrossover);
    }
    rationale.push(match side {
        SignalSide::Buy => Rationale::RsiOversold(rsi),
        SignalSide::Sell => Rationale::RsiOverbought(rsi),
    });
    rationale.push(Rationale::MacdCrossover);
    rationale.push(Rationale::SmaDivergence(sma_diff));
    rationale.push(Rationale::EmaDivergence(ema_diff));

    Decision::Signal(TradeSignal {
        side,
        entry_price: last_close,
        sma_diff,
        ema_diff,
        rsi,
        risk: size_risk(side, last_close, curr.atr, &config.risk),
        rationale,
        conditions,
    })
}
