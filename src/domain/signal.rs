//! Trade decisions and the engine entry points.
//!
//! [`generate_signal`] evaluates one price snapshot from scratch;
//! [`SignalStream`] reaches the same decisions incrementally.

use crate::domain::error::SignalError;
use crate::domain::indicator::stream::IndicatorState;
use crate::domain::indicator::{compute_frame, IndicatorRow};
use crate::domain::risk::RiskLevels;
use crate::domain::rule_eval::{evaluate, ConditionSet};
use crate::domain::signal_config::SignalConfig;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalSide {
    Buy,
    Sell,
}

impl fmt::Display for SignalSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalSide::Buy => write!(f, "BUY"),
            SignalSide::Sell => write!(f, "SELL"),
        }
    }
}

/// One reason a signal fired, with the value that satisfied it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rationale {
    SmaCrossover,
    EmaCrossover,
    RsiOversold(f64),
    RsiOverbought(f64),
    MacdCrossover,
    SmaDivergence(f64),
    EmaDivergence(f64),
    Demo,
}

impl fmt::Display for Rationale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rationale::SmaCrossover => write!(f, "SMA short crossed above SMA long"),
            Rationale::EmaCrossover => write!(f, "EMA short crossed above EMA long"),
            Rationale::RsiOversold(rsi) => write!(f, "RSI oversold ({:.2})", rsi),
            Rationale::RsiOverbought(rsi) => write!(f, "RSI overbought ({:.2})", rsi),
            Rationale::MacdCrossover => write!(f, "MACD crossed above signal line"),
            Rationale::SmaDivergence(diff) => write!(f, "SMA divergence: {:.2}", diff),
            Rationale::EmaDivergence(diff) => write!(f, "EMA divergence: {:.2}", diff),
            Rationale::Demo => write!(f, "demo signal for demonstration purposes"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeSignal {
    pub side: SignalSide,
    pub entry_price: f64,
    pub sma_diff: f64,
    pub ema_diff: f64,
    pub rsi: f64,
    pub risk: RiskLevels,
    pub rationale: Vec<Rationale>,
    pub conditions: ConditionSet,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NoSignalReason {
    InsufficientHistory { bars: usize, required: usize },
    ConditionsNotMet(ConditionSet),
}

impl fmt::Display for NoSignalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoSignalReason::InsufficientHistory { bars, required } => {
                write!(f, "insufficient history: have {} bars, need {}", bars, required)
            }
            NoSignalReason::ConditionsNotMet(_) => write!(f, "conditions not met"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Signal(TradeSignal),
    NoSignal(NoSignalReason),
}

impl Decision {
    pub fn is_signal(&self) -> bool {
        matches!(self, Decision::Signal(_))
    }

    pub fn signal(&self) -> Option<&TradeSignal> {
        match self {
            Decision::Signal(s) => Some(s),
            Decision::NoSignal(_) => None,
        }
    }

    /// Condition vector, when the rows were actually evaluated.
    pub fn conditions(&self) -> Option<&ConditionSet> {
        match self {
            Decision::Signal(s) => Some(&s.conditions),
            Decision::NoSignal(NoSignalReason::ConditionsNotMet(c)) => Some(c),
            Decision::NoSignal(NoSignalReason::InsufficientHistory { .. }) => None,
        }
    }
}

fn insufficient(bars: usize, config: &SignalConfig) -> Option<Decision> {
    let required = config.required_bars();
    (bars < required)
        .then_some(Decision::NoSignal(NoSignalReason::InsufficientHistory { bars, required }))
}

/// Evaluate the newest bar of `closes`.
///
/// An empty series is an error, distinct from a no-trade decision. Too short
/// a series is `NoSignal(InsufficientHistory)`.
pub fn generate_signal(closes: &[f64], config: &SignalConfig) -> Result<Decision, SignalError> {
    let Some(&last_close) = closes.last() else {
        return Err(SignalError::EmptySeries);
    };
    if let Some(decision) = insufficient(closes.len(), config) {
        return Ok(decision);
    }

    let frame = compute_frame(closes, config);
    match frame.last_two() {
        Some((prev, curr)) => Ok(evaluate(prev, curr, last_close, config)),
        None => Ok(Decision::NoSignal(NoSignalReason::InsufficientHistory {
            bars: closes.len(),
            required: config.required_bars(),
        })),
    }
}

/// Streaming counterpart of [`generate_signal`]: after `push`ing the first
/// `n` closes, [`decision`](Self::decision) equals `generate_signal(&closes[..n])`.
#[derive(Debug, Clone)]
pub struct SignalStream {
    config: SignalConfig,
    state: IndicatorState,
    prev: Option<IndicatorRow>,
    curr: Option<IndicatorRow>,
    last_close: Option<f64>,
}

impl SignalStream {
    pub fn new(config: &SignalConfig) -> Self {
        Self {
            config: config.clone(),
            state: IndicatorState::new(config),
            prev: None,
            curr: None,
            last_close: None,
        }
    }

    pub fn push(&mut self, close: f64) -> IndicatorRow {
        let row = self.state.push(close);
        self.prev = self.curr.replace(row);
        self.last_close = Some(close);
        row
    }

    pub fn bars(&self) -> usize {
        self.state.bars()
    }

    pub fn decision(&self) -> Result<Decision, SignalError> {
        let Some(last_close) = self.last_close else {
            return Err(SignalError::EmptySeries);
        };
        if let Some(decision) = insufficient(self.bars(), &self.config) {
            return Ok(decision);
        }

        match (&self.prev, &self.curr) {
            (Some(prev), Some(curr)) => Ok(evaluate(prev, curr, last_close, &self.config)),
            _ => Ok(Decision::NoSignal(NoSignalReason::InsufficientHistory {
                bars: self.bars(),
                required: self.config.required_bars(),
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SignalConfig {
        SignalConfig {
            short_period: 5,
            long_period: 10,
            rsi_period: 5,
            ..SignalConfig::default()
        }
    }

    #[test]
    fn empty_series_is_an_error() {
        let err = generate_signal(&[], &config()).unwrap_err();
        assert!(matches!(err, SignalError::EmptySeries));
    }

    #[test]
    fn short_series_is_insufficient_history() {
        let closes: Vec<f64> = (0..9).map(|i| 100.0 + i as f64).collect();
        let decision = generate_signal(&closes, &config()).unwrap();
        assert_eq!(
            decision,
            Decision::NoSignal(NoSignalReason::InsufficientHistory {
                bars: 9,
                required: 10
            })
        );
        assert!(decision.conditions().is_none());
    }

    #[test]
    fn enough_history_is_evaluated() {
        let closes: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        let decision = generate_signal(&closes, &config()).unwrap();
        assert!(decision.conditions().is_some());
    }

    #[test]
    fn crossover_on_the_first_full_long_window_is_reported() {
        let closes = [100.0, 99.0, 98.0, 97.0, 96.0, 95.0, 96.0, 97.0, 98.0, 101.0];
        let decision = generate_signal(&closes, &config()).unwrap();

        let signal = decision.signal().unwrap();
        assert_eq!(signal.side, SignalSide::Sell);
        assert_eq!(signal.entry_price, 101.0);
        assert!(signal.conditions.ema_crossover);
        assert!(signal.conditions.macd_crossover);
        assert!(signal.conditions.rsi_overbought);

        let mut stream = SignalStream::new(&config());
        for close in closes {
            stream.push(close);
        }
        assert_eq!(stream.decision().unwrap(), decision);
    }

    #[test]
    fn stream_matches_generate_signal_on_every_prefix() {
        let closes: Vec<f64> = (0..40)
            .map(|i| 100.0 + ((i * 7) % 13) as f64 - (i / 3) as f64 * 0.5)
            .collect();
        let config = config();
        let mut stream = SignalStream::new(&config);

        assert!(matches!(stream.decision(), Err(SignalError::EmptySeries)));
        for n in 1..=closes.len() {
            stream.push(closes[n - 1]);
            assert_eq!(
                stream.decision().unwrap(),
                generate_signal(&closes[..n], &config).unwrap(),
                "prefix {}",
                n
            );
        }
    }

    #[test]
    fn no_signal_reason_display() {
        let reason = NoSignalReason::InsufficientHistory {
            bars: 3,
            required: 21,
        };
        assert_eq!(reason.to_string(), "insufficient history: have 3 bars, need 21");
    }

    #[test]
    fn rationale_display() {
        assert_eq!(Rationale::RsiOversold(24.256).to_string(), "RSI oversold (24.26)");
        assert_eq!(Rationale::SmaDivergence(-0.5).to_string(), "SMA divergence: -0.50");
        assert_eq!(SignalSide::Sell.to_string(), "SELL");
    }
}
