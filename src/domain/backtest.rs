//! Historical replay of the signal engine.
//!
//! For a history of `N` bars and warm-up `W`, every prefix `closes[..i]`
//! with `W <= i < N` is evaluated as if it were a live snapshot. A signal on
//! prefix `i` is reported at bar `i`, the first bar on which it could be
//! acted upon.
//!
//! [`run_backtest`] recomputes each prefix from scratch; [`run_backtest_streaming`]
//! feeds one [`SignalStream`] bar by bar and yields the same signals in
//! linear time.

use crate::domain::error::SignalError;
use crate::domain::price::PriceSeries;
use crate::domain::signal::{generate_signal, Decision, SignalSide, SignalStream, TradeSignal};
use crate::domain::signal_config::SignalConfig;
use chrono::NaiveDateTime;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestSignal {
    pub bar_index: usize,
    pub time: Option<NaiveDateTime>,
    pub signal: TradeSignal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub signals: Vec<BacktestSignal>,
    /// Number of prefixes evaluated.
    pub evaluated: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BacktestSummary {
    pub evaluated: usize,
    pub total: usize,
    pub buys: usize,
    pub sells: usize,
}

impl BacktestResult {
    pub fn summary(&self) -> BacktestSummary {
        let buys = self
            .signals
            .iter()
            .filter(|s| s.signal.side == SignalSide::Buy)
            .count();
        BacktestSummary {
            evaluated: self.evaluated,
            total: self.signals.len(),
            buys,
            sells: self.signals.len() - buys,
        }
    }
}

fn first_prefix(config: &SignalConfig) -> usize {
    config.warmup_bars().max(1)
}

fn record(
    signals: &mut Vec<BacktestSignal>,
    series: &PriceSeries,
    bar_index: usize,
    decision: Decision,
) {
    if let Decision::Signal(signal) = decision {
        debug!(bar_index, side = %signal.side, entry = signal.entry_price, "backtest signal");
        signals.push(BacktestSignal {
            bar_index,
            time: series.time_at(bar_index),
            signal,
        });
    }
}

pub fn run_backtest(
    series: &PriceSeries,
    config: &SignalConfig,
) -> Result<BacktestResult, SignalError> {
    if series.is_empty() {
        return Err(SignalError::EmptySeries);
    }

    let closes = series.closes();
    let start = first_prefix(config);
    let mut signals = Vec::new();
    let mut evaluated = 0;

    for i in start..closes.len() {
        let decision = generate_signal(&closes[..i], config)?;
        evaluated += 1;
        record(&mut signals, series, i, decision);
    }

    Ok(BacktestResult { signals, evaluated })
}

pub fn run_backtest_streaming(
    series: &PriceSeries,
    config: &SignalConfig,
) -> Result<BacktestResult, SignalError> {
    if series.is_empty() {
        return Err(SignalError::EmptySeries);
    }

    let start = first_prefix(config);
    let mut stream = SignalStream::new(config);
    let mut signals = Vec::new();
    let mut evaluated = 0;

    for (i, bar) in series.bars.iter().enumerate() {
        if i >= start {
            let decision = stream.decision()?;
            evaluated += 1;
            record(&mut signals, series, i, decision);
        }
        stream.push(bar.close);
    }

    Ok(BacktestResult { signals, evaluated })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price::PriceBar;
    use crate::domain::risk::size_risk;
    use crate::domain::rule_eval::ConditionSet;
    use chrono::NaiveDate;

    fn config() -> SignalConfig {
        SignalConfig {
            short_period: 5,
            long_period: 10,
            rsi_period: 5,
            ..SignalConfig::default()
        }
    }

    fn timed_series(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        PriceSeries::new(
            closes
                .iter()
                .enumerate()
                .map(|(i, &close)| PriceBar {
                    time: Some(start + chrono::Duration::minutes(15 * i as i64)),
                    close,
                })
                .collect(),
        )
    }

    #[test]
    fn empty_history_is_an_error() {
        let series = PriceSeries::default();
        assert!(matches!(
            run_backtest(&series, &config()),
            Err(SignalError::EmptySeries)
        ));
        assert!(matches!(
            run_backtest_streaming(&series, &config()),
            Err(SignalError::EmptySeries)
        ));
    }

    #[test]
    fn evaluates_prefixes_from_warmup_to_second_last_bar() {
        let series = timed_series(&[100.0; 25]);
        let result = run_backtest(&series, &config()).unwrap();
        // prefixes of length 10..=24
        assert_eq!(result.evaluated, 15);
        assert!(result.signals.is_empty());
    }

    #[test]
    fn history_shorter_than_warmup_evaluates_nothing() {
        let series = timed_series(&[100.0; 6]);
        let result = run_backtest(&series, &config()).unwrap();
        assert_eq!(result.evaluated, 0);
        assert_eq!(run_backtest_streaming(&series, &config()).unwrap(), result);
    }

    fn backtest_signal(bar_index: usize, side: SignalSide) -> BacktestSignal {
        BacktestSignal {
            bar_index,
            time: None,
            signal: TradeSignal {
                side,
                entry_price: 2500.0,
                sma_diff: 0.5,
                ema_diff: 0.4,
                rsi: 50.0,
                risk: size_risk(side, 2500.0, None, &config().risk),
                rationale: Vec::new(),
                conditions: ConditionSet::default(),
            },
        }
    }

    #[test]
    fn summary_counts_sides() {
        let result = BacktestResult {
            signals: vec![
                backtest_signal(12, SignalSide::Buy),
                backtest_signal(17, SignalSide::Sell),
                backtest_signal(23, SignalSide::Buy),
            ],
            evaluated: 40,
        };
        assert_eq!(
            result.summary(),
            BacktestSummary {
                evaluated: 40,
                total: 3,
                buys: 2,
                sells: 1,
            }
        );

        let empty = run_backtest(&timed_series(&[100.0; 12]), &config()).unwrap();
        assert_eq!(
            empty.summary(),
            BacktestSummary {
                evaluated: 2,
                total: 0,
                buys: 0,
                sells: 0,
            }
        );
    }

    #[test]
    fn crossover_at_the_warmup_prefix_is_reported() {
        let series = timed_series(&[
            100.0, 99.0, 98.0, 97.0, 96.0, 95.0, 96.0, 97.0, 98.0, 101.0, 102.0,
        ]);
        let result = run_backtest(&series, &config()).unwrap();

        assert_eq!(result.evaluated, 1);
        assert_eq!(result.signals.len(), 1);
        assert_eq!(result.signals[0].bar_index, 10);
        assert_eq!(result.signals[0].signal.side, SignalSide::Sell);
        assert_eq!(run_backtest_streaming(&series, &config()).unwrap(), result);
    }

    #[test]
    fn streaming_matches_from_scratch() {
        let closes: Vec<f64> = (0..120)
            .map(|i| 2500.0 + (i as f64 * 0.37).sin() * 6.0 + (i % 9) as f64 * 0.4)
            .collect();
        let series = timed_series(&closes);
        assert_eq!(
            run_backtest(&series, &config()).unwrap(),
            run_backtest_streaming(&series, &config()).unwrap()
        );
    }
}
