#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use goldsignal::domain::error::SignalError;
use goldsignal::domain::price::{PriceBar, PriceSeries};
use goldsignal::ports::data_port::PriceSource;
use goldsignal::ports::notify_port::Notifier;
use std::cell::RefCell;
use std::collections::HashMap;

pub struct MockPriceSource {
    pub data: HashMap<String, PriceSeries>,
    pub errors: HashMap<String, String>,
}

impl MockPriceSource {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_series(mut self, symbol: &str, series: PriceSeries) -> Self {
        self.data.insert(symbol.to_string(), series);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }

    fn series(&self, symbol: &str) -> Result<&PriceSeries, SignalError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(SignalError::DataSource {
                reason: reason.clone(),
            });
        }
        match self.data.get(symbol) {
            Some(series) if !series.is_empty() => Ok(series),
            _ => Err(SignalError::NoData {
                symbol: symbol.to_string(),
            }),
        }
    }
}

impl PriceSource for MockPriceSource {
    fn fetch_latest(&self, symbol: &str, count: usize) -> Result<PriceSeries, SignalError> {
        let series = self.series(symbol)?;
        let skip = series.len().saturating_sub(count);
        Ok(PriceSeries::new(series.bars[skip..].to_vec()))
    }

    fn fetch_since(&self, symbol: &str, lookback: Duration) -> Result<PriceSeries, SignalError> {
        let series = self.series(symbol)?;
        let Some(newest) = series.last_time() else {
            return Ok(series.clone());
        };
        let Some(cutoff) = newest.checked_sub_signed(lookback) else {
            return Ok(series.clone());
        };
        Ok(PriceSeries::new(
            series
                .bars
                .iter()
                .filter(|b| b.time.is_none_or(|t| t >= cutoff))
                .copied()
                .collect(),
        ))
    }
}

/// Records every message; optionally fails every send.
pub struct RecordingNotifier {
    pub sent: RefCell<Vec<String>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            sent: RefCell::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            sent: RefCell::new(Vec::new()),
            fail: true,
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.sent.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn send(&self, message: &str) -> Result<(), SignalError> {
        if self.fail {
            return Err(SignalError::Notify {
                reason: "channel unavailable".into(),
            });
        }
        self.sent.borrow_mut().push(message.to_string());
        Ok(())
    }
}

pub fn start_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 3)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Closes on a 15-minute grid starting at [`start_time`].
pub fn timed_series(closes: &[f64]) -> PriceSeries {
    PriceSeries::new(
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                time: Some(start_time() + Duration::minutes(15 * i as i64)),
                close,
            })
            .collect(),
    )
}

/// Twenty flat bars at 10.0 followed by a five-bar ramp.
pub fn ramp_after_flat() -> Vec<f64> {
    let mut closes = vec![10.0; 20];
    closes.extend([10.2, 10.5, 10.9, 11.4, 12.0]);
    closes
}
