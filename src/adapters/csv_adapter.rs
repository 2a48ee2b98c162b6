//! CSV file price source.
//!
//! Reads `<base_path>/<SYMBOL>.csv`. The header must name a `close` column;
//! a `time` column is optional. Other columns are ignored.

use crate::domain::error::SignalError;
use crate::domain::price::{PriceBar, PriceSeries};
use crate::ports::data_port::PriceSource;
use chrono::{DateTime, Duration, NaiveDateTime};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

const TIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

pub struct CsvPriceSource {
    base_path: PathBuf,
}

impl CsvPriceSource {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    fn load(&self, symbol: &str) -> Result<PriceSeries, SignalError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| SignalError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let headers = rdr.headers().map_err(|e| SignalError::DataSource {
            reason: format!("CSV header error: {}", e),
        })?;
        let column = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
        let close_col = column("close").ok_or_else(|| SignalError::DataSource {
            reason: format!("{} has no close column", path.display()),
        })?;
        let time_col = column("time");

        let mut bars = Vec::new();
        for (line, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| SignalError::DataSource {
                reason: format!("CSV parse error: {}", e),
            })?;

            let close: f64 = record
                .get(close_col)
                .ok_or_else(|| SignalError::DataSource {
                    reason: format!("row {}: missing close value", line + 1),
                })?
                .parse()
                .map_err(|e| SignalError::DataSource {
                    reason: format!("row {}: invalid close value: {}", line + 1, e),
                })?;

            let time = match time_col.and_then(|c| record.get(c)) {
                Some(raw) if !raw.is_empty() => Some(parse_time(raw).ok_or_else(|| {
                    SignalError::DataSource {
                        reason: format!("row {}: invalid time value: {}", line + 1, raw),
                    }
                })?),
                _ => None,
            };

            bars.push(PriceBar { time, close });
        }

        if bars.is_empty() {
            return Err(SignalError::NoData {
                symbol: symbol.to_string(),
            });
        }
        debug!(symbol, bars = bars.len(), path = %path.display(), "loaded price history");
        Ok(PriceSeries::new(bars))
    }
}

fn parse_time(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(secs) = raw.parse::<i64>() {
        return DateTime::from_timestamp(secs, 0).map(|dt| dt.naive_utc());
    }
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

impl PriceSource for CsvPriceSource {
    fn fetch_latest(&self, symbol: &str, count: usize) -> Result<PriceSeries, SignalError> {
        let series = self.load(symbol)?;
        let skip = series.len().saturating_sub(count);
        Ok(PriceSeries::new(series.bars[skip..].to_vec()))
    }

    fn fetch_since(&self, symbol: &str, lookback: Duration) -> Result<PriceSeries, SignalError> {
        let series = self.load(symbol)?;
        let Some(newest) = series.last_time() else {
            // Untimestamped history cannot be windowed.
            return Ok(series);
        };
        let Some(cutoff) = newest.checked_sub_signed(lookback) else {
            // Window reaches past the representable calendar.
            return Ok(series);
        };
        let bars: Vec<PriceBar> = series
            .bars
            .into_iter()
            .filter(|b| b.time.is_none_or(|t| t >= cutoff))
            .collect();
        Ok(PriceSeries::new(bars))
    }
}
