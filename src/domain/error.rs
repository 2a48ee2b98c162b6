//! Domain error types.

/// Top-level error type for goldsignal.
///
/// Only anomalies the caller has to act on are errors. Insufficient history
/// and degenerate indicator windows resolve to a
/// [`Decision`](crate::domain::signal::Decision) instead.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("no price data for {symbol}")]
    NoData { symbol: String },

    #[error("price series is empty")]
    EmptySeries,

    #[error("price source error: {reason}")]
    DataSource { reason: String },

    #[error("notification failed: {reason}")]
    Notify { reason: String },
}

impl From<&SignalError> for std::process::ExitCode {
    fn from(err: &SignalError) -> Self {
        let code: u8 = match err {
            SignalError::ConfigParse { .. } | SignalError::ConfigInvalid { .. } => 2,
            SignalError::DataSource { .. } => 3,
            SignalError::NoData { .. } | SignalError::EmptySeries => 5,
            SignalError::Notify { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
