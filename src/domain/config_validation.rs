//! Configuration validation.
//!
//! Validates the raw config values before they are built into a
//! `SignalConfig` / `RunnerConfig`. Missing keys fall back to the defaults,
//! so only present-but-unusable values fail here.

use crate::domain::error::SignalError;
use crate::domain::signal_config::{RiskConfig, SignalConfig};
use crate::ports::config_port::ConfigPort;

pub fn validate_signal_config(config: &dyn ConfigPort) -> Result<(), SignalError> {
    validate_periods(config)?;
    validate_moving_average_order(config)?;
    validate_macd_order(config)?;
    validate_rsi_thresholds(config)?;
    validate_non_negative(config, "signal", "min_divergence", SignalConfig::default().min_divergence)?;
    Ok(())
}

pub fn validate_risk_config(config: &dyn ConfigPort) -> Result<(), SignalError> {
    let defaults = RiskConfig::default();
    validate_non_negative(config, "risk", "base_tp_pips", defaults.base_tp_pips as f64)?;
    validate_non_negative(config, "risk", "base_sl_pips", defaults.base_sl_pips as f64)?;
    validate_non_negative(config, "risk", "tp_atr_multiplier", defaults.tp_atr_multiplier)?;
    validate_non_negative(config, "risk", "sl_atr_multiplier", defaults.sl_atr_multiplier)?;

    let scale = config.get_double("risk", "pip_scale", defaults.pip_scale);
    if scale <= 0.0 {
        return Err(invalid("risk", "pip_scale", "pip_scale must be positive"));
    }
    Ok(())
}

pub fn validate_runner_config(config: &dyn ConfigPort) -> Result<(), SignalError> {
    if config.get_int("data", "bars", 100) < 2 {
        return Err(invalid("data", "bars", "bars must be at least 2"));
    }
    if config.get_int("runner", "check_interval", 60) < 1 {
        return Err(invalid(
            "runner",
            "check_interval",
            "check_interval must be at least 1 second",
        ));
    }
    match config.get_string("data", "symbol") {
        Some(s) if s.trim().is_empty() => Err(invalid("data", "symbol", "symbol must not be empty")),
        _ => Ok(()),
    }
}

/// All of the above, in the order the CLI reports them.
pub fn validate_all(config: &dyn ConfigPort) -> Result<(), SignalError> {
    validate_signal_config(config)?;
    validate_risk_config(config)?;
    validate_runner_config(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> SignalError {
    SignalError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_periods(config: &dyn ConfigPort) -> Result<(), SignalError> {
    let defaults = SignalConfig::default();
    let periods = [
        ("short_period", defaults.short_period),
        ("long_period", defaults.long_period),
        ("rsi_period", defaults.rsi_period),
        ("macd_fast", defaults.macd_fast),
        ("macd_slow", defaults.macd_slow),
        ("macd_signal", defaults.macd_signal),
        ("atr_period", defaults.atr_period),
    ];

    for (key, default) in periods {
        if config.get_int("signal", key, default as i64) < 1 {
            return Err(invalid("signal", key, &format!("{} must be at least 1", key)));
        }
    }
    Ok(())
}

fn validate_moving_average_order(config: &dyn ConfigPort) -> Result<(), SignalError> {
    let defaults = SignalConfig::default();
    let short = config.get_int("signal", "short_period", defaults.short_period as i64);
    let long = config.get_int("signal", "long_period", defaults.long_period as i64);
    if short >= long {
        return Err(invalid(
            "signal",
            "long_period",
            "long_period must be greater than short_period",
        ));
    }
    Ok(())
}

fn validate_macd_order(config: &dyn ConfigPort) -> Result<(), SignalError> {
    let defaults = SignalConfig::default();
    let fast = config.get_int("signal", "macd_fast", defaults.macd_fast as i64);
    let slow = config.get_int("signal", "macd_slow", defaults.macd_slow as i64);
    if fast >= slow {
        return Err(invalid(
            "signal",
            "macd_slow",
            "macd_slow must be greater than macd_fast",
        ));
    }
    Ok(())
}

fn validate_rsi_thresholds(config: &dyn ConfigPort) -> Result<(), SignalError> {
    let defaults = SignalConfig::default();
    let oversold = config.get_double("signal", "rsi_oversold", defaults.rsi_oversold);
    let overbought = config.get_double("signal", "rsi_overbought", defaults.rsi_overbought);

    for (key, value) in [("rsi_oversold", oversold), ("rsi_overbought", overbought)] {
        if !(0.0..=100.0).contains(&value) {
            return Err(invalid("signal", key, &format!("{} must be between 0 and 100", key)));
        }
    }
    if oversold >= overbought {
        return Err(invalid(
            "signal",
            "rsi_oversold",
            "rsi_oversold must be below rsi_overbought",
        ));
    }
    Ok(())
}

fn validate_non_negative(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<(), SignalError> {
    if config.get_double(section, key, default) < 0.0 {
        return Err(invalid(section, key, &format!("{} must be non-negative", key)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn empty_config_uses_valid_defaults() {
        let config = make_config("[signal]\n");
        assert!(validate_all(&config).is_ok());
    }

    #[test]
    fn valid_full_config_passes() {
        let config = make_config(
            r#"
[signal]
short_period = 5
long_period = 10
rsi_period = 14
rsi_oversold = 30
rsi_overbought = 70
macd_fast = 12
macd_slow = 26
macd_signal = 9
atr_period = 14
min_divergence = 0.1

[risk]
base_tp_pips = 50
base_sl_pips = 30
tp_atr_multiplier = 2.0
sl_atr_multiplier = 1.0
pip_scale = 10

[data]
symbol = XAUUSD
bars = 100

[runner]
check_interval = 60
"#,
        );
        assert!(validate_all(&config).is_ok());
    }

    #[test]
    fn zero_period_fails() {
        let config = make_config("[signal]\nrsi_period = 0\n");
        let err = validate_signal_config(&config).unwrap_err();
        assert!(matches!(err, SignalError::ConfigInvalid { key, .. } if key == "rsi_period"));
    }

    #[test]
    fn short_not_below_long_fails() {
        let config = make_config("[signal]\nshort_period = 20\nlong_period = 20\n");
        let err = validate_signal_config(&config).unwrap_err();
        assert!(matches!(err, SignalError::ConfigInvalid { key, .. } if key == "long_period"));
    }

    #[test]
    fn macd_fast_not_below_slow_fails() {
        let config = make_config("[signal]\nmacd_fast = 30\nmacd_slow = 26\n");
        let err = validate_signal_config(&config).unwrap_err();
        assert!(matches!(err, SignalError::ConfigInvalid { key, .. } if key == "macd_slow"));
    }

    #[test]
    fn rsi_threshold_out_of_range_fails() {
        let config = make_config("[signal]\nrsi_overbought = 120\n");
        let err = validate_signal_config(&config).unwrap_err();
        assert!(matches!(err, SignalError::ConfigInvalid { key, .. } if key == "rsi_overbought"));
    }

    #[test]
    fn inverted_rsi_thresholds_fail() {
        let config = make_config("[signal]\nrsi_oversold = 80\nrsi_overbought = 70\n");
        let err = validate_signal_config(&config).unwrap_err();
        assert!(matches!(err, SignalError::ConfigInvalid { key, .. } if key == "rsi_oversold"));
    }

    #[test]
    fn negative_divergence_fails() {
        let config = make_config("[signal]\nmin_divergence = -1\n");
        let err = validate_signal_config(&config).unwrap_err();
        assert!(matches!(err, SignalError::ConfigInvalid { key, .. } if key == "min_divergence"));
    }

    #[test]
    fn negative_multiplier_fails() {
        let config = make_config("[risk]\nsl_atr_multiplier = -0.5\n");
        let err = validate_risk_config(&config).unwrap_err();
        assert!(matches!(err, SignalError::ConfigInvalid { key, .. } if key == "sl_atr_multiplier"));
    }

    #[test]
    fn zero_pip_scale_fails() {
        let config = make_config("[risk]\npip_scale = 0\n");
        let err = validate_risk_config(&config).unwrap_err();
        assert!(matches!(err, SignalError::ConfigInvalid { key, .. } if key == "pip_scale"));
    }

    #[test]
    fn negative_base_pips_fails() {
        let config = make_config("[risk]\nbase_tp_pips = -5\n");
        let err = validate_risk_config(&config).unwrap_err();
        assert!(matches!(err, SignalError::ConfigInvalid { key, .. } if key == "base_tp_pips"));
    }

    #[test]
    fn too_few_bars_fails() {
        let config = make_config("[data]\nbars = 1\n");
        let err = validate_runner_config(&config).unwrap_err();
        assert!(matches!(err, SignalError::ConfigInvalid { key, .. } if key == "bars"));
    }

    #[test]
    fn zero_interval_fails() {
        let config = make_config("[runner]\ncheck_interval = 0\n");
        let err = validate_runner_config(&config).unwrap_err();
        assert!(matches!(err, SignalError::ConfigInvalid { key, .. } if key == "check_interval"));
    }
}
