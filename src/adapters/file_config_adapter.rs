//! INI file configuration adapter.

use crate::domain::error::SignalError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SignalError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config.load(path).map_err(|reason| SignalError::ConfigParse {
            file: path.display().to_string(),
            reason,
        })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, SignalError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| SignalError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_sections() {
        let content = r#"
[data]
path = /var/prices
symbol = XAUUSD

[signal]
short_period = 5
min_divergence = 0.25
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("data", "path"),
            Some("/var/prices".to_string())
        );
        assert_eq!(adapter.get_int("signal", "short_period", 0), 5);
        assert_eq!(adapter.get_double("signal", "min_divergence", 0.0), 0.25);
    }

    #[test]
    fn missing_keys_use_defaults() {
        let adapter = FileConfigAdapter::from_string("[signal]\n").unwrap();
        assert_eq!(adapter.get_string("signal", "missing"), None);
        assert_eq!(adapter.get_int("signal", "rsi_period", 14), 14);
        assert_eq!(adapter.get_double("risk", "pip_scale", 10.0), 10.0);
    }

    #[test]
    fn non_numeric_values_use_defaults() {
        let adapter =
            FileConfigAdapter::from_string("[signal]\nrsi_period = abc\nrsi_oversold = low\n")
                .unwrap();
        assert_eq!(adapter.get_int("signal", "rsi_period", 14), 14);
        assert_eq!(adapter.get_double("signal", "rsi_oversold", 30.0), 30.0);
    }

    #[test]
    fn get_usize_rejects_negative() {
        let adapter = FileConfigAdapter::from_string("[data]\nbars = -5\n").unwrap();
        assert_eq!(adapter.get_usize("data", "bars", 100), 100);

        let adapter = FileConfigAdapter::from_string("[data]\nbars = 250\n").unwrap();
        assert_eq!(adapter.get_usize("data", "bars", 100), 250);
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[notify]\noutput = /tmp/signals.log\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("notify", "output"),
            Some("/tmp/signals.log".to_string())
        );
    }

    #[test]
    fn from_file_missing_is_config_parse_error() {
        let err = FileConfigAdapter::from_file("/nonexistent/path/goldsignal.ini").unwrap_err();
        assert!(
            matches!(err, SignalError::ConfigParse { file, .. } if file.contains("goldsignal.ini"))
        );
    }
}
