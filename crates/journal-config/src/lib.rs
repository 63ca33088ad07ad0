//! Configuration management.

mod settings;

pub use settings::{
    AppConfig, AppSettings, ChartSettings, EndpointSettings, LoggingConfig, QuoteSettings,
    ReportSettings,
};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;
use thiserror::Error;

const ENV_PREFIX: &str = "JOURNAL";

/// Semantic problems in an otherwise well-formed configuration.
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Unknown log format '{0}', expected 'pretty' or 'json'")]
    LogFormat(String),

    #[error("Endpoint '{0}' has an empty URL")]
    EmptyUrl(&'static str),

    #[error("Endpoint '{0}' has a zero timeout")]
    ZeroTimeout(&'static str),

    #[error("Retry policy needs at least one attempt")]
    NoAttempts,

    #[error("Retry delay range {min}..{max} is invalid")]
    DelayRange { min: f64, max: f64 },

    #[error("Chart padding must not be negative")]
    NegativePadding,

    #[error("Chart size {width}x{height} is too small")]
    ChartSize { width: f64, height: f64 },
}

/// Load configuration from file and environment.
///
/// Environment variables override file values, e.g.
/// `JOURNAL__CHART__PADDING_DAYS=60`.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}

/// Like [`load_config`], but a missing file falls back to defaults plus
/// environment overrides. Callers report the fallback themselves since this
/// usually runs before logging is set up.
pub fn load_or_default(path: &Path) -> Result<AppConfig, ConfigError> {
    if path.exists() {
        return load_config(path);
    }

    let config = Config::builder()
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}

impl AppConfig {
    /// Check values the deserializer cannot.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let format = self.logging.format.to_lowercase();
        if format != "pretty" && format != "json" {
            return Err(ValidationError::LogFormat(self.logging.format.clone()));
        }

        let endpoints = [
            ("eastmoney_kline", &self.quotes.eastmoney_kline),
            ("eastmoney_info", &self.quotes.eastmoney_info),
            ("tencent", &self.quotes.tencent),
            ("yahoo", &self.quotes.yahoo),
        ];
        for (name, endpoint) in endpoints {
            if endpoint.url.trim().is_empty() {
                return Err(ValidationError::EmptyUrl(name));
            }
            if endpoint.timeout_secs == 0 {
                return Err(ValidationError::ZeroTimeout(name));
            }
        }

        let retry = &self.quotes.retry;
        if retry.max_attempts == 0 {
            return Err(ValidationError::NoAttempts);
        }
        if retry.min_delay_secs < 0.0 || retry.max_delay_secs < retry.min_delay_secs {
            return Err(ValidationError::DelayRange {
                min: retry.min_delay_secs,
                max: retry.max_delay_secs,
            });
        }

        if self.chart.padding_days < 0 {
            return Err(ValidationError::NegativePadding);
        }
        if self.chart.width < 200.0 || self.chart.height < 150.0 {
            return Err(ValidationError::ChartSize {
                width: self.chart.width,
                height: self.chart.height,
            });
        }

        Ok(())
    }

    /// Effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chart.padding_days, 30);
        assert_eq!(config.quotes.retry.max_attempts, 3);
        assert_eq!(config.convert.price, 7);
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[logging]\nlevel = \"debug\"\nformat = \"json\"\n\n[convert]\ncode = 2\n\n[quotes.retry]\nmax_attempts = 5\nmin_delay_secs = 1.0\nmax_delay_secs = 2.0\n"
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.is_json());
        assert_eq!(config.convert.code, 2);
        assert_eq!(config.convert.direction, 4);
        assert_eq!(config.quotes.retry.max_attempts, 5);
        assert_eq!(config.quotes.tencent.timeout_secs, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file() {
        let missing = Path::new("/nonexistent/journal.toml");
        assert!(load_config(missing).is_err());
        assert!(load_or_default(missing).is_ok());
    }

    #[test]
    fn test_validation_errors() {
        let mut config = AppConfig::default();
        config.logging.format = "xml".to_string();
        assert_eq!(config.validate(), Err(ValidationError::LogFormat("xml".into())));

        let mut config = AppConfig::default();
        config.quotes.yahoo.timeout_secs = 0;
        assert_eq!(config.validate(), Err(ValidationError::ZeroTimeout("yahoo")));

        let mut config = AppConfig::default();
        config.quotes.retry.max_delay_secs = 1.0;
        assert!(matches!(config.validate(), Err(ValidationError::DelayRange { .. })));
    }

    #[test]
    fn test_to_toml() {
        let text = AppConfig::default().to_toml().unwrap();
        assert!(text.contains("padding_days = 30"));
    }
}
