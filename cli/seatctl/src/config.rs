//! Runner configuration.

use anyhow::{Context, Result};

use crate::output::OutputFormat;

/// seatctl configuration (env-driven, overridden by flags).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub log_json: bool,

    /// Result output format.
    pub format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            log_json: false,
            format: OutputFormat::Text,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let log_level = lookup("SEATLINE_LOG_LEVEL").unwrap_or(defaults.log_level);

        let log_json = lookup("SEATLINE_LOG_JSON")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(defaults.log_json);

        let format = lookup("SEATLINE_OUTPUT_FORMAT")
            .map(|v| v.parse::<OutputFormat>())
            .transpose()
            .context("SEATLINE_OUTPUT_FORMAT must be 'text' or 'json'.")?
            .unwrap_or(defaults.format);

        Ok(Self {
            log_level,
            log_json,
            format,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_without_env() {
        assert_eq!(load(&[]).unwrap(), Config::default());
    }

    #[test]
    fn test_reads_env_values() {
        let config = load(&[
            ("SEATLINE_LOG_LEVEL", "debug"),
            ("SEATLINE_LOG_JSON", "TRUE"),
            ("SEATLINE_OUTPUT_FORMAT", "json"),
        ])
        .unwrap();
        assert_eq!(config.log_level, "debug");
        assert!(config.log_json);
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn test_rejects_unknown_format() {
        let err = load(&[("SEATLINE_OUTPUT_FORMAT", "xml")]).unwrap_err();
        assert!(err.to_string().contains("SEATLINE_OUTPUT_FORMAT"));
    }
}
