use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Two weeks, the usual lifetime of a login.
pub const DEFAULT_SESSION_AGE_SECONDS: i64 = 1_209_600;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Error opening configuration file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed configuration: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    /// Connection string understood by sea-orm, e.g. `sqlite://echopulse.db?mode=rwc`
    pub database: String,
    #[serde(default = "default_session_age")]
    pub session_age_seconds: i64,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

fn default_session_age() -> i64 {
    DEFAULT_SESSION_AGE_SECONDS
}

fn default_static_dir() -> String {
    "static".to_string()
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_optional_fields() {
        let config = Config::parse(r#"{"port": 8000, "database": "sqlite::memory:"}"#).unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.session_age_seconds, DEFAULT_SESSION_AGE_SECONDS);
        assert_eq!(config.static_dir, "static");
    }

    #[test]
    fn explicit_values_win() {
        let config = Config::parse(
            r#"{"port": 9000, "database": "postgres://localhost/echopulse",
                "session_age_seconds": 60, "static_dir": "/srv/static"}"#,
        )
        .unwrap();
        assert_eq!(config.session_age_seconds, 60);
        assert_eq!(config.static_dir, "/srv/static");
    }

    #[test]
    fn missing_database_is_malformed() {
        let err = Config::parse(r#"{"port": 8000}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Config::load("/nonexistent/echopulse.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
