//! Logging initialisation via tracing-subscriber.
//!
//! Call [`init`] once at startup, before the layout is loaded.

use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("log level must not be empty")]
    Empty,
    #[error("unrecognised log level: '{0}'")]
    Unrecognised(String),
    #[error("failed to set subscriber: {0}")]
    Install(String),
}

/// Initialise the global subscriber, writing to stderr.
///
/// An explicit `level` wins over `RUST_LOG`; with `None` the environment is
/// used and `info` is the fallback.
pub fn init(level: Option<&str>) -> Result<(), LoggerError> {
    let filter = match level {
        Some(level) => {
            parse_level(level)?;
            EnvFilter::try_new(level).map_err(|_| LoggerError::Unrecognised(level.to_string()))?
        }
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| LoggerError::Install(e.to_string()))
}

pub fn parse_level(level: &str) -> Result<LevelFilter, LoggerError> {
    if level.is_empty() {
        return Err(LoggerError::Empty);
    }
    level
        .parse::<LevelFilter>()
        .map_err(|_| LoggerError::Unrecognised(level.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_levels_parse() {
        for l in &["error", "warn", "info", "debug", "trace", "off"] {
            assert!(parse_level(l).is_ok(), "expected '{l}' to be valid");
        }
        assert_eq!(parse_level("debug").unwrap(), LevelFilter::DEBUG);
    }

    #[test]
    fn invalid_level_errors() {
        assert!(matches!(parse_level(""), Err(LoggerError::Empty)));
        assert!(matches!(parse_level("verbose"), Err(LoggerError::Unrecognised(_))));
    }

    #[test]
    fn bad_level_is_rejected_before_install() {
        assert!(matches!(init(Some("loud")), Err(LoggerError::Unrecognised(_))));
    }

    #[test]
    fn init_succeeds_or_already_installed() {
        match init(Some("warn")) {
            Ok(()) | Err(LoggerError::Install(_)) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
}
