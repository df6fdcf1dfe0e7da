//! Logging to stderr via tracing-subscriber.
//!
//! stdout belongs to the console channel, so every log line goes to stderr.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Where the effective filter came from. Logged once after init.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterSource {
    /// `-v` flags on the command line.
    Cli,
    /// `RUST_LOG`.
    Env,
    /// `[app].log_level` or `ECOBOT_LOG_LEVEL`.
    Config,
}

/// Install the global subscriber.
///
/// With `from_cli` set, `level` wins over `RUST_LOG`; otherwise `RUST_LOG`
/// wins and `level` is used when it is unset or unparsable.
pub fn init(level: &str, from_cli: bool) -> Result<FilterSource, AppError> {
    let (filter, source) = select_filter(level, from_cli)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| AppError::Logger(format!("failed to set subscriber: {e}")))?;

    Ok(source)
}

fn select_filter(level: &str, from_cli: bool) -> Result<(EnvFilter, FilterSource), AppError> {
    if from_cli {
        return EnvFilter::try_new(level)
            .map(|f| (f, FilterSource::Cli))
            .map_err(|e| AppError::Logger(format!("invalid log level '{level}': {e}")));
    }
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok((filter, FilterSource::Env));
    }
    parse_level(level)?;
    EnvFilter::try_new(level)
        .map(|f| (f, FilterSource::Config))
        .map_err(|e| AppError::Logger(format!("invalid log level '{level}': {e}")))
}

/// Check a configured level is one of `error|warn|info|debug|trace|off`.
pub fn parse_level(level: &str) -> Result<LevelFilter, AppError> {
    if level.trim().is_empty() {
        return Err(AppError::Logger("log level must not be empty".into()));
    }
    level
        .parse::<LevelFilter>()
        .map_err(|_| AppError::Logger(format!("unrecognised log level: '{level}'")))
}

/// Level selected by repeated `-v` flags, `None` when there were none.
///
/// `-v` warn, `-vv` info, `-vvv` debug, `-vvvv` and beyond trace.
pub fn level_for_verbosity(count: u8) -> Option<&'static str> {
    match count {
        0 => None,
        1 => Some("warn"),
        2 => Some("info"),
        3 => Some("debug"),
        _ => Some("trace"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_levels() {
        assert_eq!(parse_level("debug").unwrap(), LevelFilter::DEBUG);
        assert_eq!(parse_level("off").unwrap(), LevelFilter::OFF);
        assert!(parse_level("chatty").is_err());
        assert!(parse_level("  ").is_err());
    }

    #[test]
    fn verbosity_tiers() {
        assert_eq!(level_for_verbosity(0), None);
        assert_eq!(level_for_verbosity(1), Some("warn"));
        assert_eq!(level_for_verbosity(3), Some("debug"));
        assert_eq!(level_for_verbosity(9), Some("trace"));
    }

    #[test]
    fn cli_level_must_be_a_valid_directive() {
        assert!(matches!(select_filter("debug", true), Ok((_, FilterSource::Cli))));
        assert!(select_filter("ecobot=loud", true).is_err());
    }

    #[test]
    fn second_init_reports_logger_error() {
        let _ = init("info", true);
        match init("info", true) {
            Err(AppError::Logger(msg)) => assert!(msg.contains("set subscriber")),
            other => panic!("expected logger error, got {other:?}"),
        }
    }
}
