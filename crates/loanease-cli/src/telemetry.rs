use std::env;
use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter. Falls back to `RUST_LOG`.
pub const LOG_ENV: &str = "LOANEASE_LOG";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log filter '{value}' in LOANEASE_LOG")]
    EnvFilter {
        value: String,
        #[source]
        source: ParseError,
    },
    #[error("telemetry error: {0}")]
    Subscriber(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Resolve the filter directive: `LOANEASE_LOG`, then `RUST_LOG`, then `warn`.
pub fn log_filter() -> String {
    [LOG_ENV, "RUST_LOG"]
        .iter()
        .filter_map(|key| env::var(key).ok())
        .find(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
}

/// Install a compact subscriber on stderr so stdout stays machine-readable.
pub fn init() -> Result<(), TelemetryError> {
    let value = log_filter();
    let env_filter = EnvFilter::try_new(&value)
        .map_err(|source| TelemetryError::EnvFilter { value, source })?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_filter_error_names_value_and_keeps_source() {
        let value = "loanease=verbose".to_string();
        let source = match EnvFilter::try_new(&value) {
            Err(e) => e,
            Ok(_) => panic!("Expected a filter parse error"),
        };
        let err = TelemetryError::EnvFilter { value, source };
        assert_eq!(
            err.to_string(),
            "invalid log filter 'loanease=verbose' in LOANEASE_LOG"
        );
        assert!(err.source().is_some());
    }
}
