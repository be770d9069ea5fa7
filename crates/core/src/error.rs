use std::time::Duration;

use thiserror::Error;

/// A page source could not produce a `PageModel` for a target.
/// Terminal for the single scan only; the engine turns it into a degraded report.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchFailure {
    #[error("invalid target `{target}`: {reason}")]
    InvalidTarget { target: String, reason: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("access blocked (status {status})")]
    Blocked { status: u16 },

    #[error("unexpected status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("failed to read snapshot: {0}")]
    Io(String),

    #[error("failed to decode page snapshot: {0}")]
    Decode(String),
}

/// Malformed configuration. Never fatal: callers log it and fall back to defaults.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown detector key `{0}`")]
    UnknownKey(String),

    #[error("detector `{key}` expects a boolean, found {found}")]
    InvalidValue { key: String, found: String },

    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_failure_messages() {
        let err = FetchFailure::Timeout(Duration::from_secs(30));
        assert_eq!(err.to_string(), "timed out after 30s");

        let err = FetchFailure::Blocked { status: 403 };
        assert_eq!(err.to_string(), "access blocked (status 403)");
    }

    #[test]
    fn test_config_error_messages() {
        let err = ConfigError::InvalidValue {
            key: "scarcity".to_string(),
            found: "\"yes\"".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "detector `scarcity` expects a boolean, found \"yes\""
        );
    }
}
