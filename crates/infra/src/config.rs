//! Engine configuration loaded from the process environment.

use std::time::Duration;

use thiserror::Error;

pub const ENV_DISPATCH_TIMEOUT_SECS: &str = "NIMBUS_DISPATCH_TIMEOUT_SECS";
pub const ENV_STRICT_AUDIT: &str = "NIMBUS_STRICT_AUDIT";

const DEFAULT_DISPATCH_TIMEOUT_SECS: u64 = 60;
const DEFAULT_STRICT_AUDIT: bool = true;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a positive integer number of seconds, got '{value}'")]
    InvalidDuration { key: &'static str, value: String },

    #[error("{key} must be true or false, got '{value}'")]
    InvalidFlag { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Upper bound on a single backend invocation.
    pub dispatch_timeout: Duration,
    /// Abort a request when its `Started` audit entry cannot be recorded.
    pub strict_audit: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dispatch_timeout: Duration::from_secs(DEFAULT_DISPATCH_TIMEOUT_SECS),
            strict_audit: DEFAULT_STRICT_AUDIT,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Load with a custom key lookup.
    pub fn from_env_with<F>(get_env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let dispatch_timeout = match get_env(ENV_DISPATCH_TIMEOUT_SECS) {
            Some(raw) => Duration::from_secs(parse_positive_secs(ENV_DISPATCH_TIMEOUT_SECS, &raw)?),
            None => {
                tracing::warn!(
                    key = ENV_DISPATCH_TIMEOUT_SECS,
                    default = DEFAULT_DISPATCH_TIMEOUT_SECS,
                    "not set, using default"
                );
                Duration::from_secs(DEFAULT_DISPATCH_TIMEOUT_SECS)
            }
        };

        let strict_audit = match get_env(ENV_STRICT_AUDIT) {
            Some(raw) => parse_flag(ENV_STRICT_AUDIT, &raw)?,
            None => {
                tracing::warn!(
                    key = ENV_STRICT_AUDIT,
                    default = DEFAULT_STRICT_AUDIT,
                    "not set, using default"
                );
                DEFAULT_STRICT_AUDIT
            }
        };

        Ok(Self {
            dispatch_timeout,
            strict_audit,
        })
    }
}

fn parse_positive_secs(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ConfigError::InvalidDuration {
            key,
            value: raw.to_string(),
        }),
    }
}

fn parse_flag(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            key,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn absent_values_fall_back_to_defaults() {
        let config = EngineConfig::from_env_with(env(&[])).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.dispatch_timeout, Duration::from_secs(60));
        assert!(config.strict_audit);
    }

    #[test]
    fn reads_explicit_values() {
        let config = EngineConfig::from_env_with(env(&[
            (ENV_DISPATCH_TIMEOUT_SECS, "5"),
            (ENV_STRICT_AUDIT, "FALSE"),
        ]))
        .unwrap();
        assert_eq!(config.dispatch_timeout, Duration::from_secs(5));
        assert!(!config.strict_audit);
    }

    #[test]
    fn rejects_zero_or_garbage_timeout() {
        for raw in ["0", "-1", "soon"] {
            let err = EngineConfig::from_env_with(env(&[(ENV_DISPATCH_TIMEOUT_SECS, raw)]))
                .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidDuration { .. }), "{raw}");
        }
    }

    #[test]
    fn rejects_unknown_flag_values() {
        let err = EngineConfig::from_env_with(env(&[(ENV_STRICT_AUDIT, "maybe")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidFlag {
                key: ENV_STRICT_AUDIT,
                value: "maybe".into()
            }
        );
    }
}
