//! Client configuration loaded from the environment.

use std::time::Duration;

pub const BASE_URL_VAR: &str = "PAPI_BASE_URL";
pub const USE_PREFIXES_VAR: &str = "PAPI_USE_PREFIXES";
pub const TIMEOUT_VAR: &str = "PAPI_TIMEOUT_SECS";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub use_prefixes: bool,
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            use_prefixes: false,
            timeout: None,
        }
    }

    /// Reads `PAPI_BASE_URL`, `PAPI_USE_PREFIXES` and `PAPI_TIMEOUT_SECS`.
    ///
    /// A timeout of `0` means no timeout.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup(BASE_URL_VAR)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing(BASE_URL_VAR))?;

        let use_prefixes = match lookup(USE_PREFIXES_VAR) {
            None => false,
            Some(value) => match value.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => true,
                "false" | "0" | "" => false,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: USE_PREFIXES_VAR,
                        value,
                    })
                }
            },
        };

        let timeout = match lookup(TIMEOUT_VAR) {
            None => None,
            Some(value) => {
                let secs = value.trim().parse::<u64>().map_err(|_| ConfigError::Invalid {
                    name: TIMEOUT_VAR,
                    value: value.clone(),
                })?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
        };

        Ok(Self {
            base_url,
            use_prefixes,
            timeout,
        })
    }
}
