//! Client configuration.

use std::time::Duration;

use thiserror::Error;

use crate::headers::default_headers;
use crate::http::HeaderSet;
use crate::request::SerializationPolicy;

pub const ENV_BASE_URL: &str = "LIGHTWIRE_BASE_URL";
pub const ENV_TIMEOUT_MS: &str = "LIGHTWIRE_TIMEOUT_MS";
pub const ENV_STRICT_BODY: &str = "LIGHTWIRE_STRICT_BODY";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a number of milliseconds, got {value:?}")]
    InvalidTimeout { name: &'static str, value: String },

    #[error("{name} must be a boolean, got {value:?}")]
    InvalidFlag { name: &'static str, value: String },
}

/// Settings shared by every request an `HttpClient` makes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Headers merged under each call's own headers.
    pub default_headers: HeaderSet,
    /// Prefix for relative request URLs. Stored without a trailing slash.
    pub base_url: Option<String>,
    /// Upper bound on one exchange; elapsing yields `ApiError::UnknownError`.
    pub timeout: Option<Duration>,
    pub serialization: SerializationPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            default_headers: default_headers(),
            base_url: None,
            timeout: None,
            serialization: SerializationPolicy::Lenient,
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `LIGHTWIRE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(base) = lookup(ENV_BASE_URL).filter(|v| !v.is_empty()) {
            config = config.base_url(&base);
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            let millis: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidTimeout {
                name: ENV_TIMEOUT_MS,
                value: raw.clone(),
            })?;
            config.timeout = Some(Duration::from_millis(millis));
        }

        if let Some(raw) = lookup(ENV_STRICT_BODY) {
            let strict = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" | "" => false,
                _ => {
                    return Err(ConfigError::InvalidFlag {
                        name: ENV_STRICT_BODY,
                        value: raw,
                    })
                }
            };
            if strict {
                config.serialization = SerializationPolicy::Strict;
            }
        }

        Ok(config)
    }

    pub fn base_url(mut self, base_url: &str) -> Self {
        self.base_url = Some(base_url.trim_end_matches('/').to_string());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn serialization(mut self, policy: SerializationPolicy) -> Self {
        self.serialization = policy;
        self
    }

    pub fn default_header(mut self, name: &str, value: &str) -> Self {
        self.default_headers.insert(name, value);
        self
    }

    /// Resolve `url` against `base_url`. Absolute URLs are returned as is.
    pub fn resolve_url(&self, url: &str) -> String {
        match &self.base_url {
            Some(base) if !is_absolute(url) => format!("{base}/{}", url.trim_start_matches('/')),
            _ => url.to_string(),
        }
    }
}

fn is_absolute(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
