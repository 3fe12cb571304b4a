//! # API Configuration
//!
//! One base URL plus the default [`RequestConfig`] handed to every call.
//!
//! | Variable                | Required | Meaning                          |
//! |-------------------------|----------|----------------------------------|
//! | `REVIEW_API_URL`        | yes      | Base URL, e.g. `https://host/api`|
//! | `REVIEW_API_TIMEOUT_MS` | no       | Per-call timeout in milliseconds |

use crate::framework::RequestConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const API_URL_VAR: &str = "REVIEW_API_URL";
pub const TIMEOUT_VAR: &str = "REVIEW_API_TIMEOUT_MS";

/// Errors raised while assembling the application's configuration.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    /// A required setting is absent or blank.
    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    /// A setting is present but unusable.
    #[error("Invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(String),
}

/// Base URL and per-call transport settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiData {
    pub api_url: String,
    #[serde(default)]
    pub request_config: RequestConfig,
}

impl ApiData {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            request_config: RequestConfig::default(),
        }
    }

    pub fn with_request_config(mut self, request_config: RequestConfig) -> Self {
        self.request_config = request_config;
        self
    }

    /// Reads the settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the settings through `lookup`, which returns `None` for unset keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = lookup(API_URL_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing(API_URL_VAR))?;
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                key: API_URL_VAR,
                message: format!("expected an http(s) URL, got {api_url:?}"),
            });
        }

        let mut request_config = RequestConfig::default();
        if let Some(raw) = lookup(TIMEOUT_VAR) {
            let timeout_ms = raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                key: TIMEOUT_VAR,
                message: e.to_string(),
            })?;
            request_config.timeout_ms = Some(timeout_ms);
        }

        Ok(Self::new(api_url).with_request_config(request_config))
    }

    /// Joins `path` onto the base URL.
    pub fn url(&self, path: &str) -> String {
        let base = self.api_url.trim_end_matches('/');
        if path.is_empty() || path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}
