//! Client configuration parsed from environment variables.

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

pub const API_URL_VAR: &str = "DEFECTDESK_API_URL";
pub const REQUEST_TIMEOUT_VAR: &str = "DEFECTDESK_REQUEST_TIMEOUT_SECS";
pub const CONNECT_TIMEOUT_VAR: &str = "DEFECTDESK_CONNECT_TIMEOUT_SECS";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing config: env var {var} not set")]
    MissingVar { var: &'static str },

    #[error("invalid API base URL '{0}' (expected http:// or https://)")]
    InvalidApiUrl(String),

    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl crate::error::ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingVar { .. } => "E_MISSING_CONFIG",
            Self::InvalidApiUrl(_) => "E_INVALID_API_URL",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API origin without trailing slash; endpoint paths are appended verbatim.
    pub api_url: String,
    pub timeouts: Timeouts,
}

impl ClientConfig {
    /// Build a config for `api_url` with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiUrl`] unless the URL is http(s).
    pub fn new(api_url: &str) -> Result<Self, ConfigError> {
        let api_url = normalize_api_url(api_url)?;
        Ok(Self { api_url, timeouts: Timeouts::default() })
    }

    /// Build typed client config from environment variables.
    ///
    /// Required:
    /// - `DEFECTDESK_API_URL`
    ///
    /// Optional:
    /// - `DEFECTDESK_REQUEST_TIMEOUT_SECS`: default 30
    /// - `DEFECTDESK_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if the API URL is missing or not http(s).
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = std::env::var(API_URL_VAR).map_err(|_| ConfigError::MissingVar { var: API_URL_VAR })?;
        let api_url = normalize_api_url(&raw)?;
        let timeouts = Timeouts {
            request_secs: env_parse_u64(REQUEST_TIMEOUT_VAR, DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64(CONNECT_TIMEOUT_VAR, DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        Ok(Self { api_url, timeouts })
    }

    /// Absolute URL for an API path such as `/api/auth/refresh`.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.api_url)
    }
}

fn normalize_api_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_string())
    } else {
        Err(ConfigError::InvalidApiUrl(raw.to_string()))
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key).map_or(default, |v| v.trim().parse::<u64>().unwrap_or(default))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
