//! reqwest transport for the auth and resource endpoints.
//!
//! Natively the refresh credential travels as an explicit
//! `Cookie: refresh_token=...` header and login captures it from
//! `Set-Cookie`. In the browser the cookie is HTTP-only, so requests opt into
//! `credentials: include` and the user agent attaches it.

#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{COOKIE, HeaderMap, SET_COOKIE};
use serde_json::Value;

use crate::config::{ClientConfig, ConfigError};
use crate::error::AuthError;
use crate::storage::{REFRESH_COOKIE, RefreshCredential};

use super::api::{
    AuthApi, CHECK_TOKEN_PATH, FetchError, Introspection, LOGIN_PATH, LOGOUT_PATH, Method, REFRESH_PATH,
    ResourceApi, ResourceRequest,
};
use super::types::{ErrorBody, LoginRequest, LoginResponse, RefreshResponse};

// =============================================================================
// CLIENT
// =============================================================================

#[derive(Debug, Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl HttpClient {
    /// Build a client with the configured timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClientBuild`] if the TLS backend fails to
    /// initialise.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs));
        let http = builder.build().map_err(|e| ConfigError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, config })
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn post_with_credential(&self, path: &str, credential: Option<&RefreshCredential>) -> reqwest::RequestBuilder {
        let request = include_credentials(self.http.post(self.config.endpoint(path)));
        match credential {
            Some(RefreshCredential::Token(value)) => request.header(COOKIE, format!("{REFRESH_COOKIE}={value}")),
            Some(RefreshCredential::Ambient) | None => request,
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn include_credentials(request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    request.fetch_credentials_include()
}

#[cfg(not(target_arch = "wasm32"))]
fn include_credentials(request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    request
}

// =============================================================================
// AUTH
// =============================================================================

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl AuthApi for HttpClient {
    async fn check_token(&self, access_token: &str) -> Result<Introspection, AuthError> {
        let response = self
            .http
            .get(self.config.endpoint(CHECK_TOKEN_PATH))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "check_token");
        if status.is_success() {
            Ok(Introspection::Valid)
        } else if status == StatusCode::UNAUTHORIZED {
            Ok(Introspection::Unauthorized)
        } else {
            Err(AuthError::UnexpectedStatus(status.as_u16()))
        }
    }

    async fn refresh(&self, credential: &RefreshCredential) -> Result<String, AuthError> {
        let response = self
            .post_with_credential(REFRESH_PATH, Some(credential))
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::RefreshFailure { status: status.as_u16() });
        }
        let text = response.text().await.map_err(|e| AuthError::Transport(e.to_string()))?;
        let body: RefreshResponse = serde_json::from_str(&text).map_err(|e| AuthError::Decode(e.to_string()))?;
        Ok(body.access_token)
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, AuthError> {
        let response = include_credentials(self.http.post(self.config.endpoint(LOGIN_PATH)))
            .json(request)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = response.status();
        let set_cookie = refresh_cookie_from_headers(response.headers());
        let text = response.text().await.map_err(|e| AuthError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(AuthError::LoginRejected(error_message(status, &text)));
        }

        let mut body: LoginResponse = serde_json::from_str(&text).map_err(|e| AuthError::Decode(e.to_string()))?;
        if body.refresh_token.is_none() {
            body.refresh_token = set_cookie;
        }
        Ok(body)
    }

    async fn logout(&self, credential: Option<&RefreshCredential>) -> Result<(), AuthError> {
        let response = self
            .post_with_credential(LOGOUT_PATH, credential)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(AuthError::UnexpectedStatus(status.as_u16()))
        }
    }
}

// =============================================================================
// RESOURCES
// =============================================================================

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl ResourceApi for HttpClient {
    async fn send(&self, request: ResourceRequest) -> Result<Value, FetchError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };
        let builder = self
            .http
            .request(method, self.config.endpoint(&request.path))
            .bearer_auth(&request.bearer);
        let builder = match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        };

        let response = builder.send().await.map_err(|e| FetchError::Transport(e.to_string()))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| FetchError::Transport(e.to_string()))?;
        tracing::debug!(path = %request.path, status = status.as_u16(), "resource request");

        match status {
            StatusCode::UNAUTHORIZED => Err(FetchError::Unauthorized),
            StatusCode::FORBIDDEN => Err(FetchError::Forbidden),
            s if !s.is_success() => Err(FetchError::Status { status: s.as_u16(), message: error_message(s, &text) }),
            _ if text.trim().is_empty() => Ok(Value::Null),
            _ => serde_json::from_str(&text).map_err(|e| FetchError::Decode(e.to_string())),
        }
    }
}

// =============================================================================
// PARSING
// =============================================================================

/// Value of a non-empty `refresh_token` cookie set by the response.
fn refresh_cookie_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|cookie| {
            let pair = cookie.split(';').next()?;
            let (name, value) = pair.split_once('=')?;
            (name.trim() == REFRESH_COOKIE && !value.trim().is_empty()).then(|| value.trim().to_owned())
        })
}

/// The API's `{"error": ...}` message, falling back to the raw body or the
/// status line.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(ErrorBody { error: Some(message) }) = serde_json::from_str::<ErrorBody>(body) {
        return message;
    }
    let body = body.trim();
    if body.is_empty() { status.to_string() } else { body.to_owned() }
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
