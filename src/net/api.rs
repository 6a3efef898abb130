//! HTTP ports consumed by the session core and the pages.
//!
//! ERROR HANDLING
//! ==============
//! [`AuthApi`] folds transport and status failures into [`AuthError`] so the
//! token manager can map each one to a navigation decision. [`ResourceApi`]
//! reports [`FetchError`], keeping 401/403 distinct from other failures so
//! pages can apply one uniform policy.

use serde_json::Value;

use crate::error::{AuthError, ErrorCode};
use crate::storage::RefreshCredential;

use super::types::{LoginRequest, LoginResponse};

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const CHECK_TOKEN_PATH: &str = "/api/auth/check_token";
pub const REFRESH_PATH: &str = "/api/auth/refresh";
pub const LOGOUT_PATH: &str = "/api/auth/logout";

/// Outcome of token introspection that the protocol defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Introspection {
    /// 2xx: the token is valid.
    Valid,
    /// 401: the token is expired or invalid.
    Unauthorized,
}

/// Auth endpoints.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait AuthApi: Send + Sync {
    /// `GET /api/auth/check_token` with the access token as bearer.
    ///
    /// Any status other than 2xx/401 is an [`AuthError::UnexpectedStatus`].
    async fn check_token(&self, access_token: &str) -> Result<Introspection, AuthError>;

    /// `POST /api/auth/refresh`; returns the new access token.
    async fn refresh(&self, credential: &RefreshCredential) -> Result<String, AuthError>;

    /// `POST /api/auth/login`.
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, AuthError>;

    /// `POST /api/auth/logout`.
    async fn logout(&self, credential: Option<&RefreshCredential>) -> Result<(), AuthError>;
}

// =============================================================================
// RESOURCES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// Bearer-authenticated JSON request against a role-gated endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceRequest {
    pub method: Method,
    pub path: String,
    pub bearer: String,
    pub body: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("not authenticated")]
    Unauthorized,
    #[error("forbidden for this role")]
    Forbidden,
    #[error("request failed with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("response decode failed: {0}")]
    Decode(String),
}

impl ErrorCode for FetchError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "E_UNAUTHORIZED",
            Self::Forbidden => "E_FORBIDDEN",
            Self::Status { .. } => "E_STATUS",
            Self::Transport(_) => "E_TRANSPORT",
            Self::Decode(_) => "E_DECODE",
        }
    }
}

/// Role-gated resource endpoints (`/api/admin/*`, `/api/defects/*`, ...).
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait ResourceApi: Send + Sync {
    /// Send the request; a 2xx with an empty body yields `Value::Null`.
    async fn send(&self, request: ResourceRequest) -> Result<Value, FetchError>;
}
