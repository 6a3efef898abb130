//! Session error taxonomy.
//!
//! ERROR HANDLING
//! ==============
//! Auth failures never surface as in-page banners. Each variant maps to a
//! navigation target through [`AuthError::redirect_target`]: everything routes
//! to `/login` except [`AuthError::UnauthorizedRole`], which keeps the session
//! and sends the user home.

use crate::routes::Route;
use crate::session::claims::ClaimsError;

/// Stable machine-readable codes for error enums.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;
}

/// Errors produced by the session core and the auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Neither an access token nor a refresh credential is present.
    #[error("no session credential available")]
    NoCredential,

    /// The access token was rejected with 401 and could not be renewed.
    #[error("access token rejected after refresh")]
    ExpiredCredential,

    /// The refresh endpoint rejected the refresh credential.
    #[error("refresh rejected: status {status}")]
    RefreshFailure { status: u16 },

    /// Authenticated, but the role is not allowed on this page.
    #[error("role {role:?} is not permitted on this page")]
    UnauthorizedRole { role: Option<String> },

    /// The request never produced an HTTP response.
    #[error("transport error: {0}")]
    Transport(String),

    /// An auth endpoint answered with a status outside its contract.
    #[error("unexpected status {0}")]
    UnexpectedStatus(u16),

    /// An auth endpoint answered with a body that could not be parsed.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// The server refused the login; carries its message.
    #[error("{0}")]
    LoginRejected(String),

    /// The issued access token carries no decodable claims.
    #[error("invalid access token: {0}")]
    InvalidToken(#[from] ClaimsError),
}

impl AuthError {
    /// Where the presentation layer should go after this failure.
    #[must_use]
    pub fn redirect_target(&self) -> Route {
        match self {
            Self::UnauthorizedRole { .. } => Route::Home,
            _ => Route::Login,
        }
    }
}

impl ErrorCode for AuthError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NoCredential => "E_NO_CREDENTIAL",
            Self::ExpiredCredential => "E_EXPIRED_CREDENTIAL",
            Self::RefreshFailure { .. } => "E_REFRESH_FAILURE",
            Self::UnauthorizedRole { .. } => "E_UNAUTHORIZED_ROLE",
            Self::Transport(_) => "E_TRANSPORT",
            Self::UnexpectedStatus(_) => "E_UNEXPECTED_STATUS",
            Self::Decode(_) => "E_DECODE",
            Self::LoginRejected(_) => "E_LOGIN_REJECTED",
            Self::InvalidToken(_) => "E_INVALID_TOKEN",
        }
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
