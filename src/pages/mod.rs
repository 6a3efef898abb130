//! Page loading and list view-models.
//!
//! ERROR HANDLING
//! ==============
//! One policy for every page:
//! - session failures from the token check redirect (`/login`, or `/` for a
//!   role mismatch);
//! - a resource `401` drops the local session and redirects to `/login`;
//! - a resource `403` redirects home with the session intact;
//! - anything else becomes [`PageLoad::Failed`] with an inline message.

pub mod admin;
pub mod dashboard;
pub mod defects;
pub mod reports;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::error::ErrorCode;
use crate::net::api::{FetchError, Method, ResourceApi, ResourceRequest};
use crate::routes::{PageId, Route};
use crate::session::{GuardDecision, RoleGuard, SessionCheck, TokenManager, until_cancelled};

/// State of a page's data.
#[derive(Debug, Clone, PartialEq)]
pub enum PageLoad<T> {
    Loading,
    Ready(T),
    Redirect(Route),
    /// Non-auth failure, shown inline; the session is untouched.
    Failed(String),
    /// The page went away before the load finished.
    Cancelled,
}

impl<T> PageLoad<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> PageLoad<U> {
        match self {
            Self::Ready(value) => PageLoad::Ready(f(value)),
            Self::Loading => PageLoad::Loading,
            Self::Redirect(route) => PageLoad::Redirect(route),
            Self::Failed(message) => PageLoad::Failed(message),
            Self::Cancelled => PageLoad::Cancelled,
        }
    }

    /// Chain a fallible step onto a ready value.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> PageLoad<U>) -> PageLoad<U> {
        match self {
            Self::Ready(value) => f(value),
            Self::Loading => PageLoad::Loading,
            Self::Redirect(route) => PageLoad::Redirect(route),
            Self::Failed(message) => PageLoad::Failed(message),
            Self::Cancelled => PageLoad::Cancelled,
        }
    }

    /// Split off a ready value; any other state carries over to `PageLoad<U>`.
    ///
    /// # Errors
    ///
    /// Returns the non-ready state, retyped, when `self` is not `Ready`.
    pub fn into_ready<U>(self) -> Result<T, PageLoad<U>> {
        match self {
            Self::Ready(value) => Ok(value),
            Self::Loading => Err(PageLoad::Loading),
            Self::Redirect(route) => Err(PageLoad::Redirect(route)),
            Self::Failed(message) => Err(PageLoad::Failed(message)),
            Self::Cancelled => Err(PageLoad::Cancelled),
        }
    }

    #[must_use]
    pub fn ready(self) -> Option<T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn redirect(&self) -> Option<Route> {
        match self {
            Self::Redirect(route) => Some(*route),
            _ => None,
        }
    }
}

/// Decode a JSON payload into a view type.
pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> PageLoad<T> {
    match serde_json::from_value(value) {
        Ok(decoded) => PageLoad::Ready(decoded),
        Err(e) => {
            tracing::warn!(error = %e, "unexpected payload shape");
            PageLoad::Failed(format!("response decode failed: {e}"))
        }
    }
}

// =============================================================================
// LOADER
// =============================================================================

/// Runs the guard, the token check, and the authenticated fetch for pages.
#[derive(Clone)]
pub struct PageLoader {
    tokens: TokenManager,
    api: Arc<dyn ResourceApi>,
}

impl PageLoader {
    #[must_use]
    pub fn new(tokens: TokenManager, api: Arc<dyn ResourceApi>) -> Self {
        Self { tokens, api }
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    /// Load `page`'s data: guard, then token check, then fetch.
    pub async fn load<T: DeserializeOwned>(&self, page: PageId, cancel: &CancellationToken) -> PageLoad<T> {
        let mut guard = RoleGuard::for_page(page);
        if let GuardDecision::Redirect(route) = guard.evaluate(self.tokens.store()) {
            return PageLoad::Redirect(route);
        }
        self.call(Method::Get, page.data_endpoint(), None, cancel).await.and_then(decode)
    }

    /// Authenticated request outside a page load (mutations).
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        cancel: &CancellationToken,
    ) -> PageLoad<Value> {
        match self.tokens.check_token(cancel).await {
            SessionCheck::Valid => {}
            SessionCheck::Denied(e) => return PageLoad::Redirect(e.redirect_target()),
            SessionCheck::Cancelled => return PageLoad::Cancelled,
        }
        let Some(bearer) = self.tokens.store().access_token() else {
            return PageLoad::Redirect(Route::Login);
        };

        let request = ResourceRequest { method, path: path.to_owned(), bearer, body };
        match until_cancelled(cancel, self.api.send(request)).await {
            None => PageLoad::Cancelled,
            Some(result) => self.settle(path, result),
        }
    }

    fn settle(&self, path: &str, result: Result<Value, FetchError>) -> PageLoad<Value> {
        match result {
            Ok(value) => PageLoad::Ready(value),
            Err(FetchError::Unauthorized) => {
                tracing::warn!(path, "resource rejected the session");
                self.tokens.store().clear_local();
                PageLoad::Redirect(Route::Login)
            }
            Err(FetchError::Forbidden) => {
                tracing::info!(path, "resource forbidden for this role");
                PageLoad::Redirect(Route::Home)
            }
            Err(e) => {
                tracing::warn!(path, code = e.error_code(), error = %e, "resource request failed");
                PageLoad::Failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
