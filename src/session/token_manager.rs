//! Access-token validation with transparent refresh.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages call [`TokenManager::check_token`] before every authenticated fetch.
//! The server is the authority: the token is introspected, not decoded.
//!
//! STATE MACHINE
//! =============
//! ```text
//! START -> has access token? -- no --> REFRESH
//!            | yes
//!            v
//!        INTROSPECT -- 2xx --> VALID
//!            |-- 401, not yet refreshed --> REFRESH -> INTROSPECT
//!            |-- 401, already refreshed --> INVALID (teardown)
//!            '-- other --> INVALID (clear local)
//! REFRESH -- no credential --> INVALID (clear local)
//!         -- failure --> INVALID (teardown)
//! ```
//! A chain refreshes at most once. Concurrent chains may each refresh; the
//! last token written wins, and every written token is freshly issued.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::{AuthError, ErrorCode};
use crate::net::api::{AuthApi, Introspection};
use crate::routes::{Navigator, Route};

use super::store::SessionStore;
use super::until_cancelled;

/// Terminal state of one check chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCheck {
    /// The server accepted the (possibly refreshed) access token.
    Valid,
    /// No valid session could be established.
    Denied(AuthError),
    /// The caller went away; storage was left as found at cancellation.
    Cancelled,
}

impl SessionCheck {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Navigation the presentation layer should perform, if any.
    #[must_use]
    pub fn redirect(&self) -> Option<Route> {
        match self {
            Self::Denied(err) => Some(err.redirect_target()),
            Self::Valid | Self::Cancelled => None,
        }
    }
}

#[derive(Clone)]
pub struct TokenManager {
    api: Arc<dyn AuthApi>,
    store: SessionStore,
}

impl TokenManager {
    #[must_use]
    pub fn new(api: Arc<dyn AuthApi>, store: SessionStore) -> Self {
        Self { api, store }
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Validate the access token, refreshing it once if needed.
    pub async fn check_token(&self, cancel: &CancellationToken) -> SessionCheck {
        let mut refreshed = false;
        loop {
            let Some(token) = self.store.access_token() else {
                if refreshed {
                    tracing::warn!("refresh produced no usable access token");
                    self.store.teardown();
                    return SessionCheck::Denied(AuthError::ExpiredCredential);
                }
                tracing::debug!("no access token; refreshing");
                match self.refresh(cancel).await {
                    SessionCheck::Valid => {
                        refreshed = true;
                        continue;
                    }
                    other => return other,
                }
            };

            let Some(introspection) = until_cancelled(cancel, self.api.check_token(&token)).await else {
                tracing::debug!("token check cancelled");
                return SessionCheck::Cancelled;
            };

            match introspection {
                Ok(Introspection::Valid) => {
                    tracing::debug!(refreshed, "access token valid");
                    return SessionCheck::Valid;
                }
                Ok(Introspection::Unauthorized) if refreshed => {
                    tracing::warn!("refreshed access token rejected; ending session");
                    self.store.teardown();
                    return SessionCheck::Denied(AuthError::ExpiredCredential);
                }
                Ok(Introspection::Unauthorized) => {
                    tracing::debug!("access token expired; refreshing");
                    match self.refresh(cancel).await {
                        SessionCheck::Valid => refreshed = true,
                        other => return other,
                    }
                }
                Err(e) => {
                    tracing::warn!(code = e.error_code(), error = %e, "token introspection failed");
                    self.store.clear_local();
                    return SessionCheck::Denied(e);
                }
            }
        }
    }

    /// Mint a new access token from the refresh credential.
    ///
    /// `Valid` means a new token was stored.
    pub(crate) async fn refresh(&self, cancel: &CancellationToken) -> SessionCheck {
        let Some(credential) = self.store.refresh_credential() else {
            tracing::info!("no refresh credential; login required");
            self.store.clear_local();
            return SessionCheck::Denied(AuthError::NoCredential);
        };

        match until_cancelled(cancel, self.api.refresh(&credential)).await {
            None => {
                tracing::debug!("refresh cancelled");
                SessionCheck::Cancelled
            }
            Some(Ok(access_token)) => {
                self.store.set_access_token(&access_token);
                tracing::info!("access token refreshed");
                SessionCheck::Valid
            }
            Some(Err(e)) => {
                tracing::warn!(code = e.error_code(), error = %e, "refresh failed; ending session");
                self.store.teardown();
                SessionCheck::Denied(e)
            }
        }
    }

    /// Run [`Self::check_token`] and apply its redirect through `navigator`.
    pub async fn check_and_navigate(&self, cancel: &CancellationToken, navigator: &dyn Navigator) -> bool {
        let check = self.check_token(cancel).await;
        if let Some(route) = check.redirect() {
            navigator.navigate(route);
        }
        check.is_valid()
    }
}

#[cfg(test)]
#[path = "token_manager_test.rs"]
mod tests;
