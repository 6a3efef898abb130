//! Session creation and destruction.

use std::sync::Arc;

use crate::error::AuthError;
use crate::net::api::AuthApi;
use crate::net::types::LoginRequest;
use crate::routes::{PageId, Role, Route};

use super::claims::TokenClaims;
use super::store::SessionStore;

#[derive(Clone)]
pub struct LoginFlow {
    api: Arc<dyn AuthApi>,
    store: SessionStore,
}

impl LoginFlow {
    #[must_use]
    pub fn new(api: Arc<dyn AuthApi>, store: SessionStore) -> Self {
        Self { api, store }
    }

    /// Authenticate and persist the session; returns the role's landing page.
    ///
    /// # Errors
    ///
    /// [`AuthError::LoginRejected`] with the server's message, transport
    /// failures, or [`AuthError::InvalidToken`] when the issued token carries
    /// no claims. Storage is untouched on every error.
    pub async fn login(&self, email: &str, password: &str) -> Result<Route, AuthError> {
        let request = LoginRequest { email: email.trim().to_owned(), password: password.to_owned() };
        let response = self.api.login(&request).await?;
        let claims = TokenClaims::decode(&response.access_token)?;
        self.store.begin(&response);

        let role = claims.role();
        tracing::info!(role = ?claims.role, "logged in");
        Ok(role.map_or(Route::Home, Role::landing_route))
    }

    /// Login-page mount: skip the form when a decodable token is stored.
    ///
    /// An undecodable token is dropped and the form stays.
    #[must_use]
    pub fn resume(&self) -> Option<Route> {
        let token = self.store.access_token()?;
        match TokenClaims::decode(&token) {
            Ok(claims) if claims.role() == Some(Role::Admin) => Some(Route::Page(PageId::AdminUsers)),
            Ok(_) => Some(Route::Home),
            Err(e) => {
                tracing::debug!(error = %e, "stored token unreadable; discarding");
                self.store.clear_local();
                None
            }
        }
    }

    /// End the session server-side (best effort) and locally.
    pub async fn logout(&self) -> Route {
        let credential = self.store.refresh_credential();
        if let Err(e) = self.api.logout(credential.as_ref()).await {
            tracing::warn!(error = %e, "server logout failed; clearing local session anyway");
        }
        self.store.teardown();
        tracing::info!("logged out");
        Route::Login
    }
}

#[cfg(test)]
#[path = "login_test.rs"]
mod tests;
