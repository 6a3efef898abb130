//! Explicit session object over the storage ports.
//!
//! SYSTEM CONTEXT
//! ==============
//! Replaces ambient `localStorage` / cookie access. The access token entry is
//! the only value mutated concurrently (by refresh); writes are whole-value
//! overwrites of equivalent freshly issued tokens, so last write wins.

use std::sync::Arc;

use crate::net::types::{CachedUser, LoginResponse};
use crate::storage::{ACCESS_TOKEN_KEY, RefreshCredential, RefreshCredentials, SessionStorage, USER_KEY};

use super::claims::{ClaimsError, TokenClaims};

#[derive(Clone)]
pub struct SessionStore {
    local: Arc<dyn SessionStorage>,
    refresh: Arc<dyn RefreshCredentials>,
}

impl SessionStore {
    #[must_use]
    pub fn new(local: Arc<dyn SessionStorage>, refresh: Arc<dyn RefreshCredentials>) -> Self {
        Self { local, refresh }
    }

    /// Current access token; empty values count as absent.
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.local.get(ACCESS_TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn set_access_token(&self, token: &str) {
        self.local.set(ACCESS_TOKEN_KEY, token);
    }

    /// Cached user profile. A corrupt entry reads as absent.
    #[must_use]
    pub fn cached_user(&self) -> Option<CachedUser> {
        let raw = self.local.get(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::debug!(error = %e, "cached user unreadable");
                None
            }
        }
    }

    pub fn set_cached_user(&self, user: &CachedUser) {
        match serde_json::to_string(user) {
            Ok(raw) => self.local.set(USER_KEY, &raw),
            Err(e) => tracing::warn!(error = %e, "cached user serialize failed"),
        }
    }

    #[must_use]
    pub fn refresh_credential(&self) -> Option<RefreshCredential> {
        self.refresh.load()
    }

    /// Decode the current access token's claims.
    ///
    /// # Errors
    ///
    /// [`ClaimsError::Missing`] without a token, otherwise the decode failure.
    pub fn claims(&self) -> Result<TokenClaims, ClaimsError> {
        let token = self.access_token().ok_or(ClaimsError::Missing)?;
        TokenClaims::decode(&token)
    }

    /// Persist a successful login.
    pub fn begin(&self, login: &LoginResponse) {
        self.set_access_token(&login.access_token);
        self.set_cached_user(&login.user);
        if let Some(refresh_token) = login.refresh_token.as_deref().filter(|t| !t.is_empty()) {
            self.refresh.store(refresh_token);
        }
    }

    /// Drop the access token and cached user; the refresh cookie survives.
    pub fn clear_local(&self) {
        self.local.remove(ACCESS_TOKEN_KEY);
        self.local.remove(USER_KEY);
    }

    /// Destroy the whole session, including the refresh cookie.
    pub fn teardown(&self) {
        self.clear_local();
        self.refresh.expire();
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
