//! Storage ports for session state.
//!
//! ARCHITECTURE
//! ============
//! Two ports back a session: [`SessionStorage`] mirrors browser local storage
//! (synchronous string key/value), and [`RefreshCredentials`] stands in for the
//! HTTP-only `refresh_token` cookie. The core only talks to these traits, so
//! tests use [`MemoryStorage`], the CLI uses [`FileStorage`], and the browser
//! build uses `browser::LocalStorage` / `browser::DocumentCookie`.
//!
//! TRADE-OFFS
//! ==========
//! Writes are infallible from the caller's view, like `localStorage.setItem`.
//! Backends that can fail (files) log and drop the write instead of
//! propagating, since every caller treats storage as best-effort.

#[cfg(feature = "hydrate")]
pub mod browser;
pub mod file;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

pub use file::FileStorage;

/// Local storage key holding the opaque access token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Local storage key holding the JSON-serialized cached user.
pub const USER_KEY: &str = "user";
/// Cookie name of the refresh credential.
pub const REFRESH_COOKIE: &str = "refresh_token";

/// Synchronous string key/value store with local-storage semantics.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory storage. Cloning the `Arc` shares the same map.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
    }

    fn remove(&self, key: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

// =============================================================================
// REFRESH CREDENTIAL
// =============================================================================

/// How the refresh credential reaches the refresh endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshCredential {
    /// Readable credential; the transport sends it as a `Cookie` header.
    Token(String),
    /// HTTP-only cookie owned by the user agent; the transport sends
    /// credentials implicitly and the value is never visible to client code.
    Ambient,
}

/// Port over the refresh cookie.
pub trait RefreshCredentials: Send + Sync {
    /// Credential to present, or `None` when the session has none.
    fn load(&self) -> Option<RefreshCredential>;
    /// Persist a credential delivered in a login response body.
    fn store(&self, token: &str);
    /// Invalidate the credential (empty value, past expiry).
    fn expire(&self);
}

/// Refresh cookie kept in a [`SessionStorage`] under [`REFRESH_COOKIE`].
pub struct CookieJar {
    storage: Arc<dyn SessionStorage>,
}

impl CookieJar {
    #[must_use]
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage }
    }
}

impl RefreshCredentials for CookieJar {
    fn load(&self) -> Option<RefreshCredential> {
        self.storage
            .get(REFRESH_COOKIE)
            .filter(|value| !value.is_empty())
            .map(RefreshCredential::Token)
    }

    fn store(&self, token: &str) {
        self.storage.set(REFRESH_COOKIE, token);
    }

    fn expire(&self) {
        self.storage.remove(REFRESH_COOKIE);
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
