//! Browser-backed storage ports (`hydrate` only).
//!
//! Both types are stateless handles that look up `window` on each call, which
//! keeps them `Send + Sync` even though `web-sys` handles are not.

use wasm_bindgen::JsCast;
use web_sys::HtmlDocument;

use super::{REFRESH_COOKIE, RefreshCredential, RefreshCredentials, SessionStorage};

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

fn html_document() -> Option<HtmlDocument> {
    web_sys::window()?.document()?.dyn_into::<HtmlDocument>().ok()
}

/// `window.localStorage`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl SessionStorage for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        local_storage()?.get_item(key).unwrap_or_default()
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = local_storage() {
            if storage.set_item(key, value).is_err() {
                tracing::warn!(key, "localStorage write rejected");
            }
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = local_storage() {
            if storage.remove_item(key).is_err() {
                tracing::warn!(key, "localStorage remove rejected");
            }
        }
    }
}

/// The `refresh_token` cookie as seen from page script.
///
/// The server sets it HTTP-only, so its value is never readable: [`load`]
/// always reports [`RefreshCredential::Ambient`] and the server decides.
///
/// [`load`]: RefreshCredentials::load
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentCookie;

impl DocumentCookie {
    fn write(cookie: &str) {
        let Some(document) = html_document() else {
            return;
        };
        if document.set_cookie(cookie).is_err() {
            tracing::warn!("document.cookie write rejected");
        }
    }
}

impl RefreshCredentials for DocumentCookie {
    fn load(&self) -> Option<RefreshCredential> {
        Some(RefreshCredential::Ambient)
    }

    fn store(&self, token: &str) {
        Self::write(&format!("{REFRESH_COOKIE}={token}; path=/"));
    }

    fn expire(&self) {
        Self::write(&format!("{REFRESH_COOKIE}=; expires=Thu, 01 Jan 1970 00:00:00 GMT; path=/"));
    }
}
