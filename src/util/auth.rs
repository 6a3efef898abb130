//! Leptos wiring for the role guard and the session check.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every role-gated route component installs both helpers on mount. The
//! guard decides synchronously from the stored token; the session check runs
//! in the background and is cancelled when the component unmounts.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use tokio_util::sync::CancellationToken;

use crate::routes::{Navigator, Role, Route};
use crate::session::{RoleGuard, RoleGuardResult, SessionStore, TokenManager};
use crate::storage::browser::{DocumentCookie, LocalStorage};

/// Session backed by `localStorage` and the `refresh_token` cookie.
#[must_use]
pub fn browser_session() -> SessionStore {
    SessionStore::new(Arc::new(LocalStorage), Arc::new(DocumentCookie))
}

/// Adapts a `leptos_router` navigate function to [`Navigator`].
pub struct RouterNavigator<F>(pub F);

impl<F> Navigator for RouterNavigator<F>
where
    F: Fn(&str, NavigateOptions),
{
    fn navigate(&self, route: Route) {
        (self.0)(route.path(), NavigateOptions::default());
    }
}

/// Gate the current route on `allowed`, redirecting at most once per
/// allow-list.
pub fn install_role_guard<F>(
    store: SessionStore,
    allowed: Signal<Vec<Role>>,
    navigate: F,
) -> ReadSignal<RoleGuardResult>
where
    F: Fn(&str, NavigateOptions) + 'static,
{
    let guard = StoredValue::new(RoleGuard::new(Vec::new()));
    let (result, set_result) = signal(RoleGuardResult { loading: true, role: None });
    let navigator = RouterNavigator(navigate);

    Effect::new(move || {
        let allowed = allowed.get();
        let next = guard.try_update_value(|guard| {
            guard.set_allowed(allowed);
            guard.apply(&store, &navigator)
        });
        if let Some(next) = next {
            set_result.set(next);
        }
    });
    result
}

/// Validate the session in the background. The signal holds `None` until the
/// check finishes; an unmount cancels the check without side effects.
pub fn install_session_check<F>(tokens: TokenManager, navigate: F) -> ReadSignal<Option<bool>>
where
    F: Fn(&str, NavigateOptions) + 'static,
{
    let (valid, set_valid) = signal(None);
    let cancel = CancellationToken::new();
    on_cleanup({
        let cancel = cancel.clone();
        move || cancel.cancel()
    });

    leptos::task::spawn_local(async move {
        let navigator = RouterNavigator(navigate);
        let ok = tokens.check_and_navigate(&cancel, &navigator).await;
        if !cancel.is_cancelled() {
            set_valid.set(Some(ok));
        }
    });
    valid
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
