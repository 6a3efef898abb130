//! Session core: token lifecycle, role gating, and login/logout.
//!
//! ARCHITECTURE
//! ============
//! [`SessionStore`] is the only owner of persisted session state.
//! [`TokenManager`] validates and refreshes the access token against the
//! server; [`RoleGuard`] gates rendering on the locally decoded role claim;
//! [`LoginFlow`] creates and destroys sessions. None of them navigate: they
//! return decisions and the presentation layer applies them.
//!
//! Async chains take a [`CancellationToken`]. Once it fires, the chain stops
//! at its next suspension point without touching storage.

pub mod claims;
pub mod login;
pub mod role_guard;
pub mod store;
pub mod token_manager;

use std::future::Future;
use std::pin::pin;

use futures::future::{Either, select};
use tokio_util::sync::CancellationToken;

pub use claims::{ClaimsError, TokenClaims};
pub use login::LoginFlow;
pub use role_guard::{GuardDecision, RoleGuard, RoleGuardResult};
pub use store::SessionStore;
pub use token_manager::{SessionCheck, TokenManager};

/// Drive `fut` unless `cancel` fires first. `None` means cancelled.
pub(crate) async fn until_cancelled<F: Future>(cancel: &CancellationToken, fut: F) -> Option<F::Output> {
    if cancel.is_cancelled() {
        return None;
    }
    let cancelled = pin!(cancel.cancelled());
    let fut = pin!(fut);
    match select(cancelled, fut).await {
        Either::Left(_) => None,
        Either::Right((output, _)) => Some(output),
    }
}
