//! Role gating from the locally cached access token.
//!
//! The guard never calls the server. It decodes the stored token's role claim
//! and compares it with the page's allow-list. Decode failures fail closed to
//! `/login`; a known session with the wrong role goes home instead.
//!
//! A decision is computed once per allow-list and cached, so repeated
//! evaluation on re-render returns the same decision and never triggers a
//! second redirect.

use crate::error::{AuthError, ErrorCode};
use crate::routes::{Navigator, PageId, Role, Route};

use super::store::SessionStore;

/// Outcome of evaluating a guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the page for this role.
    Allowed(Role),
    /// Navigate away; never render role-gated content.
    Redirect(Route),
    /// Not evaluated yet.
    Pending,
}

/// Render state exposed to pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleGuardResult {
    pub loading: bool,
    pub role: Option<Role>,
}

impl RoleGuardResult {
    /// Whether role-gated content may be rendered.
    #[must_use]
    pub fn may_render(&self) -> bool {
        !self.loading && self.role.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct RoleGuard {
    allowed: Vec<Role>,
    decision: Option<GuardDecision>,
}

impl RoleGuard {
    #[must_use]
    pub fn new(allowed: impl Into<Vec<Role>>) -> Self {
        Self { allowed: allowed.into(), decision: None }
    }

    #[must_use]
    pub fn for_page(page: PageId) -> Self {
        Self::new(page.allowed_roles())
    }

    #[must_use]
    pub fn allowed(&self) -> &[Role] {
        &self.allowed
    }

    /// Replace the allow-list. An equal list keeps the cached decision.
    pub fn set_allowed(&mut self, allowed: impl Into<Vec<Role>>) {
        let allowed = allowed.into();
        if allowed != self.allowed {
            self.allowed = allowed;
            self.decision = None;
        }
    }

    /// Current decision without evaluating.
    #[must_use]
    pub fn decision(&self) -> GuardDecision {
        self.decision.unwrap_or(GuardDecision::Pending)
    }

    /// Decide once per allow-list; later calls return the cached decision.
    pub fn evaluate(&mut self, store: &SessionStore) -> GuardDecision {
        if let Some(decision) = self.decision {
            return decision;
        }
        let decision = decide(&self.allowed, store);
        self.decision = Some(decision);
        decision
    }

    /// Evaluate and navigate on a fresh redirect. A cached decision never
    /// navigates again.
    pub fn apply(&mut self, store: &SessionStore, navigator: &dyn Navigator) -> RoleGuardResult {
        let first = self.decision.is_none();
        let decision = self.evaluate(store);
        if let (true, GuardDecision::Redirect(route)) = (first, decision) {
            navigator.navigate(route);
        }
        self.result()
    }

    /// Render state. A login redirect keeps `loading` set since the page is
    /// about to unmount.
    #[must_use]
    pub fn result(&self) -> RoleGuardResult {
        match self.decision() {
            GuardDecision::Allowed(role) => RoleGuardResult { loading: false, role: Some(role) },
            GuardDecision::Redirect(Route::Login) | GuardDecision::Pending => {
                RoleGuardResult { loading: true, role: None }
            }
            GuardDecision::Redirect(_) => RoleGuardResult { loading: false, role: None },
        }
    }
}

fn decide(allowed: &[Role], store: &SessionStore) -> GuardDecision {
    let claims = match store.claims() {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(error = %e, "no decodable session; redirecting to login");
            return GuardDecision::Redirect(Route::Login);
        }
    };
    match claims.role() {
        Some(role) if allowed.contains(&role) => GuardDecision::Allowed(role),
        _ => {
            let denied = AuthError::UnauthorizedRole { role: claims.role };
            tracing::info!(code = denied.error_code(), error = %denied, "role not permitted");
            GuardDecision::Redirect(denied.redirect_target())
        }
    }
}

#[cfg(test)]
#[path = "role_guard_test.rs"]
mod tests;
