//! # defectdesk
//!
//! Client-side session core for the defect-tracking dashboards.
//!
//! Every role-gated page depends on two cooperating pieces: the
//! [`session::TokenManager`], which validates and transparently refreshes the
//! access token before data fetches, and the [`session::RoleGuard`], which
//! gates rendering on the role claim decoded from the locally cached token.
//! Both return decisions ([`session::SessionCheck`], [`session::GuardDecision`])
//! instead of navigating, so the presentation layer stays in charge of routing.
//!
//! Storage, the refresh cookie, HTTP, and navigation are ports
//! ([`storage::SessionStorage`], [`storage::RefreshCredentials`],
//! [`net::api::AuthApi`], [`routes::Navigator`]) with in-memory, file, and
//! browser implementations.

pub mod config;
pub mod error;
pub mod nav;
pub mod net;
pub mod pages;
pub mod routes;
pub mod session;
pub mod storage;
#[cfg(feature = "hydrate")]
pub mod util;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use config::ClientConfig;
pub use error::{AuthError, ErrorCode};
pub use routes::{Navigator, PageId, Role, Route};
pub use net::HttpClient;
pub use pages::{PageLoad, PageLoader};
pub use session::{GuardDecision, LoginFlow, RoleGuard, RoleGuardResult, SessionCheck, SessionStore, TokenManager};
