//! Browser integration helpers (`hydrate` only).
//!
//! SYSTEM CONTEXT
//! ==============
//! Keeps `leptos` wiring out of the session core so the core stays testable
//! without a browser.

pub mod auth;
