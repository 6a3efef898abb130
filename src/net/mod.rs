//! HTTP ports, wire types, and the reqwest transport.

pub mod api;
pub mod http;
pub mod types;

pub use api::{AuthApi, FetchError, Introspection, Method, ResourceApi, ResourceRequest};
pub use http::HttpClient;
