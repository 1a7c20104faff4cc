//! REST client for the directory API.
//!
//! Browser builds (`hydrate`) talk to the API through `gloo-net` and keep the
//! session tokens in `localStorage`. Everything else runs against the
//! `Transport` and `TokenStore` seams so it can be exercised natively.

#![allow(non_snake_case)]

pub mod activity;
pub mod auth;
pub mod browser;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod search;
pub mod tokens;
pub mod transport;

#[cfg(test)]
mod testing;

pub use browser::BrowserTransport;
pub use client::ApiClient;
pub use endpoints::Endpoint;
pub use error::ApiError;
pub use search::{global_search, SearchHit, SearchKind};
pub use tokens::{LocalStorageTokens, MemoryTokens, TokenStore};
pub use transport::{ApiRequest, ApiResponse, Method, Transport};

/// Same-origin prefix the host forwards to the upstream REST API.
pub const API_BASE: &str = "/api";

/// Client used by the browser app.
pub type BrowserClient = ApiClient<BrowserTransport, LocalStorageTokens>;
