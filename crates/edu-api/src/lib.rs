#![allow(non_snake_case)]

//! Same-origin gateway for the browser app.
//!
//! Everything under `/api/` is forwarded to the upstream REST API so the
//! WASM client never needs CORS or the upstream hostname.

pub mod error;
pub mod routes;
pub mod state;

use axum::Router;

pub use crate::error::ProxyError;
pub use crate::state::AppState;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .with_state(state)
}
