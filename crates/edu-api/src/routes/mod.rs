pub mod health;
pub mod proxy;

use axum::Router;

use crate::state::AppState;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(proxy::routes())
}
