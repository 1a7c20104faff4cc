use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("invalid upstream url: {0}")]
    InvalidUpstream(String),
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        tracing::warn!("proxy: {self}");
        let message = match self {
            ProxyError::InvalidUpstream(_) => "gateway misconfigured",
            ProxyError::Upstream(ref e) if e.is_timeout() => "upstream timed out",
            ProxyError::Upstream(_) => "upstream unavailable",
        };
        (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse {
                error: message.into(),
            }),
        )
            .into_response()
    }
}
