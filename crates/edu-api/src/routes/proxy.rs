use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, Method, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use http::header::{self, HeaderName};

use crate::error::ProxyError;
use crate::state::AppState;

pub const BODY_LIMIT: usize = 10 * 1024 * 1024;
pub const API_PREFIX: &str = "/api";

/// Request headers passed through to the upstream. Cookies and hop-by-hop
/// headers stay at the gateway.
const FORWARDED_HEADERS: [HeaderName; 4] = [
    header::AUTHORIZATION,
    header::CONTENT_TYPE,
    header::ACCEPT,
    header::ACCEPT_LANGUAGE,
];

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/*rest", any(forward))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
}

pub fn upstream_url(base: &str, path: &str, query: Option<&str>) -> String {
    let rest = path.strip_prefix(API_PREFIX).unwrap_or(path);
    let mut url = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        rest.trim_start_matches('/')
    );
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        url.push('?');
        url.push_str(query);
    }
    url
}

pub fn forwarded_headers(incoming: &HeaderMap) -> HeaderMap {
    let mut outgoing = HeaderMap::new();
    for name in FORWARDED_HEADERS.iter() {
        for value in incoming.get_all(name) {
            outgoing.append(name.clone(), value.clone());
        }
    }
    outgoing
}

async fn forward(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ProxyError> {
    let url = upstream_url(&state.upstream, uri.path(), uri.query());
    tracing::debug!("proxy {method} {url}");

    let mut request = state
        .http
        .request(method, url)
        .headers(forwarded_headers(&headers));
    if !body.is_empty() {
        request = request.body(body);
    }

    let upstream = request.send().await?;
    let status = upstream.status();
    let contentType = upstream.headers().get(header::CONTENT_TYPE).cloned();
    let payload = upstream.bytes().await?;

    let mut response = (status, payload).into_response();
    match contentType {
        Some(value) => {
            response.headers_mut().insert(header::CONTENT_TYPE, value);
        }
        None => {
            response.headers_mut().remove(header::CONTENT_TYPE);
        }
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use http::HeaderValue;

    use super::*;

    #[test]
    fn maps_api_path_onto_upstream_base() {
        assert_eq!(
            upstream_url("https://edu.example.com/api/v1/", "/api/centers/", Some("page=2&search=math")),
            "https://edu.example.com/api/v1/centers/?page=2&search=math"
        );
        assert_eq!(
            upstream_url("http://localhost:8000", "/api/auth/me/", None),
            "http://localhost:8000/auth/me/"
        );
        assert_eq!(
            upstream_url("http://localhost:8000", "/api/regions/", Some("")),
            "http://localhost:8000/regions/"
        );
    }

    #[test]
    fn only_allowed_headers_pass() {
        let mut incoming = HeaderMap::new();
        incoming.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        incoming.insert(header::COOKIE, HeaderValue::from_static("session=1"));
        incoming.insert(header::HOST, HeaderValue::from_static("localhost:3000"));
        incoming.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static("uz"));

        let outgoing = forwarded_headers(&incoming);

        assert_eq!(outgoing.len(), 2);
        assert_eq!(outgoing[header::AUTHORIZATION], "Bearer abc");
        assert!(outgoing.get(header::COOKIE).is_none());
    }
}
