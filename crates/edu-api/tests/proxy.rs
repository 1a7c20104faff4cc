use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Request, StatusCode, Uri};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower::ServiceExt;

use edu_api::{api_router, AppState};

async fn echo(uri: Uri, headers: HeaderMap, body: String) -> Json<Value> {
    Json(json!({
        "path": uri.path(),
        "query": uri.query(),
        "authorization": headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()),
        "cookie": headers.contains_key(header::COOKIE),
        "body": body,
    }))
}

async fn spawn_upstream() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, Router::new().fallback(echo)).await.unwrap();
    });
    format!("http://{addr}/api/v1")
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn forwards_path_query_and_auth() {
    let upstream = spawn_upstream().await;
    let app = api_router(AppState::new(&upstream, Duration::from_secs(5)).unwrap());

    let request = Request::builder()
        .method("POST")
        .uri("/api/comments/?center=4")
        .header(header::AUTHORIZATION, "Bearer token-1")
        .header(header::COOKIE, "theme=dark")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"text":"Great"}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    let echoed = body_json(response).await;
    assert_eq!(echoed["path"], "/api/v1/comments/");
    assert_eq!(echoed["query"], "center=4");
    assert_eq!(echoed["authorization"], "Bearer token-1");
    assert_eq!(echoed["cookie"], false);
    assert_eq!(echoed["body"], r#"{"text":"Great"}"#);
}

#[tokio::test]
async fn unreachable_upstream_is_bad_gateway() {
    // Nothing listens on the discard port in the test environment.
    let app = api_router(AppState::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap());

    let request = Request::builder()
        .uri("/api/centers/")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn healthz_reports_ok() {
    let app = api_router(AppState::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap());

    let response = app
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "status": "ok" }));
}
