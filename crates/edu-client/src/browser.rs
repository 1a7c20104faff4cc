use async_trait::async_trait;

use crate::error::ApiError;
use crate::transport::{ApiRequest, ApiResponse, Transport};

/// `fetch`-backed transport for the hydrated app.
#[derive(Clone, Debug)]
pub struct BrowserTransport {
    base: String,
}

impl BrowserTransport {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base)
        } else {
            format!("{}/{path}", self.base)
        }
    }
}

#[async_trait(?Send)]
impl Transport for BrowserTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            use crate::transport::Method;
            use gloo_net::http::Request;

            let url = self.url_for(&request.path);
            let mut builder = match request.method {
                Method::Get => Request::get(&url),
                Method::Post => Request::post(&url),
                Method::Put => Request::put(&url),
                Method::Patch => Request::patch(&url),
                Method::Delete => Request::delete(&url),
            }
            .header("Accept", "application/json");

            if !request.query.is_empty() {
                builder = builder.query(request.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
            }
            if let Some(token) = &request.bearer {
                builder = builder.header("Authorization", &format!("Bearer {token}"));
            }

            let sent = match &request.body {
                Some(body) => {
                    builder
                        .json(body)
                        .map_err(|e| ApiError::Network(e.to_string()))?
                        .send()
                        .await
                }
                None => builder.send().await,
            };
            let response = sent.map_err(|e| {
                log::warn!("{} {} failed: {e}", request.method.as_str(), request.path);
                ApiError::Network(e.to_string())
            })?;

            let status = response.status();
            read_body(request, status, response.text().await)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = request;
            Err(ApiError::Unavailable)
        }
    }
}

/// A body that could not be read fails the request rather than
/// reaching the decoder as an empty string.
#[cfg_attr(not(feature = "hydrate"), allow(dead_code))]
fn read_body<E: std::fmt::Display>(
    request: &ApiRequest,
    status: u16,
    body: Result<String, E>,
) -> Result<ApiResponse, ApiError> {
    let body = body.map_err(|e| {
        log::warn!("{} {}: body read failed: {e}", request.method.as_str(), request.path);
        ApiError::Network(e.to_string())
    })?;
    Ok(ApiResponse { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_base_and_path() {
        let transport = BrowserTransport::new("/api/");
        assert_eq!(transport.url_for("/centers/"), "/api/centers/");
        assert_eq!(transport.url_for("centers/3/"), "/api/centers/3/");
    }

    #[test]
    fn unreadable_body_is_a_network_error() {
        let request = ApiRequest::get("/centers/");
        let err = read_body(&request, 200, Err("stream reset")).unwrap_err();
        assert_eq!(err, ApiError::Network("stream reset".into()));

        let ok = read_body::<String>(&request, 204, Ok(String::new())).unwrap();
        assert_eq!(ok.status, 204);
    }
}
