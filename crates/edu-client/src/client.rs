use std::rc::Rc;

use edu_types::{RefreshRequest, RefreshResponse};
use futures::lock::Mutex;
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::tokens::TokenStore;
use crate::transport::{ApiRequest, ApiResponse, Transport};

pub const REFRESH_PATH: &str = "/auth/token/refresh/";

/// REST client wrapper: bearer injection plus a single refresh-and-retry
/// on 401.
///
/// Clones share one refresh lock, so concurrent 401s trigger a single
/// refresh call and the rest retry with the token it produced.
pub struct ApiClient<T, S> {
    transport: Rc<T>,
    tokens: Rc<S>,
    refreshing: Rc<Mutex<()>>,
    on_expired: Option<Rc<dyn Fn()>>,
}

impl<T, S> Clone for ApiClient<T, S> {
    fn clone(&self) -> Self {
        Self {
            transport: Rc::clone(&self.transport),
            tokens: Rc::clone(&self.tokens),
            refreshing: Rc::clone(&self.refreshing),
            on_expired: self.on_expired.clone(),
        }
    }
}

impl<T: Transport, S: TokenStore> ApiClient<T, S> {
    pub fn new(transport: T, tokens: S) -> Self {
        Self {
            transport: Rc::new(transport),
            tokens: Rc::new(tokens),
            refreshing: Rc::new(Mutex::new(())),
            on_expired: None,
        }
    }

    /// Hook run after the session is dropped because it could not be
    /// refreshed. The browser app redirects to the login page here.
    pub fn on_session_expired(mut self, hook: impl Fn() + 'static) -> Self {
        self.on_expired = Some(Rc::new(hook));
        self
    }

    pub fn tokens(&self) -> &S {
        &self.tokens
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send a request through the auth pipeline.
    ///
    /// Returns the raw response for every status except a 401 that could
    /// not be recovered, which becomes `ApiError::Unauthorized`.
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        if request.anonymous {
            return self.transport.send(&request).await;
        }

        let mut request = request;
        request.bearer = self.tokens.access();
        let response = self.transport.send(&request).await?;
        if response.status != 401 {
            return Ok(response);
        }

        let Some(access) = self.recover_access(request.bearer.as_deref()).await else {
            return Err(ApiError::Unauthorized);
        };

        request.bearer = Some(access);
        let retried = self.transport.send(&request).await?;
        if retried.status == 401 {
            log::warn!("{} still unauthorized after token refresh", request.path);
            self.expire();
            return Err(ApiError::Unauthorized);
        }
        Ok(retried)
    }

    /// Access token to retry with after `stale` got a 401, or `None` once
    /// the session is gone.
    async fn recover_access(&self, stale: Option<&str>) -> Option<String> {
        let _guard = self.refreshing.lock().await;

        // Another request refreshed while this one waited for the lock.
        if let Some(current) = self.tokens.access() {
            if stale != Some(current.as_str()) {
                return Some(current);
            }
        }

        if self.tokens.refresh().is_none() {
            if stale.is_some() {
                self.expire();
            }
            return None;
        }

        match self.refresh_access().await {
            Ok(access) => Some(access),
            Err(e) => {
                log::warn!("token refresh failed: {e}");
                self.expire();
                None
            }
        }
    }

    pub async fn send_json<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, ApiError> {
        let response = self.execute(request).await?;
        decode_json(&response)
    }

    pub async fn send_unit(&self, request: ApiRequest) -> Result<(), ApiError> {
        let response = self.execute(request).await?;
        ensure_success(&response)
    }

    async fn refresh_access(&self) -> Result<String, ApiError> {
        let refresh = self.tokens.refresh().ok_or(ApiError::Unauthorized)?;
        let body = serde_json::to_value(RefreshRequest { refresh })
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        let response = self
            .transport
            .send(&ApiRequest::post(REFRESH_PATH, body).anonymous())
            .await?;
        let refreshed: RefreshResponse = decode_json(&response)?;

        self.tokens.set_access(&refreshed.access);
        if let Some(rotated) = refreshed.refresh.as_deref().filter(|r| !r.is_empty()) {
            self.tokens.set_refresh(rotated);
        }
        Ok(refreshed.access)
    }

    fn expire(&self) {
        self.tokens.clear();
        if let Some(hook) = &self.on_expired {
            hook();
        }
    }
}

pub(crate) fn ensure_success(response: &ApiResponse) -> Result<(), ApiError> {
    if response.is_success() {
        Ok(())
    } else {
        Err(ApiError::from_response(response.status, &response.body))
    }
}

pub(crate) fn decode_json<R: DeserializeOwned>(response: &ApiResponse) -> Result<R, ApiError> {
    ensure_success(response)?;
    let body = if response.body.trim().is_empty() {
        "null"
    } else {
        response.body.as_str()
    };
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::testing::{respond, MockTransport};
    use crate::tokens::MemoryTokens;

    #[tokio::test]
    async fn attaches_bearer_token() {
        let transport = MockTransport::new(|_| respond(200, "{}"));
        let client = ApiClient::new(transport, MemoryTokens::with_pair("a1", "r1"));

        client.send_unit(ApiRequest::get("/auth/me/")).await.unwrap();

        let seen = client.transport().requests();
        assert_eq!(seen[0].bearer.as_deref(), Some("a1"));
    }

    #[tokio::test]
    async fn refreshes_once_and_retries() {
        let transport = MockTransport::new(|req| match (req.path.as_str(), req.bearer.as_deref()) {
            (REFRESH_PATH, _) => respond(200, r#"{"access": "a2", "refresh": "r2"}"#),
            (_, Some("a2")) => respond(200, r#"{"id": 1}"#),
            _ => respond(401, r#"{"detail": "Token expired"}"#),
        });
        let client = ApiClient::new(transport, MemoryTokens::with_pair("a1", "r1"));

        let body: serde_json::Value = client.send_json(ApiRequest::get("/auth/me/")).await.unwrap();

        assert_eq!(body, json!({"id": 1}));
        assert_eq!(client.tokens().access().as_deref(), Some("a2"));
        assert_eq!(client.tokens().refresh().as_deref(), Some("r2"));
        let paths: Vec<String> = client.transport().requests().iter().map(|r| r.path.clone()).collect();
        assert_eq!(paths, ["/auth/me/", REFRESH_PATH, "/auth/me/"]);
    }

    #[tokio::test]
    async fn failed_refresh_clears_session_and_fires_hook() {
        let expired = Rc::new(Cell::new(0));
        let transport = MockTransport::new(|req| match req.path.as_str() {
            REFRESH_PATH => respond(401, r#"{"detail": "Token is blacklisted"}"#),
            _ => respond(401, ""),
        });
        let hookCount = Rc::clone(&expired);
        let client = ApiClient::new(transport, MemoryTokens::with_pair("a1", "r1"))
            .on_session_expired(move || hookCount.set(hookCount.get() + 1));

        let err = client.send_unit(ApiRequest::get("/stars/")).await.unwrap_err();

        assert_eq!(err, ApiError::Unauthorized);
        assert!(!client.tokens().has_session());
        assert_eq!(expired.get(), 1);
        assert_eq!(client.transport().requests().len(), 2);
    }

    /// Suspends on every call so joined requests interleave, and rejects a
    /// refresh token that was already spent.
    struct RotatingBackend {
        refreshes: Cell<u32>,
        spent: RefCell<Vec<String>>,
    }

    #[async_trait(?Send)]
    impl Transport for RotatingBackend {
        async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
            tokio::task::yield_now().await;
            if request.path == REFRESH_PATH {
                self.refreshes.set(self.refreshes.get() + 1);
                let token = request.body.as_ref().and_then(|b| b["refresh"].as_str()).unwrap_or_default();
                if self.spent.borrow().iter().any(|s| s == token) {
                    return Ok(respond(401, r#"{"detail": "Token is blacklisted"}"#));
                }
                self.spent.borrow_mut().push(token.to_string());
                return Ok(respond(200, r#"{"access": "a2", "refresh": "r2"}"#));
            }
            match request.bearer.as_deref() {
                Some("a2") => Ok(respond(204, "")),
                _ => Ok(respond(401, "")),
            }
        }
    }

    #[tokio::test]
    async fn concurrent_401s_share_one_refresh() {
        let expired = Rc::new(Cell::new(false));
        let flag = Rc::clone(&expired);
        let backend = RotatingBackend { refreshes: Cell::new(0), spent: RefCell::new(Vec::new()) };
        let client = ApiClient::new(backend, MemoryTokens::with_pair("a1", "r1"))
            .on_session_expired(move || flag.set(true));
        let other = client.clone();

        let (centers, fields) = futures::join!(
            client.send_unit(ApiRequest::get("/centers/")),
            other.send_unit(ApiRequest::get("/fields/")),
        );

        assert_eq!(centers, Ok(()));
        assert_eq!(fields, Ok(()));
        assert_eq!(client.transport().refreshes.get(), 1);
        assert!(client.tokens().has_session());
        assert_eq!(client.tokens().refresh().as_deref(), Some("r2"));
        assert!(!expired.get());
    }

    #[tokio::test]
    async fn stale_bearer_retries_with_newer_token() {
        let transport = MockTransport::new(|req| match (req.path.as_str(), req.bearer.as_deref()) {
            (REFRESH_PATH, _) => respond(500, ""),
            (_, Some("a2")) => respond(204, ""),
            _ => respond(401, ""),
        });
        let client = ApiClient::new(transport, MemoryTokens::with_pair("a2", "r2"));

        let access = client.recover_access(Some("a1")).await;

        assert_eq!(access.as_deref(), Some("a2"));
        assert!(client.transport().requests().is_empty());
        assert!(client.tokens().has_session());
    }

    #[tokio::test]
    async fn retry_that_is_still_unauthorized_expires() {
        let transport = MockTransport::new(|req| match req.path.as_str() {
            REFRESH_PATH => respond(200, r#"{"access": "a2"}"#),
            _ => respond(401, ""),
        });
        let client = ApiClient::new(transport, MemoryTokens::with_pair("a1", "r1"));

        let err = client.send_unit(ApiRequest::get("/users/")).await.unwrap_err();

        assert_eq!(err, ApiError::Unauthorized);
        assert!(!client.tokens().has_session());
        assert_eq!(client.transport().requests().len(), 3);
    }

    #[tokio::test]
    async fn anonymous_401_is_plain_http_error() {
        let transport = MockTransport::new(|_| respond(401, r#"{"detail": "Wrong phone or password."}"#));
        let client = ApiClient::new(transport, MemoryTokens::with_pair("a1", "r1"));

        let err = client
            .send_unit(ApiRequest::post("/auth/login/", json!({})).anonymous())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Wrong phone or password.");
        assert!(client.tokens().has_session());
        assert_eq!(client.transport().requests().len(), 1);
        assert_eq!(client.transport().requests()[0].bearer, None);
    }

    #[tokio::test]
    async fn guest_401_does_not_fire_hook() {
        let expired = Rc::new(Cell::new(false));
        let flag = Rc::clone(&expired);
        let client = ApiClient::new(MockTransport::new(|_| respond(401, "")), MemoryTokens::default())
            .on_session_expired(move || flag.set(true));

        let err = client.send_unit(ApiRequest::get("/centers/")).await.unwrap_err();

        assert_eq!(err, ApiError::Unauthorized);
        assert!(!expired.get());
    }

    #[tokio::test]
    async fn empty_success_body_decodes_to_unit() {
        let client = ApiClient::new(MockTransport::new(|_| respond(204, "")), MemoryTokens::default());
        client
            .send_json::<()>(ApiRequest::delete("/regions/1/"))
            .await
            .unwrap();
    }
}
