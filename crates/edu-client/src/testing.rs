use std::cell::RefCell;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::transport::{ApiRequest, ApiResponse, Transport};

/// In-memory transport answering every request through a closure and
/// recording what was sent.
pub struct MockTransport {
    handler: Box<dyn Fn(&ApiRequest) -> ApiResponse>,
    seen: RefCell<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&ApiRequest) -> ApiResponse + 'static,
    {
        Self {
            handler: Box::new(handler),
            seen: RefCell::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.seen.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Transport for MockTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        self.seen.borrow_mut().push(request.clone());
        Ok((self.handler)(request))
    }
}

pub fn respond(status: u16, body: &str) -> ApiResponse {
    ApiResponse {
        status,
        body: body.to_string(),
    }
}

/// Query value for `key`, if the request carried one.
pub fn query_value<'a>(request: &'a ApiRequest, key: &str) -> Option<&'a str> {
    request
        .query
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}
