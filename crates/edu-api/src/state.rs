use std::sync::Arc;
use std::time::Duration;

use crate::error::ProxyError;

#[derive(Clone)]
pub struct AppState {
    /// Upstream base URL without a trailing slash.
    pub upstream: Arc<str>,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(upstream: &str, timeout: Duration) -> Result<Self, ProxyError> {
        let upstream = upstream.trim().trim_end_matches('/');
        if !(upstream.starts_with("http://") || upstream.starts_with("https://")) {
            return Err(ProxyError::InvalidUpstream(upstream.to_string()));
        }

        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            upstream: upstream.into(),
            http,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_slash() {
        let state = AppState::new(" https://api.example.com/api/v1/ ", Duration::from_secs(5)).unwrap();
        assert_eq!(&*state.upstream, "https://api.example.com/api/v1");
    }

    #[test]
    fn rejects_non_http_upstream() {
        let err = AppState::new("ftp://files.example.com", Duration::from_secs(5)).err();
        assert!(matches!(err, Some(ProxyError::InvalidUpstream(_))));
    }
}
