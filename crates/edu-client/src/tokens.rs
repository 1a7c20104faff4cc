use std::cell::RefCell;

use edu_types::TokenPair;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Where the session's access/refresh tokens live.
pub trait TokenStore {
    fn access(&self) -> Option<String>;
    fn refresh(&self) -> Option<String>;
    fn set_access(&self, access: &str);
    fn set_refresh(&self, refresh: &str);
    fn clear(&self);

    fn store(&self, pair: &TokenPair) {
        self.set_access(&pair.access);
        self.set_refresh(&pair.refresh);
    }

    fn has_session(&self) -> bool {
        self.access().is_some() || self.refresh().is_some()
    }
}

#[derive(Debug, Default)]
pub struct MemoryTokens {
    access: RefCell<Option<String>>,
    refresh: RefCell<Option<String>>,
}

impl MemoryTokens {
    pub fn with_pair(access: &str, refresh: &str) -> Self {
        Self {
            access: RefCell::new(Some(access.to_string())),
            refresh: RefCell::new(Some(refresh.to_string())),
        }
    }
}

impl TokenStore for MemoryTokens {
    fn access(&self) -> Option<String> {
        self.access.borrow().clone()
    }

    fn refresh(&self) -> Option<String> {
        self.refresh.borrow().clone()
    }

    fn set_access(&self, access: &str) {
        *self.access.borrow_mut() = Some(access.to_string());
    }

    fn set_refresh(&self, refresh: &str) {
        *self.refresh.borrow_mut() = Some(refresh.to_string());
    }

    fn clear(&self) {
        self.access.borrow_mut().take();
        self.refresh.borrow_mut().take();
    }
}

/// Tokens persisted under the `access_token` / `refresh_token` keys of
/// `window.localStorage`. Outside the browser every read is empty.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorageTokens;

#[cfg(feature = "hydrate")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

/// Logs a failed localStorage call and reports whether it succeeded.
#[cfg_attr(not(feature = "hydrate"), allow(dead_code))]
fn storage_ok<E: std::fmt::Debug>(action: &str, key: &str, result: Result<(), E>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            log::warn!("failed to {action} {key} in localStorage: {e:?}");
            false
        }
    }
}

impl LocalStorageTokens {
    fn read(key: &str) -> Option<String> {
        #[cfg(feature = "hydrate")]
        {
            local_storage()?
                .get_item(key)
                .ok()
                .flatten()
                .filter(|v| !v.is_empty())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
            None
        }
    }

    fn write(key: &str, value: &str) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(storage) = local_storage() {
                storage_ok("persist", key, storage.set_item(key, value));
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (key, value);
        }
    }

    fn remove(key: &str) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(storage) = local_storage() {
                storage_ok("remove", key, storage.remove_item(key));
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
        }
    }
}

impl TokenStore for LocalStorageTokens {
    fn access(&self) -> Option<String> {
        Self::read(ACCESS_TOKEN_KEY)
    }

    fn refresh(&self) -> Option<String> {
        Self::read(REFRESH_TOKEN_KEY)
    }

    fn set_access(&self, access: &str) {
        Self::write(ACCESS_TOKEN_KEY, access);
    }

    fn set_refresh(&self, refresh: &str) {
        Self::write(REFRESH_TOKEN_KEY, refresh);
    }

    fn clear(&self) {
        Self::remove(ACCESS_TOKEN_KEY);
        Self::remove(REFRESH_TOKEN_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_failures_are_reported() {
        assert!(storage_ok::<()>("remove", "access_token", Ok(())));
        assert!(!storage_ok("remove", "access_token", Err("SecurityError")));
    }

    #[test]
    fn memory_tokens_store_and_clear() {
        let tokens = MemoryTokens::default();
        assert!(!tokens.has_session());

        tokens.store(&TokenPair {
            access: "a1".into(),
            refresh: "r1".into(),
        });
        assert_eq!(tokens.access().as_deref(), Some("a1"));
        assert_eq!(tokens.refresh().as_deref(), Some("r1"));

        tokens.clear();
        assert!(!tokens.has_session());
    }
}
