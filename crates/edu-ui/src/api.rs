//! Glue between the REST client and reactive page state.

use std::future::Future;

use edu_client::{ApiClient, ApiError, BrowserClient, BrowserTransport, LocalStorageTokens, API_BASE};
use leptos::prelude::*;

/// Fresh client bound to the same-origin gateway and browser storage.
///
/// The client is not `Send`, so build it inside the task that uses it.
pub fn client() -> BrowserClient {
    quiet_client().on_session_expired(|| {
        log::info!("session expired, redirecting to login");
        redirect_hard("/login");
    })
}

/// Same as [`client`] but a dead session is dropped without redirecting.
/// Used for the startup session probe on public pages.
pub fn quiet_client() -> BrowserClient {
    ApiClient::new(BrowserTransport::new(API_BASE), LocalStorageTokens)
}

/// Full page navigation, dropping all in-memory state.
pub fn redirect_hard(path: &str) {
    #[cfg(feature = "hydrate")]
    {
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.location().set_href(path) {
                log::warn!("redirect to {path} failed: {e:?}");
            }
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = path;
    }
}

/// Run a future on the browser event loop. Effects never run during
/// server render, so off the browser the future is dropped.
pub fn spawn<F>(future: F)
where
    F: Future<Output = ()> + 'static,
{
    #[cfg(feature = "hydrate")]
    wasm_bindgen_futures::spawn_local(future);
    #[cfg(not(feature = "hydrate"))]
    drop(future);
}

#[derive(Clone, Debug, PartialEq)]
pub enum Loaded<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Loaded<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Loaded::Ready(value) => Some(value),
            _ => None,
        }
    }
}

impl<T> Loaded<edu_types::Page<T>> {
    /// Drop the paging envelope, keeping only the rows.
    pub fn into_results(self) -> Loaded<Vec<T>> {
        match self {
            Loaded::Loading => Loaded::Loading,
            Loaded::Ready(page) => Loaded::Ready(page.results),
            Loaded::Failed(e) => Loaded::Failed(e),
        }
    }
}

impl<T> From<Result<T, ApiError>> for Loaded<T> {
    fn from(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(value) => Loaded::Ready(value),
            Err(e) => Loaded::Failed(e.to_string()),
        }
    }
}

/// Request counter so a page only applies the answer to its newest request.
#[derive(Clone, Copy)]
pub struct Latest(StoredValue<u64>);

impl Latest {
    pub fn new() -> Self {
        Self(StoredValue::new(0))
    }

    pub fn begin(&self) -> u64 {
        self.0.update_value(|n| *n += 1);
        self.0.get_value()
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.0.get_value() == ticket
    }
}

impl Default for Latest {
    fn default() -> Self {
        Self::new()
    }
}

/// Set `target` to loading, await `future`, and store the outcome unless a
/// newer load has started in the meantime.
pub fn load<T, F>(target: RwSignal<Loaded<T>>, latest: Latest, future: F)
where
    T: Send + Sync + 'static,
    F: Future<Output = Result<T, ApiError>> + 'static,
{
    let ticket = latest.begin();
    target.set(Loaded::Loading);
    spawn(async move {
        let result = future.await;
        if latest.is_current(ticket) {
            target.set(result.into());
        } else {
            log::debug!("discarding stale response #{ticket}");
        }
    });
}

/// `{id, name}` options for a filter or select, loaded once on mount.
pub fn named_options(path: &'static str) -> RwSignal<Loaded<Vec<edu_types::Named>>> {
    let options = RwSignal::new(Loaded::Loading);
    Effect::new(move |_| {
        spawn(async move {
            let result = client().list_named(path).await;
            if let Err(e) = &result {
                log::warn!("{path}: could not load options: {e}");
            }
            options.set(result.into());
        });
    });
    options
}
