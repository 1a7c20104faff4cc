#![allow(non_snake_case)]

pub mod api;
pub mod app;
pub mod components;
pub mod guard;
pub mod pages;
pub mod state;
pub mod table;
pub mod viewport;

pub use app::{shell, App};

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        leptos::logging::warn!("console logger unavailable: {e}");
    }
    leptos::mount::hydrate_body(App);
}
