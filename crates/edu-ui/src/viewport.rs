use leptos::ev;
use leptos::prelude::*;

/// Viewports narrower than this get the card layout.
pub const MOBILE_BREAKPOINT: f64 = 768.0;

pub fn is_mobile(width: f64) -> bool {
    width < MOBILE_BREAKPOINT
}

pub fn viewport_width() -> Option<f64> {
    #[cfg(feature = "hydrate")]
    {
        web_sys::window()
            .and_then(|w| w.inner_width().ok())
            .and_then(|v| v.as_f64())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        None
    }
}

/// Tracks whether the window is below the mobile breakpoint. Server render
/// and the first client frame assume desktop.
pub fn use_is_mobile() -> Signal<bool> {
    let mobile = RwSignal::new(false);

    Effect::new(move |_| {
        let update = move || {
            if let Some(width) = viewport_width() {
                mobile.set(is_mobile(width));
            }
        };
        update();

        let handle = window_event_listener(ev::resize, move |_| update());
        on_cleanup(move || handle.remove());
    });

    mobile.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakpoint_is_exclusive() {
        assert!(is_mobile(375.0));
        assert!(is_mobile(767.9));
        assert!(!is_mobile(768.0));
        assert!(!is_mobile(1280.0));
    }
}
