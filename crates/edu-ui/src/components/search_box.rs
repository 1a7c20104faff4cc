use std::time::Duration;

use leptos::prelude::*;

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Text input that reports its value after typing pauses, and at once on
/// Enter. With `live = false` only Enter reports.
#[component]
pub fn SearchBox(
    #[prop(into)] value: Signal<String>,
    on_search: Callback<String>,
    #[prop(into, default = "Search...".to_string())] placeholder: String,
    #[prop(default = true)] live: bool,
) -> impl IntoView {
    let text = RwSignal::new(value.get_untracked());
    let pending = StoredValue::new(None::<TimeoutHandle>);

    Effect::new(move |_| text.set(value.get()));

    let cancel = move || {
        if let Some(handle) = pending.get_value() {
            handle.clear();
        }
        pending.set_value(None);
    };

    let on_input = move |ev: leptos::ev::Event| {
        let current = event_target_value(&ev);
        text.set(current.clone());
        if !live {
            return;
        }
        cancel();
        match set_timeout_with_handle(move || on_search.run(current), SEARCH_DEBOUNCE) {
            Ok(handle) => pending.set_value(Some(handle)),
            Err(e) => log::warn!("debounce timer unavailable: {e:?}"),
        }
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        cancel();
        on_search.run(text.get_untracked());
    };

    on_cleanup(cancel);

    view! {
        <form class="search-box" role="search" on:submit=on_submit>
            <input
                type="search"
                placeholder=placeholder
                prop:value=move || text.get()
                on:input=on_input
            />
            <button type="submit" class="btn btn-primary">"Search"</button>
        </form>
    }
}
