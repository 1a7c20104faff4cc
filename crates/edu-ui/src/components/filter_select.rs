use edu_types::{Id, Named};
use leptos::prelude::*;

use crate::api::Loaded;

/// Dropdown over `{id, name}` options with an "all" entry.
#[component]
pub fn FilterSelect(
    label: &'static str,
    #[prop(into)] options: Signal<Loaded<Vec<Named>>>,
    #[prop(into)] value: Signal<Option<Id>>,
    on_change: Callback<Option<Id>>,
) -> impl IntoView {
    view! {
        <label class="filter">
            <span class="filter-label">{label}</span>
            <select
                disabled=move || !matches!(options.get(), Loaded::Ready(_))
                on:change=move |ev| on_change.run(event_target_value(&ev).parse::<Id>().ok())
            >
                <option value="" selected=move || value.get().is_none()>
                    "All"
                </option>
                {move || {
                    options
                        .get()
                        .ready()
                        .cloned()
                        .unwrap_or_default()
                        .into_iter()
                        .map(|option| {
                            let id = option.id;
                            view! {
                                <option value=id.to_string() selected=move || value.get() == Some(id)>
                                    {option.name}
                                </option>
                            }
                        })
                        .collect_view()
                }}
            </select>
        </label>
    }
}
