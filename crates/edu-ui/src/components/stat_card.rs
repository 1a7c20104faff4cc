use leptos::prelude::*;

use crate::api::Loaded;

/// Dashboard tile with a count that links to the entity page.
#[component]
pub fn StatCard(
    title: &'static str,
    href: &'static str,
    #[prop(into)] value: Signal<Loaded<u64>>,
) -> impl IntoView {
    view! {
        <a class="card stat-card" href=href>
            <div class="card-title">{title}</div>
            <div class="stat-value">
                {move || match value.get() {
                    Loaded::Loading => "\u{2026}".to_string(),
                    Loaded::Ready(count) => count.to_string(),
                    Loaded::Failed(_) => "\u{2014}".to_string(),
                }}
            </div>
        </a>
    }
}
