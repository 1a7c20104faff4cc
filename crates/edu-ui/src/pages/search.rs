use edu_client::search::DEFAULT_LIMIT;
use edu_client::{global_search, SearchHit};
use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_query_map};

use crate::api::{self, Latest, Loaded};
use crate::components::search_box::SearchBox;
use crate::components::status::{EmptyState, Spinner};

#[component]
pub fn SearchPage() -> impl IntoView {
    let query = use_query_map();
    let term = Memo::new(move |_| query.with(|q| q.get("q")).unwrap_or_default());
    let hits = RwSignal::new(Loaded::<Vec<SearchHit>>::Ready(Vec::new()));
    let latest = Latest::new();
    let navigate = use_navigate();

    Effect::new(move |_| {
        let q = term.get();
        let ticket = latest.begin();
        if q.trim().is_empty() {
            hits.set(Loaded::Ready(Vec::new()));
            return;
        }
        hits.set(Loaded::Loading);
        api::spawn(async move {
            let found = global_search(&api::client(), &q, DEFAULT_LIMIT).await;
            if latest.is_current(ticket) {
                hits.set(Loaded::Ready(found));
            }
        });
    });

    let onSearch = Callback::new(move |q: String| {
        navigate(&format!("/search?q={}", urlencoding::encode(q.trim())), Default::default());
    });

    view! {
        <div class="page-header">
            <h1>"Search"</h1>
        </div>
        <SearchBox value=term on_search=onSearch placeholder="Search everything..." live=false />
        {move || match hits.get() {
            Loaded::Loading => view! { <Spinner label="Searching..." /> }.into_any(),
            Loaded::Failed(e) => view! { <EmptyState message=e /> }.into_any(),
            Loaded::Ready(list) if list.is_empty() => {
                let message = if term.get().trim().is_empty() {
                    "Type something to search centers, courses, subjects, resources and branches.".to_string()
                } else {
                    format!("Nothing found for \u{201C}{}\u{201D}.", term.get().trim())
                };
                view! { <EmptyState message=message /> }.into_any()
            }
            Loaded::Ready(list) => view! {
                <p class="muted">{format!("{} result{}", list.len(), if list.len() == 1 { "" } else { "s" })}</p>
                <ul class="search-results">
                    {list
                        .into_iter()
                        .map(|hit| {
                            view! {
                                <li class="search-hit">
                                    <span class=format!("badge badge-{}", hit.kind.label().to_lowercase())>
                                        {hit.kind.label()}
                                    </span>
                                    <a href=hit.href>{hit.title}</a>
                                    {hit.subtitle.map(|s| view! { <span class="muted">{s}</span> })}
                                </li>
                            }
                        })
                        .collect_view()}
                </ul>
            }
            .into_any(),
        }}
    }
}
