use leptos::prelude::*;

use crate::table::{PageItem, Pagination};

#[component]
pub fn Pager(#[prop(into)] pagination: Signal<Pagination>, on_page: Callback<u32>) -> impl IntoView {
    let items = move || {
        pagination
            .get()
            .window()
            .into_iter()
            .map(|item| match item {
                PageItem::Gap => view! { <span class="page-gap">"\u{2026}"</span> }.into_any(),
                PageItem::Page(page) => {
                    let current = move || pagination.get().page == page;
                    view! {
                        <button
                            class="page-btn"
                            class:active=current
                            disabled=current
                            on:click=move |_| on_page.run(page)
                        >
                            {page}
                        </button>
                    }
                    .into_any()
                }
            })
            .collect_view()
    };

    view! {
        <div class="pagination">
            <span class="page-range">{move || pagination.get().range_text()}</span>
            <Show when=move || { pagination.get().page_count() > 1 }>
                <div class="page-buttons">
                    <button
                        class="page-btn"
                        disabled=move || !pagination.get().has_prev()
                        on:click=move |_| on_page.run(pagination.get_untracked().page.saturating_sub(1).max(1))
                    >
                        "\u{2039} Prev"
                    </button>
                    {items}
                    <button
                        class="page-btn"
                        disabled=move || !pagination.get().has_next()
                        on:click=move |_| on_page.run(pagination.get_untracked().page + 1)
                    >
                        "Next \u{203A}"
                    </button>
                </div>
            </Show>
        </div>
    }
}
