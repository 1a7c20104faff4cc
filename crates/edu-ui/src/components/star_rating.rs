use leptos::prelude::*;

pub const MAX_STARS: u8 = 5;

/// Five stars; clickable when `on_rate` is given.
#[component]
pub fn StarRating(
    #[prop(into)] value: Signal<u8>,
    #[prop(optional)] on_rate: Option<Callback<u8>>,
) -> impl IntoView {
    let hover = RwSignal::new(0u8);
    let shown = move || match hover.get() {
        0 => value.get(),
        h => h,
    };

    view! {
        <div class="star-rating" class:interactive=on_rate.is_some() on:mouseleave=move |_| hover.set(0)>
            {(1..=MAX_STARS)
                .map(|star| {
                    view! {
                        <span
                            class="star"
                            class:filled=move || star <= shown()
                            on:mouseenter=move |_| {
                                if on_rate.is_some() {
                                    hover.set(star);
                                }
                            }
                            on:click=move |_| {
                                if let Some(rate) = on_rate {
                                    rate.run(star);
                                }
                            }
                        >
                            "\u{2605}"
                        </span>
                    }
                })
                .collect_view()}
        </div>
    }
}
