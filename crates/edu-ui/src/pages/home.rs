use edu_types::{EducationalCenter, Field, ListQuery, Page};
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::api::{self, load, Latest, Loaded};
use crate::components::search_box::SearchBox;
use crate::pages::centers::center_grid;
use crate::pages::courses::field_tiles;

pub const TOP_RATED_COUNT: u32 = 6;
const HOME_FIELDS: u32 = 12;

#[component]
pub fn HomePage() -> impl IntoView {
    let navigate = use_navigate();
    let topRated = RwSignal::new(Loaded::<Page<EducationalCenter>>::Loading);
    let fields = RwSignal::new(Loaded::<Page<Field>>::Loading);
    let (topLatest, fieldLatest) = (Latest::new(), Latest::new());

    Effect::new(move |_| {
        load(topRated, topLatest, async {
            let query = ListQuery::new(1, TOP_RATED_COUNT).ordering("-rating");
            api::client().list::<EducationalCenter>(&query).await
        });
        load(fields, fieldLatest, async {
            api::client().list::<Field>(&ListQuery::new(1, HOME_FIELDS)).await
        });
    });

    let onSearch = Callback::new(move |q: String| {
        let q = q.trim().to_string();
        if !q.is_empty() {
            navigate(&format!("/search?q={}", urlencoding::encode(&q)), Default::default());
        }
    });

    view! {
        <section class="hero">
            <h1>"Find the right place to learn"</h1>
            <p class="subtitle">"Compare educational centers, courses and study resources in one place."</p>
            <SearchBox
                value=Signal::derive(String::new)
                on_search=onSearch
                placeholder="Try \"English\", \"IT\" or a center name"
                live=false
            />
        </section>

        <section>
            <div class="section-header">
                <h2>"Top rated centers"</h2>
                <a href="/centers">"See all"</a>
            </div>
            {move || center_grid(topRated.get(), "No centers have been rated yet.")}
        </section>

        <section>
            <div class="section-header">
                <h2>"Courses"</h2>
                <a href="/courses">"All courses"</a>
            </div>
            {move || field_tiles(fields.get().into_results())}
        </section>
    }
}
