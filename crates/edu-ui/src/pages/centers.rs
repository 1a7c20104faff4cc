use edu_types::{EducationalCenter, Id, ListQuery, Page};
use leptos::prelude::*;

use crate::api::{self, load, named_options, Latest, Loaded};
use crate::components::filter_select::FilterSelect;
use crate::components::pagination::Pager;
use crate::components::search_box::SearchBox;
use crate::components::status::{EmptyState, ErrorNotice, Spinner};
use crate::table::Pagination;

pub const CENTERS_PAGE_SIZE: u32 = 12;

#[component]
pub fn CenterCard(center: EducationalCenter) -> impl IntoView {
    let href = format!("/centers/{}", center.id);
    let region = center.region_name().map(str::to_string);
    let fields = center
        .fields
        .iter()
        .take(3)
        .map(|f| view! { <span class="tag">{f.name.clone()}</span> })
        .collect_view();

    view! {
        <a class="card center-card" href=href>
            <div class="card-title">{center.name.clone()}</div>
            {region.map(|r| view! { <div class="muted">{r}</div> })}
            <div class="rating">"\u{2605} " {center.rating_label()}</div>
            <div class="tags">{fields}</div>
        </a>
    }
}

/// Grid of center cards for a loaded page.
pub fn center_grid(centers: Loaded<Page<EducationalCenter>>, empty: &'static str) -> AnyView {
    match centers {
        Loaded::Loading => view! { <Spinner /> }.into_any(),
        Loaded::Failed(e) => view! { <ErrorNotice message=e /> }.into_any(),
        Loaded::Ready(page) if page.results.is_empty() => view! { <EmptyState message=empty /> }.into_any(),
        Loaded::Ready(page) => view! {
            <div class="card-grid">
                {page
                    .results
                    .into_iter()
                    .map(|center| view! { <CenterCard center=center /> })
                    .collect_view()}
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn CentersPage() -> impl IntoView {
    let search = RwSignal::new(String::new());
    let region = RwSignal::new(None::<Id>);
    let field = RwSignal::new(None::<Id>);
    let page = RwSignal::new(1u32);

    let regions = named_options("/regions/");
    let fields = named_options("/fields/");
    let centers = RwSignal::new(Loaded::<Page<EducationalCenter>>::Loading);
    let latest = Latest::new();

    let query = Memo::new(move |_| {
        ListQuery::new(page.get(), CENTERS_PAGE_SIZE)
            .search(search.get())
            .filter_opt("region", region.get())
            .filter_opt("field", field.get())
    });

    Effect::new(move |_| {
        let query = query.get();
        load(centers, latest, async move {
            api::client().list::<EducationalCenter>(&query).await
        });
    });

    let pagination = Signal::derive(move || {
        let total = centers.with(|c| c.ready().map(|p| p.count).unwrap_or(0));
        Pagination::new(page.get(), CENTERS_PAGE_SIZE, total)
    });

    view! {
        <div class="page-header">
            <h1>"Educational centers"</h1>
            <p class="subtitle">"Find a learning center near you"</p>
        </div>
        <div class="filters">
            <SearchBox
                value=search
                on_search=Callback::new(move |q: String| {
                    search.set(q);
                    page.set(1);
                })
                placeholder="Search by name..."
            />
            <FilterSelect
                label="Region"
                options=regions
                value=region
                on_change=Callback::new(move |id: Option<Id>| {
                    region.set(id);
                    page.set(1);
                })
            />
            <FilterSelect
                label="Course"
                options=fields
                value=field
                on_change=Callback::new(move |id: Option<Id>| {
                    field.set(id);
                    page.set(1);
                })
            />
        </div>
        {move || center_grid(centers.get(), "No centers match your filters.")}
        <Pager pagination=pagination on_page=Callback::new(move |p: u32| page.set(p)) />
    }
}
