use edu_types::{Id, ListQuery, Page, Resource};
use leptos::prelude::*;

use crate::api::{self, load, named_options, Latest, Loaded};
use crate::components::filter_select::FilterSelect;
use crate::components::pagination::Pager;
use crate::components::search_box::SearchBox;
use crate::components::status::{EmptyState, ErrorNotice, Spinner};
use crate::table::Pagination;

pub const RESOURCES_PAGE_SIZE: u32 = 12;

#[component]
pub fn ResourceCard(resource: Resource) -> impl IntoView {
    let category = resource.category.as_ref().map(|c| c.name.clone());
    let subject = resource.subject.as_ref().map(|s| s.name.clone());

    view! {
        <a class="card resource-card" href=format!("/resources/{}", resource.id)>
            <div class="card-title">{resource.title.clone()}</div>
            <div class="tags">
                {category.map(|c| view! { <span class="tag">{c}</span> })}
                {subject.map(|s| view! { <span class="tag tag-muted">{s}</span> })}
            </div>
            {resource.description.clone().map(|d| view! { <p class="muted clamp">{d}</p> })}
        </a>
    }
}

pub fn resource_list(resources: Loaded<Vec<Resource>>, empty: &'static str) -> AnyView {
    match resources {
        Loaded::Loading => view! { <Spinner /> }.into_any(),
        Loaded::Failed(e) => view! { <ErrorNotice message=e /> }.into_any(),
        Loaded::Ready(list) if list.is_empty() => view! { <EmptyState message=empty /> }.into_any(),
        Loaded::Ready(list) => view! {
            <div class="card-grid">
                {list.into_iter().map(|r| view! { <ResourceCard resource=r /> }).collect_view()}
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn ResourcesPage() -> impl IntoView {
    let search = RwSignal::new(String::new());
    let category = RwSignal::new(None::<Id>);
    let subject = RwSignal::new(None::<Id>);
    let page = RwSignal::new(1u32);

    let categories = named_options("/resource-categories/");
    let subjects = named_options("/subjects/");
    let resources = RwSignal::new(Loaded::<Page<Resource>>::Loading);
    let latest = Latest::new();

    let query = Memo::new(move |_| {
        ListQuery::new(page.get(), RESOURCES_PAGE_SIZE)
            .search(search.get())
            .filter_opt("category", category.get())
            .filter_opt("subject", subject.get())
            .ordering("-created_at")
    });

    Effect::new(move |_| {
        let query = query.get();
        load(resources, latest, async move { api::client().list::<Resource>(&query).await });
    });

    let pagination = Signal::derive(move || {
        let total = resources.with(|r| r.ready().map(|p| p.count).unwrap_or(0));
        Pagination::new(page.get(), RESOURCES_PAGE_SIZE, total)
    });

    view! {
        <div class="page-header">
            <h1>"Resources"</h1>
            <p class="subtitle">"Books, videos and materials shared by the community"</p>
        </div>
        <div class="filters">
            <SearchBox
                value=search
                on_search=Callback::new(move |q: String| {
                    search.set(q);
                    page.set(1);
                })
                placeholder="Search resources..."
            />
            <FilterSelect
                label="Category"
                options=categories
                value=category
                on_change=Callback::new(move |id: Option<Id>| {
                    category.set(id);
                    page.set(1);
                })
            />
            <FilterSelect
                label="Subject"
                options=subjects
                value=subject
                on_change=Callback::new(move |id: Option<Id>| {
                    subject.set(id);
                    page.set(1);
                })
            />
        </div>
        {move || resource_list(resources.get().into_results(), "No resources match your filters.")}
        <Pager pagination=pagination on_page=Callback::new(move |p: u32| page.set(p)) />
    }
}
