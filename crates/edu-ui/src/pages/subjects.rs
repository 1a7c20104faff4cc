use edu_types::{Id, ListQuery, Page, Subject, DEFAULT_PAGE_SIZE};
use leptos::prelude::*;

use crate::api::{self, load, named_options, Latest, Loaded};
use crate::components::filter_select::FilterSelect;
use crate::components::pagination::Pager;
use crate::components::responsive_view::ResponsiveDataView;
use crate::components::search_box::SearchBox;
use crate::table::{Column, Pagination};

fn columns() -> Vec<Column<Subject>> {
    vec![
        Column::new("name", "Subject", |s: &Subject| s.name.clone()).sort_text(),
        Column::new("field", "Course", |s: &Subject| s.field_name().unwrap_or("").to_string()).sort_text(),
    ]
}

#[component]
pub fn SubjectsPage() -> impl IntoView {
    let search = RwSignal::new(String::new());
    let field = RwSignal::new(None::<Id>);
    let page = RwSignal::new(1u32);
    let fields = named_options("/fields/");
    let subjects = RwSignal::new(Loaded::<Page<Subject>>::Loading);
    let latest = Latest::new();

    let query = Memo::new(move |_| {
        ListQuery::new(page.get(), DEFAULT_PAGE_SIZE)
            .search(search.get())
            .filter_opt("field", field.get())
            .ordering("name")
    });

    Effect::new(move |_| {
        let query = query.get();
        load(subjects, latest, async move { api::client().list::<Subject>(&query).await });
    });

    let rows = Signal::derive(move || subjects.get().into_results());
    let pagination = Signal::derive(move || {
        let total = subjects.with(|s| s.ready().map(|p| p.count).unwrap_or(0));
        Pagination::new(page.get(), DEFAULT_PAGE_SIZE, total)
    });

    view! {
        <div class="page-header">
            <h1>"Subjects"</h1>
            <p class="subtitle">"Everything taught across the directory"</p>
        </div>
        <div class="filters">
            <SearchBox
                value=search
                on_search=Callback::new(move |q: String| {
                    search.set(q);
                    page.set(1);
                })
                placeholder="Search subjects..."
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
        <ResponsiveDataView data=rows columns=columns() empty_message="No subjects found." />
        <Pager pagination=pagination on_page=Callback::new(move |p: u32| page.set(p)) />
    }
}
