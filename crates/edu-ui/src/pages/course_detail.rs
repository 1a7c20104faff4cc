use edu_types::{EducationalCenter, Field, ListQuery, Page, Subject};
use leptos::prelude::*;

use crate::api::{self, load, Latest, Loaded};
use crate::components::pagination::Pager;
use crate::components::status::{EmptyState, ErrorNotice, Spinner};
use crate::pages::center_detail::use_id_param;
use crate::pages::centers::{center_grid, CENTERS_PAGE_SIZE};
use crate::table::Pagination;

const SUBJECTS_PAGE_SIZE: u32 = 100;

#[component]
pub fn CourseDetailPage() -> impl IntoView {
    let fieldId = use_id_param();
    let field = RwSignal::new(Loaded::<Field>::Loading);
    let subjects = RwSignal::new(Loaded::<Vec<Subject>>::Loading);
    let centers = RwSignal::new(Loaded::<Page<EducationalCenter>>::Loading);
    let page = RwSignal::new(1u32);
    let (fieldLatest, subjectLatest, centerLatest) = (Latest::new(), Latest::new(), Latest::new());

    Effect::new(move |_| {
        let Some(id) = fieldId.get() else {
            let missing = "Course not found.".to_string();
            field.set(Loaded::Failed(missing.clone()));
            subjects.set(Loaded::Failed(missing.clone()));
            centers.set(Loaded::Failed(missing));
            return;
        };
        page.set(1);
        load(field, fieldLatest, async move { api::client().get::<Field>(id).await });
        load(subjects, subjectLatest, async move {
            let query = ListQuery::new(1, SUBJECTS_PAGE_SIZE).filter("field", id).ordering("name");
            api::client().fetch_all::<Subject>(&query).await
        });
    });

    Effect::new(move |_| {
        let (Some(id), current) = (fieldId.get(), page.get()) else {
            return;
        };
        load(centers, centerLatest, async move {
            let query = ListQuery::new(current, CENTERS_PAGE_SIZE)
                .filter("field", id)
                .ordering("-rating");
            api::client().list::<EducationalCenter>(&query).await
        });
    });

    let pagination = Signal::derive(move || {
        let total = centers.with(|c| c.ready().map(|p| p.count).unwrap_or(0));
        Pagination::new(page.get(), CENTERS_PAGE_SIZE, total)
    });

    view! {
        {move || match field.get() {
            Loaded::Loading => view! { <Spinner /> }.into_any(),
            Loaded::Failed(e) => view! { <ErrorNotice message=e /> }.into_any(),
            Loaded::Ready(f) => view! {
                <div class="page-header">
                    <h1>{f.name}</h1>
                    {f.description.map(|d| view! { <p class="subtitle">{d}</p> })}
                </div>
            }
            .into_any(),
        }}

        <section class="card">
            <div class="card-title">"Subjects"</div>
            {move || match subjects.get() {
                Loaded::Loading => view! { <Spinner /> }.into_any(),
                Loaded::Failed(e) => view! { <ErrorNotice message=e /> }.into_any(),
                Loaded::Ready(list) if list.is_empty() => {
                    view! { <EmptyState message="No subjects listed for this course." /> }.into_any()
                }
                Loaded::Ready(list) => view! {
                    <div class="tags">
                        {list.into_iter().map(|s| view! { <span class="tag">{s.name}</span> }).collect_view()}
                    </div>
                }
                .into_any(),
            }}
        </section>

        <section>
            <h2>"Centers teaching this course"</h2>
            {move || center_grid(centers.get(), "No centers teach this course yet.")}
            <Pager pagination=pagination on_page=Callback::new(move |p: u32| page.set(p)) />
        </section>
    }
}
