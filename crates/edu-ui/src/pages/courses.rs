use edu_types::{Field, ListQuery};
use leptos::prelude::*;

use crate::api::{self, load, Latest, Loaded};
use crate::components::status::{EmptyState, ErrorNotice, Spinner};

const FIELDS_PAGE_SIZE: u32 = 100;

pub fn field_tiles(fields: Loaded<Vec<Field>>) -> AnyView {
    match fields {
        Loaded::Loading => view! { <Spinner /> }.into_any(),
        Loaded::Failed(e) => view! { <ErrorNotice message=e /> }.into_any(),
        Loaded::Ready(list) if list.is_empty() => view! { <EmptyState message="No courses yet." /> }.into_any(),
        Loaded::Ready(list) => view! {
            <div class="tile-grid">
                {list
                    .into_iter()
                    .map(|field| {
                        view! {
                            <a class="card tile" href=format!("/courses/{}", field.id)>
                                <div class="tile-icon">{field.icon.unwrap_or_else(|| "\u{1F4DA}".to_string())}</div>
                                <div class="card-title">{field.name}</div>
                                {field.description.map(|d| view! { <p class="muted">{d}</p> })}
                            </a>
                        }
                    })
                    .collect_view()}
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn CoursesPage() -> impl IntoView {
    let fields = RwSignal::new(Loaded::<Vec<Field>>::Loading);
    let latest = Latest::new();

    Effect::new(move |_| {
        load(fields, latest, async {
            let query = ListQuery::new(1, FIELDS_PAGE_SIZE).ordering("name");
            api::client().fetch_all::<Field>(&query).await
        });
    });

    view! {
        <div class="page-header">
            <h1>"Courses"</h1>
            <p class="subtitle">"Browse fields of study and the centers that teach them"</p>
        </div>
        {move || field_tiles(fields.get())}
    }
}
