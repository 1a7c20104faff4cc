use edu_types::Resource;
use leptos::prelude::*;

use crate::api::{self, load, Latest, Loaded};
use crate::components::status::{ErrorNotice, Spinner};
use crate::pages::center_detail::use_id_param;

#[component]
pub fn ResourceDetailPage() -> impl IntoView {
    let resourceId = use_id_param();
    let resource = RwSignal::new(Loaded::<Resource>::Loading);
    let latest = Latest::new();

    Effect::new(move |_| match resourceId.get() {
        Some(id) => load(resource, latest, async move { api::client().get::<Resource>(id).await }),
        None => resource.set(Loaded::Failed("Resource not found.".into())),
    });

    move || match resource.get() {
        Loaded::Loading => view! { <Spinner /> }.into_any(),
        Loaded::Failed(e) => view! { <ErrorNotice message=e /> }.into_any(),
        Loaded::Ready(r) => {
            let url = r.url().map(str::to_string);
            let category = r.category.map(|c| c.name);
            let subject = r.subject.map(|s| s.name);
            view! {
                <div class="page-header">
                    <h1>{r.title}</h1>
                    <div class="tags">
                        {category.map(|c| view! { <span class="tag">{c}</span> })}
                        {subject.map(|s| view! { <span class="tag tag-muted">{s}</span> })}
                    </div>
                </div>
                <section class="card">
                    {r.description.map(|d| view! { <p class="description">{d}</p> })}
                    {r.created_at.map(|d| view! { <p class="muted">"Added " {d}</p> })}
                    {match url {
                        Some(href) => view! {
                            <a class="btn btn-primary" href=href target="_blank" rel="noopener">
                                "Open resource"
                            </a>
                        }
                        .into_any(),
                        None => view! { <p class="muted">"No link or file attached."</p> }.into_any(),
                    }}
                    <p>
                        <a href="/resources">"\u{2190} Back to resources"</a>
                    </p>
                </section>
            }
            .into_any()
        }
    }
}
