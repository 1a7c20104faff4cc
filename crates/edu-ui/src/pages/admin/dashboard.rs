use edu_client::Endpoint;
use edu_types::{Branch, EducationalCenter, Field, ListQuery, Region, Resource, Star, Subject, User};
use leptos::prelude::*;

use crate::api::{self, Loaded};
use crate::components::stat_card::StatCard;

fn count_of<E: Endpoint>() -> RwSignal<Loaded<u64>> {
    let total = RwSignal::new(Loaded::Loading);
    Effect::new(move |_| {
        api::spawn(async move {
            let result = api::client().count::<E>(&ListQuery::default()).await;
            if let Err(e) = &result {
                log::warn!("{}: count failed: {e}", E::PATH);
            }
            total.set(result.into());
        });
    });
    total
}

#[component]
pub fn AdminDashboard() -> impl IntoView {
    view! {
        <div class="page-header">
            <h1>"Dashboard"</h1>
            <p class="subtitle">"Directory at a glance"</p>
        </div>
        <div class="stat-grid">
            <StatCard title="Users" href="/admin/users" value={count_of::<User>()} />
            <StatCard title="Centers" href="/admin/centers" value={count_of::<EducationalCenter>()} />
            <StatCard title="Branches" href="/admin/branches" value={count_of::<Branch>()} />
            <StatCard title="Regions" href="/admin/regions" value={count_of::<Region>()} />
            <StatCard title="Courses" href="/admin/fields" value={count_of::<Field>()} />
            <StatCard title="Subjects" href="/admin/subjects" value={count_of::<Subject>()} />
            <StatCard title="Resources" href="/admin/resources" value={count_of::<Resource>()} />
            <StatCard title="Ratings" href="/admin/stars" value={count_of::<Star>()} />
        </div>
    }
}
