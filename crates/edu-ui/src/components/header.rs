use leptos::prelude::*;
use leptos_router::hooks::{use_location, use_navigate};

use crate::api;
use crate::components::search_box::SearchBox;
use crate::components::toast::use_toast;
use crate::state::auth::use_auth;

const LINKS: [(&str, &str); 4] = [
    ("/centers", "Centers"),
    ("/courses", "Courses"),
    ("/subjects", "Subjects"),
    ("/resources", "Resources"),
];

#[component]
pub fn Header() -> impl IntoView {
    let auth = use_auth();
    let toast = use_toast();
    let location = use_location();
    let navigate = use_navigate();

    let onSearch = {
        let navigate = navigate.clone();
        Callback::new(move |q: String| {
            let q = q.trim().to_string();
            if !q.is_empty() {
                navigate(&format!("/search?q={}", urlencoding::encode(&q)), Default::default());
            }
        })
    };

    let logout = move |_: leptos::ev::MouseEvent| {
        let navigate = navigate.clone();
        api::spawn(async move {
            auth.logout().await;
            toast.info("You have been signed out.");
            navigate("/", Default::default());
        });
    };

    let links = LINKS
        .iter()
        .map(|(href, label)| {
            let href = *href;
            let active = move || location.pathname.get().starts_with(href);
            view! {
                <li class="nav-item" class:active=active>
                    <a href=href>{*label}</a>
                </li>
            }
        })
        .collect_view();

    view! {
        <header class="site-header">
            <a class="brand" href="/">
                <div class="brand-icon">"E"</div>
                <span class="brand-text">"EduCenters"</span>
            </a>
            <ul class="nav-links">{links}</ul>
            <div class="header-search">
                <SearchBox
                    value=Signal::derive(String::new)
                    on_search=onSearch
                    placeholder="Search centers, courses..."
                    live=false
                />
            </div>
            <div class="auth-menu">
                {move || {
                    let state = auth.state();
                    match state.user {
                        _ if state.loading => view! { <span class="muted">"\u{2026}"</span> }.into_any(),
                        Some(user) => {
                            let isAdmin = user.is_admin();
                            view! {
                                {isAdmin.then(|| view! { <a class="btn btn-secondary" href="/admin">"Admin"</a> })}
                                <a class="user-link" href="/profile">{user.full_name()}</a>
                                <button class="btn btn-secondary" on:click=logout.clone()>"Sign out"</button>
                            }
                                .into_any()
                        }
                        None => view! {
                            <a class="btn btn-secondary" href="/login">"Sign in"</a>
                            <a class="btn btn-primary" href="/register">"Register"</a>
                        }
                            .into_any(),
                    }
                }}
            </div>
        </header>
    }
}

#[component]
pub fn Footer() -> impl IntoView {
    view! {
        <footer class="site-footer">
            <span>"EduCenters directory"</span>
            <nav>
                {LINKS
                    .iter()
                    .map(|(href, label)| view! { <a href=*href>{*label}</a> })
                    .collect_view()}
            </nav>
        </footer>
    }
}
