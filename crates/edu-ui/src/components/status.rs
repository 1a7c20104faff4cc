use leptos::prelude::*;

#[component]
pub fn Spinner(#[prop(optional, into)] label: Option<String>) -> impl IntoView {
    view! {
        <div class="loading">
            <div class="spinner"></div>
            {label.unwrap_or_else(|| "Loading...".to_string())}
        </div>
    }
}

#[component]
pub fn ErrorNotice(#[prop(into)] message: String) -> impl IntoView {
    view! { <p class="error-text">{message}</p> }
}

#[component]
pub fn EmptyState(#[prop(into)] message: String) -> impl IntoView {
    view! { <div class="empty-state">{message}</div> }
}

#[component]
pub fn Forbidden() -> impl IntoView {
    view! {
        <div class="card notice">
            <div class="card-title">"Access denied"</div>
            <p>"You do not have permission to view this page."</p>
            <a href="/" class="btn btn-secondary">"Back to home"</a>
        </div>
    }
}
