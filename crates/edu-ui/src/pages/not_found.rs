use leptos::prelude::*;

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="not-found">
            <h1>"404"</h1>
            <p>"The page you are looking for does not exist or has moved."</p>
            <a href="/" class="btn btn-primary">"Back to home"</a>
        </div>
    }
}
