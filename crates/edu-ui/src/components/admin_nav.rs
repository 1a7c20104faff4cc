use leptos::prelude::*;
use leptos_router::hooks::use_location;

const SECTIONS: [(&str, &str, &str); 9] = [
    ("/admin", "\u{25A3}", "Dashboard"),
    ("/admin/users", "\u{263A}", "Users"),
    ("/admin/centers", "\u{2302}", "Centers"),
    ("/admin/branches", "\u{2325}", "Branches"),
    ("/admin/regions", "\u{25CE}", "Regions"),
    ("/admin/fields", "\u{2261}", "Courses"),
    ("/admin/subjects", "\u{2710}", "Subjects"),
    ("/admin/resources", "\u{2398}", "Resources"),
    ("/admin/stars", "\u{2605}", "Ratings"),
];

#[component]
pub fn AdminNav() -> impl IntoView {
    let location = use_location();

    view! {
        <nav class="nav-sidebar">
            <a class="nav-brand" href="/">
                <div class="brand-icon">"E"</div>
                <span class="brand-text">"EduCenters Admin"</span>
            </a>
            <ul class="nav-links">
                {SECTIONS
                    .iter()
                    .map(|(href, icon, label)| {
                        let href = *href;
                        let active = move || location.pathname.get().trim_end_matches('/') == href;
                        view! {
                            <li class="nav-item" class:active=active>
                                <a href=href>
                                    <span class="nav-icon">{*icon}</span>
                                    <span>{*label}</span>
                                </a>
                            </li>
                        }
                    })
                    .collect_view()}
            </ul>
        </nav>
    }
}
