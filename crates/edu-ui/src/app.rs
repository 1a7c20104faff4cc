use edu_types::{Branch, EducationalCenter, Field, Region, Resource, Star, Subject, User};
use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::{
    components::{Route, Router, Routes},
    ParamSegment, StaticSegment,
};

use crate::components::admin_nav::AdminNav;
use crate::components::header::{Footer, Header};
use crate::components::toast::ToastProvider;
use crate::guard::{Access, Guard};
use crate::pages::admin::{crud_page, AdminDashboard};
use crate::pages::center_detail::CenterDetailPage;
use crate::pages::centers::CentersPage;
use crate::pages::course_detail::CourseDetailPage;
use crate::pages::courses::CoursesPage;
use crate::pages::home::HomePage;
use crate::pages::login::LoginPage;
use crate::pages::not_found::NotFoundPage;
use crate::pages::profile::ProfilePage;
use crate::pages::register::RegisterPage;
use crate::pages::resource_detail::ResourceDetailPage;
use crate::pages::resources::ResourcesPage;
use crate::pages::search::SearchPage;
use crate::pages::subjects::SubjectsPage;
use crate::pages::verify_otp::VerifyOtpPage;
use crate::state::auth::provide_auth;

pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8" />
                <meta name="viewport" content="width=device-width, initial-scale=1" />
                <link rel="icon" href="/favicon.svg" type="image/svg+xml" />
                <AutoReload options=options.clone() />
                <HydrationScripts options />
                <MetaTags />
            </head>
            <body>
                <App />
            </body>
        </html>
    }
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    provide_auth();

    view! {
        <Stylesheet id="leptos" href="/pkg/edu-console.css" />
        <Title text="EduCenters" />
        <ToastProvider>
            <Router>
                <Routes fallback=|| view! { <PublicLayout><NotFoundPage /></PublicLayout> }.into_any()>
                    <Route path=StaticSegment("") view=|| view! { <PublicLayout><HomePage /></PublicLayout> } />
                    <Route path=StaticSegment("centers") view=|| view! { <PublicLayout><CentersPage /></PublicLayout> } />
                    <Route
                        path=(StaticSegment("centers"), ParamSegment("id"))
                        view=|| view! { <PublicLayout><CenterDetailPage /></PublicLayout> }
                    />
                    <Route path=StaticSegment("courses") view=|| view! { <PublicLayout><CoursesPage /></PublicLayout> } />
                    <Route
                        path=(StaticSegment("courses"), ParamSegment("id"))
                        view=|| view! { <PublicLayout><CourseDetailPage /></PublicLayout> }
                    />
                    <Route path=StaticSegment("subjects") view=|| view! { <PublicLayout><SubjectsPage /></PublicLayout> } />
                    <Route path=StaticSegment("resources") view=|| view! { <PublicLayout><ResourcesPage /></PublicLayout> } />
                    <Route
                        path=(StaticSegment("resources"), ParamSegment("id"))
                        view=|| view! { <PublicLayout><ResourceDetailPage /></PublicLayout> }
                    />
                    <Route path=StaticSegment("search") view=|| view! { <PublicLayout><SearchPage /></PublicLayout> } />

                    <Route path=StaticSegment("login") view=|| view! { <AuthLayout><LoginPage /></AuthLayout> } />
                    <Route path=StaticSegment("register") view=|| view! { <AuthLayout><RegisterPage /></AuthLayout> } />
                    <Route path=StaticSegment("verify-otp") view=|| view! { <AuthLayout><VerifyOtpPage /></AuthLayout> } />

                    <Route path=StaticSegment("profile") view=ProfileView />

                    <Route path=StaticSegment("admin") view=|| view! { <AdminLayout><AdminDashboard /></AdminLayout> } />
                    <Route
                        path=(StaticSegment("admin"), StaticSegment("users"))
                        view=|| view! { <AdminLayout>{crud_page::<User>()}</AdminLayout> }
                    />
                    <Route
                        path=(StaticSegment("admin"), StaticSegment("centers"))
                        view=|| view! { <AdminLayout>{crud_page::<EducationalCenter>()}</AdminLayout> }
                    />
                    <Route
                        path=(StaticSegment("admin"), StaticSegment("branches"))
                        view=|| view! { <AdminLayout>{crud_page::<Branch>()}</AdminLayout> }
                    />
                    <Route
                        path=(StaticSegment("admin"), StaticSegment("regions"))
                        view=|| view! { <AdminLayout>{crud_page::<Region>()}</AdminLayout> }
                    />
                    <Route
                        path=(StaticSegment("admin"), StaticSegment("fields"))
                        view=|| view! { <AdminLayout>{crud_page::<Field>()}</AdminLayout> }
                    />
                    <Route
                        path=(StaticSegment("admin"), StaticSegment("subjects"))
                        view=|| view! { <AdminLayout>{crud_page::<Subject>()}</AdminLayout> }
                    />
                    <Route
                        path=(StaticSegment("admin"), StaticSegment("resources"))
                        view=|| view! { <AdminLayout>{crud_page::<Resource>()}</AdminLayout> }
                    />
                    <Route
                        path=(StaticSegment("admin"), StaticSegment("stars"))
                        view=|| view! { <AdminLayout>{crud_page::<Star>()}</AdminLayout> }
                    />
                </Routes>
            </Router>
        </ToastProvider>
    }
}

#[component]
fn PublicLayout(children: Children) -> impl IntoView {
    view! {
        <div class="site">
            <Header />
            <main class="site-main">{children()}</main>
            <Footer />
        </div>
    }
}

/// Centered card for sign-in flows. Signed-in visitors are sent on.
#[component]
fn AuthLayout(children: ChildrenFn) -> impl IntoView {
    view! {
        <div class="auth-page">
            <a class="brand" href="/">
                "EduCenters"
            </a>
            <div class="auth-card">
                <Guard access=Access::GuestOnly>{children()}</Guard>
            </div>
        </div>
    }
}

#[component]
fn ProfileView() -> impl IntoView {
    view! {
        <PublicLayout>
            <Guard access=Access::Authenticated>
                <ProfilePage />
            </Guard>
        </PublicLayout>
    }
}

#[component]
fn AdminLayout(children: ChildrenFn) -> impl IntoView {
    view! {
        <Guard access=Access::Admin>
            <div class="app-layout">
                <AdminNav />
                <main class="main-content">{children()}</main>
            </div>
        </Guard>
    }
}
