use edu_client::activity::ACTIVITY_PAGE_SIZE;
use edu_types::validation::{validate_password_change, validate_profile, FieldErrors};
use edu_types::{Comment, Page, PasswordChange, ProfileUpdate, Resource, Star};
use leptos::prelude::*;

use crate::api::{self, load, Latest, Loaded};
use crate::components::form::FieldInput;
use crate::components::pagination::Pager;
use crate::components::status::{EmptyState, ErrorNotice, Spinner};
use crate::components::toast::use_toast;
use crate::pages::login::apply_error;
use crate::pages::resources::resource_list;
use crate::state::auth::use_auth;
use crate::table::Pagination;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tab {
    Comments,
    Ratings,
    Resources,
}

impl Tab {
    const ALL: [Tab; 3] = [Tab::Comments, Tab::Ratings, Tab::Resources];

    fn label(&self) -> &'static str {
        match self {
            Tab::Comments => "My comments",
            Tab::Ratings => "My ratings",
            Tab::Resources => "My resources",
        }
    }
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let auth = use_auth();

    view! {
        <div class="page-header">
            <h1>"My profile"</h1>
        </div>
        {move || {
            auth.user()
                .map(|user| {
                    view! {
                        <section class="card">
                            <div class="card-title">"Account"</div>
                            <dl class="details">
                                <dt>"Name"</dt>
                                <dd>{user.full_name()}</dd>
                                <dt>"Phone"</dt>
                                <dd>{user.phone.clone()}</dd>
                                <dt>"Email"</dt>
                                <dd>{user.email.clone().unwrap_or_else(|| "\u{2014}".into())}</dd>
                                <dt>"Role"</dt>
                                <dd>{user.role.label()}</dd>
                                {user.date_joined.clone().map(|d| view! { <dt>"Member since"</dt> <dd>{d}</dd> })}
                            </dl>
                        </section>
                    }
                })
        }}
        <div class="two-column">
            <ProfileForm />
            <PasswordForm />
        </div>
        <Activity />
    }
}

#[component]
fn ProfileForm() -> impl IntoView {
    let auth = use_auth();
    let toast = use_toast();
    let current = auth.user_untracked().unwrap_or_default();

    let firstName = RwSignal::new(current.first_name);
    let lastName = RwSignal::new(current.last_name);
    let email = RwSignal::new(current.email.unwrap_or_default());
    let errors = RwSignal::new(FieldErrors::new());
    let formError = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let email = email.get_untracked().trim().to_string();
        let update = ProfileUpdate {
            first_name: firstName.get_untracked().trim().to_string(),
            last_name: lastName.get_untracked().trim().to_string(),
            email: (!email.is_empty()).then_some(email),
        };
        if let Err(found) = validate_profile(&update) {
            errors.set(found);
            return;
        }
        errors.set(FieldErrors::new());
        formError.set(None);
        busy.set(true);

        api::spawn(async move {
            match api::client().update_profile(&update).await {
                Ok(user) => {
                    auth.set_user(Some(user));
                    toast.success("Profile updated.");
                }
                Err(e) => apply_error(e, errors, formError),
            }
            busy.set(false);
        });
    };

    view! {
        <section class="card">
            <div class="card-title">"Edit profile"</div>
            {move || formError.get().map(|m| view! { <div class="form-error">{m}</div> })}
            <form on:submit=submit novalidate=true>
                <FieldInput name="first_name" label="First name" value=firstName errors=errors />
                <FieldInput name="last_name" label="Last name" value=lastName errors=errors />
                <FieldInput name="email" label="Email" input_type="email" value=email errors=errors />
                <button type="submit" class="btn btn-primary" disabled=busy>
                    {move || if busy.get() { "Saving..." } else { "Save changes" }}
                </button>
            </form>
        </section>
    }
}

#[component]
fn PasswordForm() -> impl IntoView {
    let toast = use_toast();
    let oldPassword = RwSignal::new(String::new());
    let newPassword = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let errors = RwSignal::new(FieldErrors::new());
    let formError = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let change = PasswordChange {
            old_password: oldPassword.get_untracked(),
            new_password: newPassword.get_untracked(),
        };
        let mut found = validate_password_change(&change).err().unwrap_or_default();
        if !found.contains_key("new_password") && change.new_password != confirm.get_untracked() {
            found.insert("confirm_password".into(), "Passwords do not match.".into());
        }
        if !found.is_empty() {
            errors.set(found);
            return;
        }
        errors.set(FieldErrors::new());
        formError.set(None);
        busy.set(true);

        api::spawn(async move {
            match api::client().change_password(&change).await {
                Ok(()) => {
                    oldPassword.set(String::new());
                    newPassword.set(String::new());
                    confirm.set(String::new());
                    toast.success("Password changed.");
                }
                Err(e) => apply_error(e, errors, formError),
            }
            busy.set(false);
        });
    };

    view! {
        <section class="card">
            <div class="card-title">"Change password"</div>
            {move || formError.get().map(|m| view! { <div class="form-error">{m}</div> })}
            <form on:submit=submit novalidate=true>
                <FieldInput
                    name="old_password"
                    label="Current password"
                    input_type="password"
                    value=oldPassword
                    errors=errors
                    autocomplete="current-password"
                />
                <FieldInput
                    name="new_password"
                    label="New password"
                    input_type="password"
                    value=newPassword
                    errors=errors
                    autocomplete="new-password"
                />
                <FieldInput
                    name="confirm_password"
                    label="Repeat new password"
                    input_type="password"
                    value=confirm
                    errors=errors
                    autocomplete="new-password"
                />
                <button type="submit" class="btn btn-primary" disabled=busy>
                    {move || if busy.get() { "Saving..." } else { "Change password" }}
                </button>
            </form>
        </section>
    }
}

#[component]
fn Activity() -> impl IntoView {
    let auth = use_auth();
    let tab = RwSignal::new(Tab::Comments);
    let page = RwSignal::new(1u32);
    let comments = RwSignal::new(Loaded::<Page<Comment>>::Loading);
    let stars = RwSignal::new(Loaded::<Page<Star>>::Loading);
    let resources = RwSignal::new(Loaded::<Page<Resource>>::Loading);
    let latest = Latest::new();

    Effect::new(move |_| {
        let (Some(userId), current) = (auth.user_id(), page.get()) else {
            return;
        };
        match tab.get() {
            Tab::Comments => load(comments, latest, async move {
                api::client().my_comments(userId, current).await
            }),
            Tab::Ratings => load(stars, latest, async move {
                api::client().my_stars(userId, current).await
            }),
            Tab::Resources => load(resources, latest, async move {
                api::client().my_resources(userId, current).await
            }),
        }
    });

    let total = move || match tab.get() {
        Tab::Comments => comments.with(|c| c.ready().map(|p| p.count)),
        Tab::Ratings => stars.with(|s| s.ready().map(|p| p.count)),
        Tab::Resources => resources.with(|r| r.ready().map(|p| p.count)),
    };
    let pagination = Signal::derive(move || Pagination::new(page.get(), ACTIVITY_PAGE_SIZE, total().unwrap_or(0)));

    view! {
        <section class="card">
            <div class="tabs">
                {Tab::ALL
                    .iter()
                    .map(|&t| {
                        view! {
                            <button
                                class="tab"
                                class:active=move || tab.get() == t
                                on:click=move |_| {
                                    tab.set(t);
                                    page.set(1);
                                }
                            >
                                {t.label()}
                            </button>
                        }
                    })
                    .collect_view()}
            </div>
            {move || match tab.get() {
                Tab::Comments => comment_activity(comments.get()),
                Tab::Ratings => star_activity(stars.get()),
                Tab::Resources => resource_list(resources.get().into_results(), "You have not shared any resources yet."),
            }}
            <Pager pagination=pagination on_page=Callback::new(move |p: u32| page.set(p)) />
        </section>
    }
}

fn comment_activity(comments: Loaded<Page<Comment>>) -> AnyView {
    match comments {
        Loaded::Loading => view! { <Spinner /> }.into_any(),
        Loaded::Failed(e) => view! { <ErrorNotice message=e /> }.into_any(),
        Loaded::Ready(page) if page.results.is_empty() => {
            view! { <EmptyState message="You have not commented on any center yet." /> }.into_any()
        }
        Loaded::Ready(page) => view! {
            <ul class="comment-list">
                {page
                    .results
                    .into_iter()
                    .map(|c| {
                        let center = c.center_name.clone().unwrap_or_else(|| format!("Center #{}", c.center_id));
                        view! {
                            <li class="comment">
                                <div class="comment-meta">
                                    <a href=format!("/centers/{}", c.center_id)>{center}</a>
                                    {c.created_at.map(|d| view! { <span class="muted">{d}</span> })}
                                </div>
                                <p>{c.text}</p>
                            </li>
                        }
                    })
                    .collect_view()}
            </ul>
        }
        .into_any(),
    }
}

fn star_activity(stars: Loaded<Page<Star>>) -> AnyView {
    match stars {
        Loaded::Loading => view! { <Spinner /> }.into_any(),
        Loaded::Failed(e) => view! { <ErrorNotice message=e /> }.into_any(),
        Loaded::Ready(page) if page.results.is_empty() => {
            view! { <EmptyState message="You have not rated any center yet." /> }.into_any()
        }
        Loaded::Ready(page) => view! {
            <ul class="rating-list">
                {page
                    .results
                    .into_iter()
                    .map(|s| {
                        let center = s.center_name.clone().unwrap_or_else(|| format!("Center #{}", s.center_id));
                        let glyphs: String = (1..=5u8).map(|i| if i <= s.value { '\u{2605}' } else { '\u{2606}' }).collect();
                        view! {
                            <li>
                                <a href=format!("/centers/{}", s.center_id)>{center}</a>
                                <span class="stars">{glyphs}</span>
                                {s.created_at.map(|d| view! { <span class="muted">{d}</span> })}
                            </li>
                        }
                    })
                    .collect_view()}
            </ul>
        }
        .into_any(),
    }
}
