use edu_client::ApiError;
use edu_types::validation::{check, Rule};
use edu_types::{Branch, Comment, CommentInput, EducationalCenter, Id, ListQuery, Page, StarInput};
use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

use crate::api::{self, load, Latest, Loaded};
use crate::components::modal::ConfirmDialog;
use crate::components::star_rating::StarRating;
use crate::components::status::{EmptyState, ErrorNotice, Spinner};
use crate::components::toast::use_toast;
use crate::guard::login_redirect;
use crate::state::auth::use_auth;

pub const COMMENT_MAX_LENGTH: usize = 1000;
const BRANCHES_PAGE_SIZE: u32 = 100;

/// Reads the `:id` route segment.
pub fn use_id_param() -> Memo<Option<Id>> {
    let params = use_params_map();
    Memo::new(move |_| params.with(|p| parse_id(p.get("id").as_deref())))
}

/// Positive numeric ids only; anything else is a missing record.
pub fn parse_id(raw: Option<&str>) -> Option<Id> {
    raw?.trim().parse::<Id>().ok().filter(|id| *id > 0)
}

#[component]
pub fn CenterDetailPage() -> impl IntoView {
    let centerId = use_id_param();
    let auth = use_auth();
    let toast = use_toast();

    let center = RwSignal::new(Loaded::<EducationalCenter>::Loading);
    let branches = RwSignal::new(Loaded::<Vec<Branch>>::Loading);
    let comments = RwSignal::new(Loaded::<Page<Comment>>::Loading);
    let commentsPage = RwSignal::new(1u32);
    let loadingMore = RwSignal::new(false);
    let (centerLatest, branchLatest, commentLatest) = (Latest::new(), Latest::new(), Latest::new());

    Effect::new(move |_| {
        let Some(id) = centerId.get() else {
            let missing = "Center not found.".to_string();
            center.set(Loaded::Failed(missing.clone()));
            branches.set(Loaded::Failed(missing.clone()));
            comments.set(Loaded::Failed(missing));
            return;
        };
        load(center, centerLatest, async move {
            api::client().get::<EducationalCenter>(id).await
        });
        load(branches, branchLatest, async move {
            let query = ListQuery::new(1, BRANCHES_PAGE_SIZE).filter("center", id);
            api::client().fetch_all::<Branch>(&query).await
        });
        commentsPage.set(1);
        load(comments, commentLatest, async move {
            api::client().center_comments(id, 1).await
        });
    });

    // Re-read rating totals without flashing the page back to a spinner.
    let refreshCenter = move |id: Id| {
        api::spawn(async move {
            match api::client().get::<EducationalCenter>(id).await {
                Ok(fresh) => center.set(Loaded::Ready(fresh)),
                Err(e) => log::warn!("center {id}: refresh failed: {e}"),
            }
        });
    };

    let rate = Callback::new(move |value: u8| {
        let Some(id) = centerId.get_untracked() else {
            return;
        };
        api::spawn(async move {
            match api::client().post_star(&StarInput { center: id, value }).await {
                Ok(_) => {
                    toast.success("Thanks for rating!");
                    refreshCenter(id);
                }
                Err(e) => toast.error(e.to_string()),
            }
        });
    });

    let loadMore = move |_: leptos::ev::MouseEvent| {
        let Some(id) = centerId.get_untracked() else {
            return;
        };
        let next = commentsPage.get_untracked() + 1;
        loadingMore.set(true);
        api::spawn(async move {
            match api::client().center_comments(id, next).await {
                Ok(more) => {
                    comments.update(|c| {
                        if let Loaded::Ready(page) = c {
                            page.merge_unique_by(more, |c| c.id);
                        }
                    });
                    commentsPage.set(next);
                }
                Err(e) => toast.error(format!("Could not load more comments: {e}")),
            }
            loadingMore.set(false);
        });
    };

    let ratingValue = Signal::derive(move || {
        center.with(|c| {
            c.ready()
                .and_then(|c| c.rating)
                .map(|r| r.round().clamp(0.0, 5.0) as u8)
                .unwrap_or(0)
        })
    });

    view! {
        {move || match center.get() {
            Loaded::Loading => view! { <Spinner /> }.into_any(),
            Loaded::Failed(e) => view! { <ErrorNotice message=e /> }.into_any(),
            Loaded::Ready(c) => center_info(c).into_any(),
        }}

        <section class="card">
            <div class="card-title">"Rating"</div>
            {move || {
                let summary = center.with(|c| c.ready().map(|c| c.rating_label()).unwrap_or_default());
                if auth.user().is_some() {
                    view! {
                        <StarRating value=ratingValue on_rate=rate />
                        <span class="muted">{summary} " \u{00B7} click a star to rate"</span>
                    }
                        .into_any()
                } else {
                    view! {
                        <StarRating value=ratingValue />
                        <span class="muted">{summary}</span>
                    }
                        .into_any()
                }
            }}
        </section>

        <section class="card">
            <div class="card-title">"Branches"</div>
            {move || match branches.get() {
                Loaded::Loading => view! { <Spinner /> }.into_any(),
                Loaded::Failed(e) => view! { <ErrorNotice message=e /> }.into_any(),
                Loaded::Ready(list) if list.is_empty() => {
                    view! { <EmptyState message="This center has no branches listed." /> }.into_any()
                }
                Loaded::Ready(list) => view! {
                    <ul class="branch-list">
                        {list
                            .into_iter()
                            .map(|b| {
                                let region = b.region.map(|r| r.name);
                                view! {
                                    <li>
                                        <strong>{b.name}</strong>
                                        {region.map(|r| view! { <span class="muted">" \u{00B7} " {r}</span> })}
                                        {b.address.map(|a| view! { <div>{a}</div> })}
                                        {b.phone.map(|p| view! { <div class="muted">{p}</div> })}
                                    </li>
                                }
                            })
                            .collect_view()}
                    </ul>
                }
                .into_any(),
            }}
        </section>

        <section class="card">
            <div class="card-title">"Comments"</div>
            <CommentForm center_id=centerId comments=comments />
            <CommentList comments=comments />
            {move || {
                let hasMore = comments.with(|c| c.ready().is_some_and(Page::has_next));
                hasMore
                    .then(|| {
                        view! {
                            <button class="btn btn-secondary" disabled=loadingMore on:click=loadMore>
                                {move || if loadingMore.get() { "Loading..." } else { "Load more" }}
                            </button>
                        }
                    })
            }}
        </section>
    }
}

fn center_info(center: EducationalCenter) -> impl IntoView {
    let fields = center
        .fields
        .iter()
        .map(|f| view! { <a class="tag" href=format!("/courses/{}", f.id)>{f.name.clone()}</a> })
        .collect_view();
    let subjects = center
        .subjects
        .iter()
        .map(|s| view! { <span class="tag">{s.name.clone()}</span> })
        .collect_view();
    let region = center.region_name().map(str::to_string);

    view! {
        <div class="page-header">
            <h1>{center.name.clone()}</h1>
            {region.map(|r| view! { <p class="subtitle">{r}</p> })}
        </div>
        <section class="card">
            {center.description.clone().map(|d| view! { <p class="description">{d}</p> })}
            <dl class="details">
                {center.address.clone().map(|a| view! { <dt>"Address"</dt> <dd>{a}</dd> })}
                {center.phone.clone().map(|p| view! { <dt>"Phone"</dt> <dd>{p}</dd> })}
                {center.email.clone().map(|e| view! { <dt>"Email"</dt> <dd>{e}</dd> })}
                {center
                    .website
                    .clone()
                    .map(|w| {
                        let href = w.clone();
                        view! {
                            <dt>"Website"</dt>
                            <dd>
                                <a href=href target="_blank" rel="noopener">{w}</a>
                            </dd>
                        }
                    })}
            </dl>
            <div class="tags">{fields}</div>
            <div class="tags">{subjects}</div>
        </section>
    }
}

#[component]
fn CommentForm(center_id: Memo<Option<Id>>, comments: RwSignal<Loaded<Page<Comment>>>) -> impl IntoView {
    let auth = use_auth();
    let toast = use_toast();
    let text = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);
    let posting = RwSignal::new(false);

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let body = text.get_untracked().trim().to_string();
        if let Some(message) = check(&body, &[Rule::Required, Rule::MaxLength(COMMENT_MAX_LENGTH)]) {
            error.set(Some(message));
            return;
        }
        let Some(id) = center_id.get_untracked() else {
            return;
        };

        posting.set(true);
        api::spawn(async move {
            match api::client().post_comment(&CommentInput { center: id, text: body }).await {
                Ok(mut comment) => {
                    if comment.author.is_none() {
                        comment.user_id = auth.user_id().unwrap_or(comment.user_id);
                        comment.author = auth.user().map(|u| edu_types::CommentAuthor {
                            id: u.id,
                            first_name: u.first_name,
                            last_name: u.last_name,
                        });
                    }
                    comments.update(|c| {
                        if let Loaded::Ready(page) = c {
                            page.results.insert(0, comment);
                            page.count += 1;
                        }
                    });
                    text.set(String::new());
                    error.set(None);
                    toast.success("Comment posted.");
                }
                Err(ApiError::Validation(fields)) => {
                    error.set(fields.get("text").or_else(|| fields.values().next()).cloned());
                }
                Err(e) => toast.error(e.to_string()),
            }
            posting.set(false);
        });
    };

    move || {
        if auth.user().is_none() {
            let next = center_id
                .get()
                .map(|id| login_redirect(&format!("/centers/{id}")))
                .unwrap_or_else(|| "/login".to_string());
            return view! {
                <p class="muted">
                    <a href=next>"Sign in"</a>
                    " to rate this center and leave a comment."
                </p>
            }
            .into_any();
        }

        view! {
            <form class="comment-form" on:submit=submit>
                <textarea
                    rows="3"
                    placeholder="Share your experience..."
                    prop:value=move || text.get()
                    on:input=move |ev| text.set(event_target_value(&ev))
                ></textarea>
                {move || error.get().map(|m| view! { <span class="field-error">{m}</span> })}
                <button type="submit" class="btn btn-primary" disabled=posting>
                    {move || if posting.get() { "Posting..." } else { "Post comment" }}
                </button>
            </form>
        }
        .into_any()
    }
}

#[component]
fn CommentList(comments: RwSignal<Loaded<Page<Comment>>>) -> impl IntoView {
    let auth = use_auth();
    let toast = use_toast();
    let deleting = RwSignal::new(None::<Id>);
    let busy = RwSignal::new(false);

    let confirmDelete = Callback::new(move |_: ()| {
        let Some(id) = deleting.get_untracked() else {
            return;
        };
        busy.set(true);
        api::spawn(async move {
            match api::client().delete_comment(id).await {
                Ok(()) => {
                    comments.update(|c| {
                        if let Loaded::Ready(page) = c {
                            page.results.retain(|comment| comment.id != id);
                            page.count = page.count.saturating_sub(1);
                        }
                    });
                    toast.success("Comment deleted.");
                }
                Err(e) => toast.error(e.to_string()),
            }
            busy.set(false);
            deleting.set(None);
        });
    });

    view! {
        {move || match comments.get() {
            Loaded::Loading => view! { <Spinner /> }.into_any(),
            Loaded::Failed(e) => view! { <ErrorNotice message=e /> }.into_any(),
            Loaded::Ready(page) if page.results.is_empty() => {
                view! { <EmptyState message="No comments yet. Be the first!" /> }.into_any()
            }
            Loaded::Ready(page) => {
                let me = auth.user_id();
                view! {
                    <ul class="comment-list">
                        {page
                            .results
                            .into_iter()
                            .map(|comment| {
                                let id = comment.id;
                                let own = me == Some(comment.user_id);
                                view! {
                                    <li class="comment">
                                        <div class="comment-meta">
                                            <strong>{comment.author_name()}</strong>
                                            {comment.created_at.clone().map(|d| view! { <span class="muted">{d}</span> })}
                                        </div>
                                        <p>{comment.text.clone()}</p>
                                        {own
                                            .then(|| {
                                                view! {
                                                    <button
                                                        class="btn btn-sm btn-danger"
                                                        on:click=move |_| deleting.set(Some(id))
                                                    >
                                                        "Delete"
                                                    </button>
                                                }
                                            })}
                                    </li>
                                }
                            })
                            .collect_view()}
                    </ul>
                }
                    .into_any()
            }
        }}
        {move || {
            deleting
                .get()
                .map(|_| {
                    view! {
                        <ConfirmDialog
                            message="Delete this comment?"
                            busy=busy
                            on_confirm=confirmDelete
                            on_cancel=Callback::new(move |_: ()| deleting.set(None))
                        />
                    }
                })
        }}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_ids_are_missing() {
        assert_eq!(parse_id(Some("42")), Some(42));
        assert_eq!(parse_id(Some("abc")), None);
        assert_eq!(parse_id(Some("0")), None);
        assert_eq!(parse_id(Some("-3")), None);
        assert_eq!(parse_id(None), None);
    }
}
