//! Route access rules and the component that enforces them.

use leptos::prelude::*;
use leptos_router::hooks::{use_location, use_navigate, use_query_map};
use leptos_router::NavigateOptions;

use crate::components::status::{Forbidden, Spinner};
use crate::state::auth::{use_auth, AuthState};

pub const LOGIN_PATH: &str = "/login";
pub const AFTER_LOGIN_PATH: &str = "/profile";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Authenticated,
    Admin,
    /// Login, registration and OTP pages.
    GuestOnly,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardOutcome {
    Loading,
    Allow,
    Redirect(String),
    Forbidden,
}

/// Only same-site absolute paths are accepted as post-login targets.
pub fn safe_next(next: Option<&str>) -> Option<&str> {
    next.filter(|n| n.starts_with('/') && !n.starts_with("//") && !n.starts_with("/\\"))
}

pub fn login_redirect(current: &str) -> String {
    format!("{LOGIN_PATH}?next={}", urlencoding::encode(current))
}

/// Path plus query string of the current location.
pub fn current_path(pathname: &str, search: &str) -> String {
    let search = search.trim_start_matches('?');
    if search.is_empty() {
        pathname.to_string()
    } else {
        format!("{pathname}?{search}")
    }
}

pub fn evaluate(state: &AuthState, access: Access, current: &str, next: Option<&str>) -> GuardOutcome {
    if state.loading {
        return GuardOutcome::Loading;
    }

    match (access, &state.user) {
        (Access::GuestOnly, Some(_)) => {
            GuardOutcome::Redirect(safe_next(next).unwrap_or(AFTER_LOGIN_PATH).to_string())
        }
        (Access::GuestOnly, None) => GuardOutcome::Allow,
        (_, None) => GuardOutcome::Redirect(login_redirect(current)),
        (Access::Admin, Some(user)) if !user.is_admin() => GuardOutcome::Forbidden,
        _ => GuardOutcome::Allow,
    }
}

/// Renders `children` only when `access` is satisfied; otherwise shows a
/// spinner while redirecting, or a forbidden notice.
#[component]
pub fn Guard(access: Access, children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();
    let location = use_location();
    let query = use_query_map();

    let outcome = Memo::new(move |_| {
        let current = current_path(&location.pathname.get(), &location.search.get());
        let next = query.with(|q| q.get("next"));
        evaluate(&auth.state(), access, &current, next.as_deref())
    });

    let navigate = use_navigate();
    Effect::new(move |_| {
        if let GuardOutcome::Redirect(target) = outcome.get() {
            log::debug!("guard redirect to {target}");
            navigate(
                &target,
                NavigateOptions {
                    replace: true,
                    ..Default::default()
                },
            );
        }
    });

    move || match outcome.get() {
        GuardOutcome::Allow => children().into_any(),
        GuardOutcome::Forbidden => view! { <Forbidden /> }.into_any(),
        GuardOutcome::Loading | GuardOutcome::Redirect(_) => view! { <Spinner /> }.into_any(),
    }
}

#[cfg(test)]
mod tests {
    use edu_types::{Role, User};

    use super::*;

    fn member() -> AuthState {
        AuthState::signed_in(User {
            id: 3,
            ..Default::default()
        })
    }

    fn admin() -> AuthState {
        AuthState::signed_in(User {
            id: 1,
            role: Role::Admin,
            ..Default::default()
        })
    }

    #[test]
    fn loading_waits() {
        let outcome = evaluate(&AuthState::default(), Access::Admin, "/admin", None);
        assert_eq!(outcome, GuardOutcome::Loading);
    }

    #[test]
    fn guest_is_sent_to_login_with_next() {
        let outcome = evaluate(&AuthState::guest(), Access::Authenticated, "/profile?tab=stars", None);
        assert_eq!(
            outcome,
            GuardOutcome::Redirect("/login?next=%2Fprofile%3Ftab%3Dstars".into())
        );
    }

    #[test]
    fn member_cannot_enter_admin() {
        assert_eq!(evaluate(&member(), Access::Admin, "/admin", None), GuardOutcome::Forbidden);
        assert_eq!(evaluate(&admin(), Access::Admin, "/admin", None), GuardOutcome::Allow);
        assert_eq!(evaluate(&member(), Access::Authenticated, "/profile", None), GuardOutcome::Allow);
    }

    #[test]
    fn signed_in_user_leaves_guest_pages() {
        assert_eq!(
            evaluate(&member(), Access::GuestOnly, "/login", Some("/centers/4")),
            GuardOutcome::Redirect("/centers/4".into())
        );
        assert_eq!(
            evaluate(&member(), Access::GuestOnly, "/login", Some("https://evil.example")),
            GuardOutcome::Redirect(AFTER_LOGIN_PATH.into())
        );
        assert_eq!(evaluate(&AuthState::guest(), Access::GuestOnly, "/login", None), GuardOutcome::Allow);
    }

    #[test]
    fn next_must_be_single_slash_path() {
        assert_eq!(safe_next(Some("/admin/users")), Some("/admin/users"));
        assert_eq!(safe_next(Some("//evil.example")), None);
        assert_eq!(safe_next(Some("/\\evil.example")), None);
        assert_eq!(safe_next(Some("profile")), None);
        assert_eq!(safe_next(None), None);
    }

    #[test]
    fn current_path_keeps_query() {
        assert_eq!(current_path("/search", "?q=math"), "/search?q=math");
        assert_eq!(current_path("/search", "q=math"), "/search?q=math");
        assert_eq!(current_path("/profile", ""), "/profile");
    }
}
