use edu_client::{ApiError, TokenStore};
use edu_types::{LoginRequest, User, VerifyOtpRequest};
use leptos::prelude::*;

use crate::api;

/// Who is signed in. `loading` stays true until the first session probe
/// finishes.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }
}

impl AuthState {
    pub fn signed_in(user: User) -> Self {
        Self {
            user: Some(user),
            loading: false,
        }
    }

    pub fn guest() -> Self {
        Self {
            user: None,
            loading: false,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_admin)
    }
}

#[derive(Clone, Copy)]
pub struct AuthContext {
    state: RwSignal<AuthState>,
}

impl AuthContext {
    pub fn new() -> Self {
        Self {
            state: RwSignal::new(AuthState::default()),
        }
    }

    pub fn state(&self) -> AuthState {
        self.state.get()
    }

    pub fn user(&self) -> Option<User> {
        self.state.with(|s| s.user.clone())
    }

    /// Current user without subscribing the caller.
    pub fn user_untracked(&self) -> Option<User> {
        self.state.with_untracked(|s| s.user.clone())
    }

    pub fn user_id(&self) -> Option<edu_types::Id> {
        self.state.with(|s| s.user.as_ref().map(|u| u.id))
    }

    pub fn set_user(&self, user: Option<User>) {
        self.state.set(match user {
            Some(user) => AuthState::signed_in(user),
            None => AuthState::guest(),
        });
    }

    /// Re-read the current user from the API. Without stored tokens this
    /// just settles as a guest.
    pub async fn reload(&self) -> Result<(), ApiError> {
        let client = api::quiet_client();
        if !client.tokens().has_session() {
            self.set_user(None);
            return Ok(());
        }
        match client.me().await {
            Ok(user) => {
                self.set_user(Some(user));
                Ok(())
            }
            Err(e) => {
                self.set_user(None);
                Err(e)
            }
        }
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<User, ApiError> {
        let client = api::client();
        client.login(request).await?;
        let user = client.me().await?;
        self.set_user(Some(user.clone()));
        Ok(user)
    }

    pub async fn verify_otp(&self, request: &VerifyOtpRequest) -> Result<User, ApiError> {
        let client = api::client();
        client.verify_otp(request).await?;
        let user = client.me().await?;
        self.set_user(Some(user.clone()));
        Ok(user)
    }

    pub async fn logout(&self) {
        api::quiet_client().logout().await;
        self.set_user(None);
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Create the auth context for the app and start the session probe.
pub fn provide_auth() -> AuthContext {
    let auth = AuthContext::new();
    provide_context(auth);

    Effect::new(move |_| {
        api::spawn(async move {
            if let Err(e) = auth.reload().await {
                log::warn!("could not restore session: {e}");
            }
        });
    });

    auth
}

pub fn use_auth() -> AuthContext {
    expect_context::<AuthContext>()
}

#[cfg(test)]
mod tests {
    use edu_types::Role;

    use super::*;

    #[test]
    fn starts_loading_without_user() {
        let state = AuthState::default();
        assert!(state.loading);
        assert!(state.user.is_none());
        assert!(!state.is_admin());
    }

    #[test]
    fn staff_counts_as_admin() {
        let staff = AuthState::signed_in(User {
            role: Role::Staff,
            ..Default::default()
        });
        assert!(staff.is_admin());
        assert!(!AuthState::signed_in(User::default()).is_admin());
    }
}
