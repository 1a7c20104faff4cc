use edu_client::ApiError;
use edu_types::validation::{normalize_phone, validate_login, FieldErrors};
use edu_types::LoginRequest;
use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

use crate::api;
use crate::components::form::FieldInput;
use crate::components::toast::use_toast;
use crate::guard::safe_next;
use crate::state::auth::use_auth;

/// Route an API error to its field messages, or to the banner above the
/// form when it is not tied to a field.
pub(crate) fn apply_error(error: ApiError, fields: RwSignal<FieldErrors>, form: RwSignal<Option<String>>) {
    match error {
        ApiError::Validation(found) => {
            form.set(found.get("non_field_errors").cloned());
            fields.set(found);
        }
        other => form.set(Some(other.to_string())),
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let toast = use_toast();
    let query = use_query_map();

    let phone = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let errors = RwSignal::new(FieldErrors::new());
    let formError = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let mut request = LoginRequest {
            phone: phone.get_untracked(),
            password: password.get_untracked(),
        };
        if let Err(found) = validate_login(&request) {
            errors.set(found);
            return;
        }
        request.phone = normalize_phone(&request.phone);
        errors.set(FieldErrors::new());
        formError.set(None);
        busy.set(true);

        api::spawn(async move {
            // On success the guest guard around this page moves on to `next`.
            match auth.login(&request).await {
                Ok(user) => toast.success(format!("Welcome back, {}!", user.full_name())),
                Err(e) => apply_error(e, errors, formError),
            }
            busy.set(false);
        });
    };

    let registerHref = move || {
        let next = query.with(|q| q.get("next"));
        match safe_next(next.as_deref()) {
            Some(next) => format!("/register?next={}", urlencoding::encode(next)),
            None => "/register".to_string(),
        }
    };

    view! {
        <div class="auth-header">
            <h1>"Sign in"</h1>
            <p>"Use the phone number you registered with"</p>
        </div>
        {move || formError.get().map(|m| view! { <div class="form-error">{m}</div> })}
        <form on:submit=submit novalidate=true>
            <FieldInput
                name="phone"
                label="Phone"
                input_type="tel"
                value=phone
                errors=errors
                placeholder="+998 90 123 45 67"
                autocomplete="tel"
            />
            <FieldInput
                name="password"
                label="Password"
                input_type="password"
                value=password
                errors=errors
                autocomplete="current-password"
            />
            <button type="submit" class="btn btn-primary btn-block" disabled=busy>
                {move || if busy.get() { "Signing in..." } else { "Sign in" }}
            </button>
        </form>
        <p class="auth-footer">
            "No account yet? " <a href=registerHref>"Create one"</a>
        </p>
    }
}
