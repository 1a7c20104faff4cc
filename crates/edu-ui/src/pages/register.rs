use edu_types::validation::{normalize_phone, validate_register, FieldErrors};
use edu_types::RegisterRequest;
use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_query_map};

use crate::api;
use crate::components::form::FieldInput;
use crate::components::toast::use_toast;
use crate::guard::safe_next;
use crate::pages::login::apply_error;

pub fn otp_path(phone: &str, next: Option<&str>) -> String {
    let mut path = format!("/verify-otp?phone={}", urlencoding::encode(phone));
    if let Some(next) = safe_next(next) {
        path.push_str("&next=");
        path.push_str(&urlencoding::encode(next));
    }
    path
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let toast = use_toast();
    let navigate = use_navigate();
    let query = use_query_map();

    let firstName = RwSignal::new(String::new());
    let lastName = RwSignal::new(String::new());
    let phone = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let passwordConfirm = RwSignal::new(String::new());
    let errors = RwSignal::new(FieldErrors::new());
    let formError = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let email = email.get_untracked().trim().to_string();
        let mut request = RegisterRequest {
            first_name: firstName.get_untracked().trim().to_string(),
            last_name: lastName.get_untracked().trim().to_string(),
            phone: phone.get_untracked(),
            email: (!email.is_empty()).then_some(email),
            password: password.get_untracked(),
            password_confirm: passwordConfirm.get_untracked(),
        };
        if let Err(found) = validate_register(&request) {
            errors.set(found);
            return;
        }
        request.phone = normalize_phone(&request.phone);
        errors.set(FieldErrors::new());
        formError.set(None);
        busy.set(true);

        let next = query.with_untracked(|q| q.get("next"));
        let navigate = navigate.clone();
        api::spawn(async move {
            match api::client().register(&request).await {
                Ok(sent) => {
                    toast.info(sent.detail.unwrap_or_else(|| "We sent a verification code to your phone.".into()));
                    navigate(&otp_path(&request.phone, next.as_deref()), Default::default());
                }
                Err(e) => apply_error(e, errors, formError),
            }
            busy.set(false);
        });
    };

    view! {
        <div class="auth-header">
            <h1>"Create an account"</h1>
            <p>"We will text you a code to confirm your phone"</p>
        </div>
        {move || formError.get().map(|m| view! { <div class="form-error">{m}</div> })}
        <form on:submit=submit novalidate=true>
            <div class="form-row">
                <FieldInput name="first_name" label="First name" value=firstName errors=errors autocomplete="given-name" />
                <FieldInput name="last_name" label="Last name" value=lastName errors=errors autocomplete="family-name" />
            </div>
            <FieldInput
                name="phone"
                label="Phone"
                input_type="tel"
                value=phone
                errors=errors
                placeholder="+998 90 123 45 67"
                autocomplete="tel"
            />
            <FieldInput name="email" label="Email (optional)" input_type="email" value=email errors=errors autocomplete="email" />
            <FieldInput
                name="password"
                label="Password"
                input_type="password"
                value=password
                errors=errors
                autocomplete="new-password"
            />
            <FieldInput
                name="password_confirm"
                label="Repeat password"
                input_type="password"
                value=passwordConfirm
                errors=errors
                autocomplete="new-password"
            />
            <button type="submit" class="btn btn-primary btn-block" disabled=busy>
                {move || if busy.get() { "Creating account..." } else { "Register" }}
            </button>
        </form>
        <p class="auth-footer">"Already registered? " <a href="/login">"Sign in"</a></p>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn otp_path_encodes_phone_and_keeps_safe_next() {
        assert_eq!(otp_path("+998901234567", None), "/verify-otp?phone=%2B998901234567");
        assert_eq!(
            otp_path("+998901234567", Some("/centers/2")),
            "/verify-otp?phone=%2B998901234567&next=%2Fcenters%2F2"
        );
        assert_eq!(otp_path("901234567", Some("//evil")), "/verify-otp?phone=901234567");
    }
}
