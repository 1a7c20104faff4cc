use std::time::Duration;

use edu_types::validation::{normalize_phone, validate_otp, FieldErrors, OTP_LENGTH};
use edu_types::VerifyOtpRequest;
use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

use crate::api;
use crate::components::form::FieldInput;
use crate::components::toast::use_toast;
use crate::pages::login::apply_error;
use crate::state::auth::use_auth;

pub const RESEND_COOLDOWN_SECS: u32 = 60;

#[component]
pub fn VerifyOtpPage() -> impl IntoView {
    let auth = use_auth();
    let toast = use_toast();
    let query = use_query_map();

    let phone = RwSignal::new(query.with_untracked(|q| q.get("phone")).unwrap_or_default());
    let code = RwSignal::new(String::new());
    let errors = RwSignal::new(FieldErrors::new());
    let formError = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);
    let cooldown = RwSignal::new(RESEND_COOLDOWN_SECS);

    // Ticks only in the browser; the code was just sent when we land here.
    Effect::new(move |_| {
        match set_interval_with_handle(
            move || cooldown.update(|c| *c = c.saturating_sub(1)),
            Duration::from_secs(1),
        ) {
            Ok(handle) => on_cleanup(move || handle.clear()),
            Err(e) => log::warn!("cooldown timer unavailable: {e:?}"),
        }
    });

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let mut request = VerifyOtpRequest {
            phone: phone.get_untracked(),
            code: code.get_untracked().trim().to_string(),
        };
        if let Err(found) = validate_otp(&request) {
            errors.set(found);
            return;
        }
        request.phone = normalize_phone(&request.phone);
        errors.set(FieldErrors::new());
        formError.set(None);
        busy.set(true);

        api::spawn(async move {
            match auth.verify_otp(&request).await {
                Ok(_) => toast.success("Your phone is confirmed. Welcome!"),
                Err(e) => apply_error(e, errors, formError),
            }
            busy.set(false);
        });
    };

    let resend = move |_: leptos::ev::MouseEvent| {
        let target = normalize_phone(&phone.get_untracked());
        if target.is_empty() {
            errors.update(|e| {
                e.insert("phone".into(), "Enter your phone number first.".into());
            });
            return;
        }
        cooldown.set(RESEND_COOLDOWN_SECS);
        api::spawn(async move {
            match api::client().resend_otp(&target).await {
                Ok(sent) => toast.info(sent.detail.unwrap_or_else(|| "A new code is on its way.".into())),
                Err(e) => {
                    cooldown.set(0);
                    toast.error(e.to_string());
                }
            }
        });
    };

    view! {
        <div class="auth-header">
            <h1>"Confirm your phone"</h1>
            <p>{format!("Enter the {OTP_LENGTH}-digit code we sent by SMS")}</p>
        </div>
        {move || formError.get().map(|m| view! { <div class="form-error">{m}</div> })}
        <form on:submit=submit novalidate=true>
            <FieldInput name="phone" label="Phone" input_type="tel" value=phone errors=errors autocomplete="tel" />
            <FieldInput
                name="code"
                label="Verification code"
                input_type="text"
                value=code
                errors=errors
                placeholder="123456"
                autocomplete="one-time-code"
            />
            <button type="submit" class="btn btn-primary btn-block" disabled=busy>
                {move || if busy.get() { "Checking..." } else { "Verify" }}
            </button>
        </form>
        <p class="auth-footer">
            <button class="btn btn-link" disabled=move || cooldown.get() > 0 on:click=resend>
                {move || match cooldown.get() {
                    0 => "Resend code".to_string(),
                    left => format!("Resend code in {left}s"),
                }}
            </button>
        </p>
    }
}
