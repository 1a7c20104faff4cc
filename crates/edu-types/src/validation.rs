//! Client-side form validation.
//!
//! These checks only drive inline feedback. The REST API remains the
//! authority and may still reject a payload that passes here.

use std::collections::BTreeMap;

use crate::{LoginRequest, PasswordChange, ProfileUpdate, RegisterRequest, VerifyOtpRequest};

/// Field name -> first error message for that field.
pub type FieldErrors = BTreeMap<String, String>;

pub const OTP_LENGTH: usize = 6;
pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Rule {
    Required,
    Phone,
    Email,
    MinLength(usize),
    MaxLength(usize),
    Url,
    Digits(usize),
    Range(f64, f64),
}

impl Rule {
    fn violation(&self, value: &str) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return match self {
                Rule::Required => Some("This field is required.".to_string()),
                _ => None,
            };
        }

        match *self {
            Rule::Required => None,
            Rule::Phone => (!is_phone(trimmed)).then(|| "Enter a valid phone number.".to_string()),
            Rule::Email => (!is_email(trimmed)).then(|| "Enter a valid email address.".to_string()),
            Rule::MinLength(n) => (trimmed.chars().count() < n)
                .then(|| format!("Must be at least {n} characters.")),
            Rule::MaxLength(n) => (trimmed.chars().count() > n)
                .then(|| format!("Must be at most {n} characters.")),
            Rule::Url => (!is_url(trimmed)).then(|| "Enter a valid URL.".to_string()),
            Rule::Digits(n) => (trimmed.len() != n || !trimmed.chars().all(|c| c.is_ascii_digit()))
                .then(|| format!("Enter the {n}-digit code.")),
            Rule::Range(min, max) => match trimmed.parse::<f64>() {
                Ok(v) if v >= min && v <= max => None,
                Ok(_) => Some(format!("Must be between {min} and {max}.")),
                Err(_) => Some("Enter a number.".to_string()),
            },
        }
    }
}

/// First failing rule's message, if any.
pub fn check(value: &str, rules: &[Rule]) -> Option<String> {
    rules.iter().find_map(|rule| rule.violation(value))
}

/// Strip spaces, dashes and parentheses; a leading `+` survives.
pub fn normalize_phone(raw: &str) -> String {
    let trimmed = raw.trim();
    let plus = trimmed.starts_with('+');
    let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();
    if plus {
        format!("+{digits}")
    } else {
        digits
    }
}

pub fn is_phone(raw: &str) -> bool {
    let body = raw.trim().strip_prefix('+').unwrap_or(raw.trim());
    if !body
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')'))
    {
        return false;
    }
    let digit_count = body.chars().filter(|c| c.is_ascii_digit()).count();
    (9..=15).contains(&digit_count)
}

pub fn is_email(raw: &str) -> bool {
    let Some((local, domain)) = raw.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !raw.contains(char::is_whitespace)
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

pub fn is_url(raw: &str) -> bool {
    let rest = raw
        .strip_prefix("https://")
        .or_else(|| raw.strip_prefix("http://"));
    match rest {
        Some(r) => {
            let host = r.split(['/', '?', '#']).next().unwrap_or("");
            !host.is_empty() && !r.contains(char::is_whitespace)
        }
        None => false,
    }
}

fn collect(errors: &mut FieldErrors, field: &str, value: &str, rules: &[Rule]) {
    if let Some(message) = check(value, rules) {
        errors.entry(field.to_string()).or_insert(message);
    }
}

fn finish(errors: FieldErrors) -> Result<(), FieldErrors> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub fn validate_login(req: &LoginRequest) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    collect(&mut errors, "phone", &req.phone, &[Rule::Required, Rule::Phone]);
    collect(&mut errors, "password", &req.password, &[Rule::Required]);
    finish(errors)
}

pub fn validate_register(req: &RegisterRequest) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    collect(&mut errors, "first_name", &req.first_name, &[Rule::Required, Rule::MaxLength(64)]);
    collect(&mut errors, "last_name", &req.last_name, &[Rule::Required, Rule::MaxLength(64)]);
    collect(&mut errors, "phone", &req.phone, &[Rule::Required, Rule::Phone]);
    collect(&mut errors, "email", req.email.as_deref().unwrap_or(""), &[Rule::Email]);
    collect(
        &mut errors,
        "password",
        &req.password,
        &[Rule::Required, Rule::MinLength(MIN_PASSWORD_LENGTH)],
    );
    if !errors.contains_key("password") && req.password != req.password_confirm {
        errors.insert("password_confirm".to_string(), "Passwords do not match.".to_string());
    }
    finish(errors)
}

pub fn validate_otp(req: &VerifyOtpRequest) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    collect(&mut errors, "phone", &req.phone, &[Rule::Required, Rule::Phone]);
    collect(&mut errors, "code", &req.code, &[Rule::Required, Rule::Digits(OTP_LENGTH)]);
    finish(errors)
}

pub fn validate_profile(req: &ProfileUpdate) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    collect(&mut errors, "first_name", &req.first_name, &[Rule::Required, Rule::MaxLength(64)]);
    collect(&mut errors, "last_name", &req.last_name, &[Rule::Required, Rule::MaxLength(64)]);
    collect(&mut errors, "email", req.email.as_deref().unwrap_or(""), &[Rule::Email]);
    finish(errors)
}

pub fn validate_password_change(req: &PasswordChange) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    collect(&mut errors, "old_password", &req.old_password, &[Rule::Required]);
    collect(
        &mut errors,
        "new_password",
        &req.new_password,
        &[Rule::Required, Rule::MinLength(MIN_PASSWORD_LENGTH)],
    );
    if !errors.contains_key("new_password") && req.new_password == req.old_password {
        errors.insert(
            "new_password".to_string(),
            "New password must differ from the current one.".to_string(),
        );
    }
    finish(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_rules_pass_on_empty_values() {
        assert_eq!(check("", &[Rule::Email, Rule::Url, Rule::Phone]), None);
        assert!(check("  ", &[Rule::Required]).is_some());
    }

    #[test]
    fn phone_accepts_common_formatting() {
        assert!(is_phone("+998 (90) 123-45-67"));
        assert!(is_phone("901234567"));
        assert!(!is_phone("12345"));
        assert!(!is_phone("+99890abc4567"));
        assert_eq!(normalize_phone(" +998 (90) 123-45-67 "), "+998901234567");
    }

    #[test]
    fn email_shapes() {
        assert!(is_email("user@example.com"));
        assert!(!is_email("user@localhost"));
        assert!(!is_email("@example.com"));
        assert!(!is_email("a@b@c.com"));
        assert!(!is_email("user@.com"));
    }

    #[test]
    fn url_requires_scheme_and_host() {
        assert!(is_url("https://example.com/docs?x=1"));
        assert!(!is_url("example.com"));
        assert!(!is_url("https:///path"));
    }

    #[test]
    fn first_failing_rule_wins() {
        let message = check("abc", &[Rule::Required, Rule::MinLength(5), Rule::Email]);
        assert_eq!(message.as_deref(), Some("Must be at least 5 characters."));
        assert_eq!(check("4", &[Rule::Range(1.0, 5.0)]), None);
        assert!(check("9", &[Rule::Range(1.0, 5.0)]).is_some());
    }

    #[test]
    fn register_reports_mismatched_confirmation() {
        let req = RegisterRequest {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            phone: "+998901234567".into(),
            email: None,
            password: "analytical".into(),
            password_confirm: "engine".into(),
        };
        let errors = validate_register(&req).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains_key("password_confirm"));
    }

    #[test]
    fn register_short_password_skips_confirmation_check() {
        let req = RegisterRequest {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            phone: "+998901234567".into(),
            email: Some("not-an-email".into()),
            password: "short".into(),
            password_confirm: "other".into(),
        };
        let errors = validate_register(&req).unwrap_err();
        assert!(errors.contains_key("password"));
        assert!(errors.contains_key("email"));
        assert!(!errors.contains_key("password_confirm"));
    }

    #[test]
    fn otp_must_be_six_digits() {
        let mut req = VerifyOtpRequest {
            phone: "+998901234567".into(),
            code: "12345".into(),
        };
        assert!(validate_otp(&req).is_err());
        req.code = "123456".into();
        assert!(validate_otp(&req).is_ok());
    }

    #[test]
    fn password_change_rejects_reuse() {
        let req = PasswordChange {
            old_password: "samesame1".into(),
            new_password: "samesame1".into(),
        };
        assert!(validate_password_change(&req)
            .unwrap_err()
            .contains_key("new_password"));
    }
}
