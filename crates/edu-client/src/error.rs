use edu_types::validation::FieldErrors;
use serde_json::Value;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ApiError {
    /// No response was received (offline, DNS, CORS, aborted).
    #[error("network error: {0}")]
    Network(String),

    /// The session is gone and could not be refreshed.
    #[error("your session has expired, please sign in again")]
    Unauthorized,

    #[error("{message}")]
    Http { status: u16, message: String },

    /// The API rejected one or more submitted fields.
    #[error("{}", summarize(.0))]
    Validation(FieldErrors),

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("the API is only reachable from the browser")]
    Unavailable,
}

fn summarize(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}

fn default_message(status: u16) -> String {
    match status {
        400 => "the request was rejected".to_string(),
        401 => "invalid credentials".to_string(),
        403 => "you do not have permission to do that".to_string(),
        404 => "not found".to_string(),
        429 => "too many requests, try again shortly".to_string(),
        500..=599 => format!("server error ({status})"),
        _ => format!("request failed ({status})"),
    }
}

fn first_message(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(first_message),
        _ => None,
    }
}

impl ApiError {
    /// Decode a non-2xx response body into an error.
    ///
    /// Recognized shapes: `{"detail": ".."}`, `{"non_field_errors": [..]}`
    /// and `{"field": ["..", ..], ..}`.
    pub fn from_response(status: u16, body: &str) -> ApiError {
        let parsed: Option<Value> = serde_json::from_str(body).ok();
        let Some(Value::Object(map)) = parsed else {
            return ApiError::Http {
                status,
                message: default_message(status),
            };
        };

        if let Some(detail) = map.get("detail").and_then(first_message) {
            return ApiError::Http {
                status,
                message: detail,
            };
        }
        if let Some(message) = map.get("non_field_errors").and_then(first_message) {
            return ApiError::Http { status, message };
        }

        let fieldErrors: FieldErrors = map
            .iter()
            .filter_map(|(field, value)| first_message(value).map(|m| (field.clone(), m)))
            .collect();

        if fieldErrors.is_empty() || status != 400 {
            ApiError::Http {
                status,
                message: default_message(status),
            }
        } else {
            ApiError::Validation(fieldErrors)
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Validation(_) => Some(400),
            ApiError::Unauthorized => Some(401),
            _ => None,
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ApiError::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_becomes_message() {
        let err = ApiError::from_response(403, r#"{"detail": "Admins only."}"#);
        assert_eq!(err.to_string(), "Admins only.");
        assert_eq!(err.status(), Some(403));
    }

    #[test]
    fn field_map_becomes_validation() {
        let err = ApiError::from_response(
            400,
            r#"{"phone": ["Already registered.", "Too long."], "email": "Invalid."}"#,
        );
        let fields = err.field_errors().unwrap();
        assert_eq!(fields["phone"], "Already registered.");
        assert_eq!(fields["email"], "Invalid.");
        assert_eq!(err.to_string(), "email: Invalid.; phone: Already registered.");
    }

    #[test]
    fn non_field_errors_take_precedence_over_fields() {
        let err = ApiError::from_response(
            400,
            r#"{"non_field_errors": ["Wrong code."], "code": ["bad"]}"#,
        );
        assert_eq!(err, ApiError::Http { status: 400, message: "Wrong code.".into() });
    }

    #[test]
    fn unparseable_body_uses_status_text() {
        let err = ApiError::from_response(502, "<html>Bad gateway</html>");
        assert_eq!(err.to_string(), "server error (502)");
        assert!(ApiError::from_response(404, "").is_not_found());
    }
}
