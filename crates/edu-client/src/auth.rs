use edu_types::{
    LoginRequest, OtpSent, PasswordChange, ProfileUpdate, RegisterRequest, ResendOtpRequest,
    TokenPair, User, VerifyOtpRequest,
};
use serde::Serialize;
use serde_json::Value;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::tokens::TokenStore;
use crate::transport::{ApiRequest, Transport};

pub const LOGIN_PATH: &str = "/auth/login/";
pub const REGISTER_PATH: &str = "/auth/register/";
pub const VERIFY_OTP_PATH: &str = "/auth/verify-otp/";
pub const RESEND_OTP_PATH: &str = "/auth/resend-otp/";
pub const ME_PATH: &str = "/auth/me/";
pub const CHANGE_PASSWORD_PATH: &str = "/auth/change-password/";
pub const LOGOUT_PATH: &str = "/auth/logout/";

fn to_json<B: Serialize>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))
}

impl<T: Transport, S: TokenStore> ApiClient<T, S> {
    /// Exchange credentials for a token pair and keep it.
    pub async fn login(&self, request: &LoginRequest) -> Result<TokenPair, ApiError> {
        let pair: TokenPair = self
            .send_json(ApiRequest::post(LOGIN_PATH, to_json(request)?).anonymous())
            .await?;
        self.tokens().store(&pair);
        Ok(pair)
    }

    /// Create the account; the API answers by sending an OTP.
    pub async fn register(&self, request: &RegisterRequest) -> Result<OtpSent, ApiError> {
        self.send_json(ApiRequest::post(REGISTER_PATH, to_json(request)?).anonymous())
            .await
    }

    pub async fn verify_otp(&self, request: &VerifyOtpRequest) -> Result<TokenPair, ApiError> {
        let pair: TokenPair = self
            .send_json(ApiRequest::post(VERIFY_OTP_PATH, to_json(request)?).anonymous())
            .await?;
        self.tokens().store(&pair);
        Ok(pair)
    }

    pub async fn resend_otp(&self, phone: &str) -> Result<OtpSent, ApiError> {
        let body = to_json(&ResendOtpRequest {
            phone: phone.to_string(),
        })?;
        self.send_json(ApiRequest::post(RESEND_OTP_PATH, body).anonymous())
            .await
    }

    pub async fn me(&self) -> Result<User, ApiError> {
        self.send_json(ApiRequest::get(ME_PATH)).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        self.send_json(ApiRequest::patch(ME_PATH, to_json(update)?)).await
    }

    pub async fn change_password(&self, change: &PasswordChange) -> Result<(), ApiError> {
        self.send_unit(ApiRequest::post(CHANGE_PASSWORD_PATH, to_json(change)?))
            .await
    }

    /// Tell the API to revoke the refresh token, then drop the local
    /// session whether or not that worked.
    pub async fn logout(&self) {
        if let Some(refresh) = self.tokens().refresh() {
            let mut request =
                ApiRequest::post(LOGOUT_PATH, serde_json::json!({ "refresh": refresh })).anonymous();
            if let Some(access) = self.tokens().access() {
                request = request.bearer(access);
            }
            if let Err(e) = self.send_unit(request).await {
                log::info!("logout request failed, clearing local session anyway: {e}");
            }
        }
        self.tokens().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{respond, MockTransport};
    use crate::tokens::MemoryTokens;

    #[tokio::test]
    async fn login_stores_tokens() {
        let transport = MockTransport::new(|_| respond(200, r#"{"access": "a1", "refresh": "r1"}"#));
        let client = ApiClient::new(transport, MemoryTokens::default());

        client
            .login(&LoginRequest {
                phone: "+998901234567".into(),
                password: "secret123".into(),
            })
            .await
            .unwrap();

        assert_eq!(client.tokens().access().as_deref(), Some("a1"));
        assert!(client.transport().requests()[0].anonymous);
    }

    #[tokio::test]
    async fn failed_verification_keeps_no_session() {
        let transport =
            MockTransport::new(|_| respond(400, r#"{"code": ["Invalid or expired code."]}"#));
        let client = ApiClient::new(transport, MemoryTokens::default());

        let err = client
            .verify_otp(&VerifyOtpRequest {
                phone: "+998901234567".into(),
                code: "000000".into(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.field_errors().unwrap()["code"], "Invalid or expired code.");
        assert!(!client.tokens().has_session());
    }

    #[tokio::test]
    async fn logout_clears_even_when_api_fails() {
        let transport = MockTransport::new(|_| respond(500, ""));
        let client = ApiClient::new(transport, MemoryTokens::with_pair("a1", "r1"));

        client.logout().await;

        assert!(!client.tokens().has_session());
        let sent = &client.transport().requests()[0];
        assert_eq!(sent.path, LOGOUT_PATH);
        assert_eq!(sent.bearer.as_deref(), Some("a1"));
    }

    #[tokio::test]
    async fn logout_without_session_sends_nothing() {
        let client = ApiClient::new(MockTransport::new(|_| respond(200, "")), MemoryTokens::default());
        client.logout().await;
        assert!(client.transport().requests().is_empty());
    }
}
