//! HTTP implementation of the backend boundary.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use tracing::instrument;

use sungrove_core::{AccessToken, Email, RefreshToken, TokenPair, UserId, UserProfile};

use super::{ApiError, StorefrontApi, TokenGrant};

/// Error code the backend uses for a spent or revoked refresh token.
const INVALID_REFRESH_TOKEN: &str = "invalid_refresh_token";

/// `reqwest`-backed [`StorefrontApi`].
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    /// Create a client for the backend at `base_url`.
    #[must_use]
    pub fn new(base_url: &url::Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.as_str().trim_end_matches('/').to_owned(),
        }
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        let url = format!("{}{path}", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|err| ApiError::Decode(err.to_string()))
        } else {
            Err(error_from_response(status, response).await)
        }
    }
}

/// Map a non-success response into an [`ApiError`].
///
/// The body is best-effort parsed; an unreadable error body falls back to
/// the HTTP status line rather than failing the mapping itself.
async fn error_from_response(status: reqwest::StatusCode, response: reqwest::Response) -> ApiError {
    let body: ErrorBody = response.json().await.unwrap_or_default();

    let code = body.error.unwrap_or_default();
    if code == INVALID_REFRESH_TOKEN {
        return ApiError::InvalidRefreshToken;
    }

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return ApiError::Unauthorized;
    }

    let message = body
        .message
        .filter(|m| !m.is_empty())
        .or_else(|| Some(code).filter(|c| !c.is_empty()))
        .unwrap_or_else(|| format!("HTTP {status}"));

    ApiError::Rejected(message)
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct SendOtpRequest<'a> {
    email: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendOtpResponse {
    challenge_accepted: bool,
}

#[derive(Serialize)]
struct VerifyOtpRequest<'a> {
    email: &'a str,
    otp: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Serialize)]
struct AdminLoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenPairResponse {
    access_token: String,
    refresh_token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenGrantResponse {
    access_token: String,
    refresh_token: String,
    user: UserResponse,
}

#[derive(Deserialize)]
struct UserResponse {
    id: String,
    #[serde(default)]
    name: String,
    email: String,
}

#[derive(Deserialize, Default)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl TryFrom<TokenGrantResponse> for TokenGrant {
    type Error = ApiError;

    fn try_from(response: TokenGrantResponse) -> Result<Self, Self::Error> {
        let email = Email::parse(&response.user.email)
            .map_err(|err| ApiError::Decode(format!("user email: {err}")))?;

        Ok(Self {
            tokens: TokenPair {
                access_token: AccessToken::new(response.access_token),
                refresh_token: RefreshToken::new(response.refresh_token),
            },
            user: UserProfile {
                id: UserId::new(response.user.id),
                name: response.user.name,
                email,
            },
        })
    }
}

impl StorefrontApi for HttpApi {
    #[instrument(skip(self), fields(email = %email))]
    async fn send_otp(&self, email: &Email) -> Result<(), ApiError> {
        let response: SendOtpResponse = self
            .post(
                "/auth/send-otp",
                &SendOtpRequest {
                    email: email.as_str(),
                },
            )
            .await?;

        if response.challenge_accepted {
            Ok(())
        } else {
            Err(ApiError::Rejected(
                "the backend did not accept the challenge".to_owned(),
            ))
        }
    }

    #[instrument(skip(self, code), fields(email = %email))]
    async fn verify_otp(
        &self,
        email: &Email,
        code: &str,
        name: Option<&str>,
    ) -> Result<TokenGrant, ApiError> {
        let response: TokenGrantResponse = self
            .post(
                "/auth/verify-otp",
                &VerifyOtpRequest {
                    email: email.as_str(),
                    otp: code,
                    name,
                },
            )
            .await?;

        response.try_into()
    }

    #[instrument(skip(self, password), fields(email = %email))]
    async fn admin_login(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<TokenGrant, ApiError> {
        let response: TokenGrantResponse = self
            .post(
                "/auth/admin-login",
                &AdminLoginRequest {
                    email: email.as_str(),
                    password: password.expose_secret(),
                },
            )
            .await?;

        response.try_into()
    }

    #[instrument(skip(self, refresh_token))]
    async fn refresh(&self, refresh_token: &RefreshToken) -> Result<TokenPair, ApiError> {
        let response: TokenPairResponse = self
            .post(
                "/auth/refresh",
                &RefreshRequest {
                    refresh_token: refresh_token.as_str(),
                },
            )
            .await?;

        Ok(TokenPair {
            access_token: AccessToken::new(response.access_token),
            refresh_token: RefreshToken::new(response.refresh_token),
        })
    }
}
