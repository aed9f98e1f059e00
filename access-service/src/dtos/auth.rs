use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{AuthMethod, SanitizedAccount, Session};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
    #[validate(length(min = 1, message = "username must not be empty"))]
    pub username: String,
    pub fullname: Option<String>,
    pub role: Option<String>,
    pub applications: Option<Vec<String>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
    pub account: SanitizedAccount,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ActivateResponse {
    pub message: String,
    pub account: SanitizedAccount,
}

/// Exactly one of `email`, `username` or `application` selects the lookup;
/// the service rejects anything else.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub application: Option<String>,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GoogleLoginRequest {
    #[validate(length(min = 1, message = "id_token must not be empty"))]
    pub id_token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub token: String,
    pub method: AuthMethod,
    pub created_at: DateTime<Utc>,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            token: session.token,
            method: session.method,
            created_at: session.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub session: SessionResponse,
    pub account: SanitizedAccount,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IntrospectResponse {
    pub session: SessionResponse,
    pub account: SanitizedAccount,
}
