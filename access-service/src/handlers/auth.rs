use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};

use crate::dtos::auth::{
    ActivateResponse, AuthResponse, GoogleLoginRequest, IntrospectResponse, LoginRequest,
    RegisterRequest, RegisterResponse,
};
use crate::services::{AccountDraft, Credentials};
use crate::utils::ValidatedJson;
use crate::AppState;
use service_core::error::AppError;

/// Register a local account and send its activation email.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created, activation email sent", body = RegisterResponse),
        (status = 409, description = "Email already registered", body = crate::dtos::ErrorResponse),
        (status = 422, description = "Validation failure", body = crate::dtos::ErrorResponse)
    ),
    tag = "Authentication"
)]
#[tracing::instrument(skip(state, req), fields(email = %req.email))]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let account = state
        .accounts
        .register(AccountDraft {
            email: req.email,
            password: Some(req.password),
            username: req.username,
            fullname: req.fullname,
            role: req.role,
            applications: req.applications.unwrap_or_default(),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Account created and activation email has been sent.".to_string(),
            account,
        }),
    ))
}

/// Activate an account with the emailed code.
#[utoipa::path(
    get,
    path = "/auth/activate/{code}",
    params(("code" = String, Path, description = "Activation code")),
    responses(
        (status = 200, description = "Account activated", body = ActivateResponse),
        (status = 404, description = "Unknown activation code", body = crate::dtos::ErrorResponse)
    ),
    tag = "Authentication"
)]
#[tracing::instrument(skip(state, code))]
pub async fn activate(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ActivateResponse>, AppError> {
    let account = state.accounts.activate(&code).await?;
    Ok(Json(ActivateResponse {
        message: "Account activated.".to_string(),
        account,
    }))
}

/// Authenticate with email, username or application credentials.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session created", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = crate::dtos::ErrorResponse),
        (status = 404, description = "No matching active account", body = crate::dtos::ErrorResponse)
    ),
    tag = "Authentication"
)]
#[tracing::instrument(skip(state, req))]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let credentials = Credentials {
        email: req.email,
        username: req.username,
        application: req.application,
    };
    let authenticated = state.sessions.authenticate(&credentials, &req.password).await?;
    Ok(Json(AuthResponse {
        session: authenticated.session.into(),
        account: authenticated.account,
    }))
}

/// Authenticate with a Google ID token.
#[utoipa::path(
    post,
    path = "/auth/google",
    request_body = GoogleLoginRequest,
    responses(
        (status = 200, description = "Session created", body = AuthResponse),
        (status = 401, description = "Token verification failed", body = crate::dtos::ErrorResponse),
        (status = 409, description = "Email belongs to a non-Google account", body = crate::dtos::ErrorResponse)
    ),
    tag = "Authentication"
)]
#[tracing::instrument(skip(state, req))]
pub async fn google_login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<GoogleLoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let claim = state.google.verify(&req.id_token).await?;
    let authenticated = state.sessions.google_authenticate(&claim).await?;
    Ok(Json(AuthResponse {
        session: authenticated.session.into(),
        account: authenticated.account,
    }))
}

/// Confirm a bearer token, returning its session and account.
#[utoipa::path(
    post,
    path = "/auth/introspect",
    responses(
        (status = 200, description = "Token confirmed", body = IntrospectResponse),
        (status = 401, description = "Missing or unknown token", body = crate::dtos::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
#[tracing::instrument(skip(state, headers))]
pub async fn introspect(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<IntrospectResponse>, AppError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let confirmed = state.sessions.confirm_token(token).await?;
    Ok(Json(IntrospectResponse {
        session: confirmed.session.into(),
        account: confirmed.account,
    }))
}
