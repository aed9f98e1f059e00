use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::services::AuthenticatedSession;
use crate::AppState;
use service_core::error::AppError;

/// Middleware gating a route tree behind a confirmed session.
///
/// Extracts the bearer token, resolves it through the session issuer and
/// stores the confirmed session in request extensions. Any failure aborts
/// the request before the handler runs.
pub async fn session_auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let confirmed = state.sessions.confirm_token(token).await?;
    req.extensions_mut().insert(confirmed);

    Ok(next.run(req).await)
}

/// Extractor handing handlers the session confirmed by the middleware.
pub struct CurrentSession(pub AuthenticatedSession);

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedSession>()
            .cloned()
            .map(CurrentSession)
            .ok_or_else(|| AppError::Unauthorized(anyhow::anyhow!("Missing session context")))
    }
}
