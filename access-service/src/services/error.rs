use service_core::error::AppError;
use thiserror::Error;

use crate::stores::StoreError;

/// Failure kinds of the session/authorization core.
///
/// Authorization callers must short-circuit on the first error; in
/// particular `PermissionDenied` and `NoMembership` are absolute denials,
/// never advisory.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Missing bearer token")]
    MissingToken,

    #[error("Session not found")]
    SessionNotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account not found")]
    AccountNotFound,

    #[error("Group not found")]
    GroupNotFound,

    #[error("Membership not found")]
    MembershipNotFound,

    #[error("Account identity conflict")]
    AccountConflict,

    #[error("Email already registered")]
    EmailTaken,

    #[error("Account already belongs to a group")]
    MembershipConflict,

    #[error("Permission denied")]
    PermissionDenied,

    #[error("Account has no group membership")]
    NoMembership,

    #[error("Email error: {0}")]
    Email(String),

    #[error("Token verification failed: {0}")]
    TokenVerification(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Store(e) => AppError::DatabaseError(anyhow::anyhow!(e)),
            ServiceError::Internal(e) => AppError::InternalError(e),
            ServiceError::Validation(e) => AppError::BadRequest(anyhow::anyhow!(e)),
            ServiceError::MissingToken => {
                AppError::AuthError(anyhow::anyhow!("Missing bearer token"))
            }
            ServiceError::SessionNotFound => {
                AppError::AuthError(anyhow::anyhow!("Session not found"))
            }
            ServiceError::InvalidCredentials => {
                AppError::AuthError(anyhow::anyhow!("Invalid credentials"))
            }
            ServiceError::TokenVerification(e) => {
                AppError::AuthError(anyhow::anyhow!("Token verification failed: {}", e))
            }
            ServiceError::AccountNotFound => {
                AppError::NotFound(anyhow::anyhow!("Account not found"))
            }
            ServiceError::GroupNotFound => AppError::NotFound(anyhow::anyhow!("Group not found")),
            ServiceError::MembershipNotFound => {
                AppError::NotFound(anyhow::anyhow!("Membership not found"))
            }
            ServiceError::NoMembership => {
                AppError::NotFound(anyhow::anyhow!("Account has no group membership"))
            }
            ServiceError::AccountConflict => {
                AppError::Conflict(anyhow::anyhow!("Account identity conflict"))
            }
            ServiceError::EmailTaken => {
                AppError::Conflict(anyhow::anyhow!("Email already registered"))
            }
            ServiceError::MembershipConflict => {
                AppError::Conflict(anyhow::anyhow!("Account already belongs to a group"))
            }
            ServiceError::PermissionDenied => {
                AppError::Forbidden(anyhow::anyhow!("Permission denied"))
            }
            ServiceError::Email(e) => AppError::EmailError(e),
        }
    }
}
