use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::dtos::member::{AddMemberRequest, MemberResponse, UpdateMemberRequest};
use crate::middleware::CurrentSession;
use crate::utils::ValidatedJson;
use crate::AppState;
use service_core::error::AppError;

/// Enroll an account into a group. Requires WRITE on the group.
#[utoipa::path(
    post,
    path = "/groups/{id}/members",
    params(("id" = String, Path, description = "Group id")),
    request_body = AddMemberRequest,
    responses(
        (status = 201, description = "Member added", body = MemberResponse),
        (status = 403, description = "Caller lacks WRITE", body = crate::dtos::ErrorResponse),
        (status = 409, description = "Account already belongs to a group", body = crate::dtos::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Members"
)]
#[tracing::instrument(skip(state, session, req))]
pub async fn add_member(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<AddMemberRequest>,
) -> Result<(StatusCode, Json<MemberResponse>), AppError> {
    let member = state
        .members
        .add_member(&id, &req.account, req.rights, &session.account)
        .await?;
    Ok((StatusCode::CREATED, Json(member.into())))
}

/// Replace a member's rights. Requires WRITE on the group.
#[utoipa::path(
    patch,
    path = "/groups/{id}/members/{account_id}",
    params(
        ("id" = String, Path, description = "Group id"),
        ("account_id" = String, Path, description = "Member account id")
    ),
    request_body = UpdateMemberRequest,
    responses(
        (status = 200, description = "Member updated", body = MemberResponse),
        (status = 403, description = "Caller lacks WRITE", body = crate::dtos::ErrorResponse),
        (status = 404, description = "No such membership", body = crate::dtos::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Members"
)]
#[tracing::instrument(skip(state, session, req))]
pub async fn update_member(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path((id, account_id)): Path<(String, String)>,
    ValidatedJson(req): ValidatedJson<UpdateMemberRequest>,
) -> Result<Json<MemberResponse>, AppError> {
    let member = state
        .members
        .update_member(&id, &account_id, req.rights, &session.account)
        .await?;
    Ok(Json(member.into()))
}

/// Remove a member from a group. Requires DELETE on the group.
#[utoipa::path(
    delete,
    path = "/groups/{id}/members/{account_id}",
    params(
        ("id" = String, Path, description = "Group id"),
        ("account_id" = String, Path, description = "Member account id")
    ),
    responses(
        (status = 200, description = "Member removed", body = MemberResponse),
        (status = 403, description = "Caller lacks DELETE", body = crate::dtos::ErrorResponse),
        (status = 404, description = "No such membership", body = crate::dtos::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Members"
)]
#[tracing::instrument(skip(state, session))]
pub async fn remove_member(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path((id, account_id)): Path<(String, String)>,
) -> Result<Json<MemberResponse>, AppError> {
    let member = state
        .members
        .remove_member(&id, &account_id, &session.account)
        .await?;
    Ok(Json(member.into()))
}
