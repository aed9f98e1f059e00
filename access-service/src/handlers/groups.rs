use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::dtos::group::{CreateGroupResponse, GroupRequest, GroupResponse};
use crate::dtos::member::MemberResponse;
use crate::middleware::CurrentSession;
use crate::utils::ValidatedJson;
use crate::AppState;
use service_core::error::AppError;

/// Create a group; the caller becomes its first, full-rights member.
#[utoipa::path(
    post,
    path = "/groups",
    request_body = GroupRequest,
    responses(
        (status = 201, description = "Group created with creator membership", body = CreateGroupResponse),
        (status = 401, description = "Not authenticated", body = crate::dtos::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Groups"
)]
#[tracing::instrument(skip(state, session, req))]
pub async fn create_group(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    ValidatedJson(req): ValidatedJson<GroupRequest>,
) -> Result<(StatusCode, Json<CreateGroupResponse>), AppError> {
    let (group, member) = state
        .groups
        .create_group(req.into(), &session.account)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateGroupResponse {
            group: group.into(),
            member: member.into(),
        }),
    ))
}

/// List all groups. The directory is visible to any authenticated caller.
#[utoipa::path(
    get,
    path = "/groups",
    responses(
        (status = 200, description = "All groups", body = [GroupResponse]),
        (status = 401, description = "Not authenticated", body = crate::dtos::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Groups"
)]
#[tracing::instrument(skip(state, _session))]
pub async fn list_groups(
    State(state): State<AppState>,
    CurrentSession(_session): CurrentSession,
) -> Result<Json<Vec<GroupResponse>>, AppError> {
    let groups = state.groups.get_groups().await?;
    Ok(Json(groups.into_iter().map(GroupResponse::from).collect()))
}

/// Fetch one group by id.
#[utoipa::path(
    get,
    path = "/groups/{id}",
    params(("id" = String, Path, description = "Group id")),
    responses(
        (status = 200, description = "The group", body = GroupResponse),
        (status = 404, description = "Unknown group", body = crate::dtos::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Groups"
)]
#[tracing::instrument(skip(state, _session))]
pub async fn get_group(
    State(state): State<AppState>,
    CurrentSession(_session): CurrentSession,
    Path(id): Path<String>,
) -> Result<Json<GroupResponse>, AppError> {
    let group = state.groups.get_group(&id).await?;
    Ok(Json(group.into()))
}

/// Update a group. Requires WRITE on the group.
#[utoipa::path(
    put,
    path = "/groups/{id}",
    params(("id" = String, Path, description = "Group id")),
    request_body = GroupRequest,
    responses(
        (status = 200, description = "Updated group", body = GroupResponse),
        (status = 403, description = "Caller lacks WRITE", body = crate::dtos::ErrorResponse),
        (status = 404, description = "Unknown group", body = crate::dtos::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Groups"
)]
#[tracing::instrument(skip(state, session, req))]
pub async fn update_group(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<GroupRequest>,
) -> Result<Json<GroupResponse>, AppError> {
    let group = state
        .groups
        .update_group(&id, req.into(), &session.account)
        .await?;
    Ok(Json(group.into()))
}

/// Delete a group. Requires DELETE on the group.
#[utoipa::path(
    delete,
    path = "/groups/{id}",
    params(("id" = String, Path, description = "Group id")),
    responses(
        (status = 200, description = "Deleted group", body = GroupResponse),
        (status = 403, description = "Caller lacks DELETE", body = crate::dtos::ErrorResponse),
        (status = 404, description = "Unknown group", body = crate::dtos::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Groups"
)]
#[tracing::instrument(skip(state, session))]
pub async fn delete_group(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> Result<Json<GroupResponse>, AppError> {
    let group = state.groups.delete_group(&id, &session.account).await?;
    Ok(Json(group.into()))
}

/// List a group's members. Requires READ on the group.
#[utoipa::path(
    get,
    path = "/groups/{id}/members",
    params(("id" = String, Path, description = "Group id")),
    responses(
        (status = 200, description = "The group's members", body = [MemberResponse]),
        (status = 403, description = "Caller lacks READ", body = crate::dtos::ErrorResponse),
        (status = 404, description = "Unknown group", body = crate::dtos::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Members"
)]
#[tracing::instrument(skip(state, session))]
pub async fn list_members(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> Result<Json<Vec<MemberResponse>>, AppError> {
    let members = state.members.members_of_group(&id, &session.account).await?;
    Ok(Json(members.into_iter().map(MemberResponse::from).collect()))
}
