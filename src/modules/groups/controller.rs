use axum::{Json, extract::State, http::StatusCode};
use registrar_core::AppError;
use tracing::instrument;

use super::model::{
    AddMemberQuery, BulkDeleteDto, BulkUpdateGroupsDto, CreateGroupDto, DeletedResponse, Group,
    GroupQuery, GroupView, RemoveMemberQuery, StatusResponse, UpdatedResponse,
};
use super::service::GroupService;
use crate::middleware::auth::{RequireManageRecords, RequireReadRecords};
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::{ApiQuery, ValidatedJson};

#[utoipa::path(
    post,
    path = "/api/group",
    request_body = CreateGroupDto,
    responses(
        (status = 201, description = "Group created", body = Group),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Requires records:manage", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Groups",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_group(
    State(state): State<AppState>,
    RequireManageRecords(_auth_user): RequireManageRecords,
    ValidatedJson(dto): ValidatedJson<CreateGroupDto>,
) -> Result<(StatusCode, Json<Group>), AppError> {
    let group = GroupService::create_group(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

/// List groups, or fetch one with `group_id`
#[utoipa::path(
    get,
    path = "/api/group",
    params(GroupQuery),
    responses(
        (status = 200, description = "Groups ordered by id", body = Vec<GroupView>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Requires records:read", body = ErrorResponse)
    ),
    tag = "Groups",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_groups(
    State(state): State<AppState>,
    RequireReadRecords(_auth_user): RequireReadRecords,
    ApiQuery(query): ApiQuery<GroupQuery>,
) -> Result<Json<Vec<GroupView>>, AppError> {
    let groups = GroupService::get_groups(&state.db, query).await?;
    Ok(Json(groups))
}

/// Bulk rename groups
#[utoipa::path(
    put,
    path = "/api/group",
    request_body = BulkUpdateGroupsDto,
    responses(
        (status = 200, description = "Groups updated", body = UpdatedResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Requires records:manage", body = ErrorResponse),
        (status = 404, description = "Some groups do not exist", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Groups",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_groups(
    State(state): State<AppState>,
    RequireManageRecords(_auth_user): RequireManageRecords,
    ValidatedJson(dto): ValidatedJson<BulkUpdateGroupsDto>,
) -> Result<Json<UpdatedResponse>, AppError> {
    let updated = GroupService::update_groups(&state.db, dto).await?;
    Ok(Json(UpdatedResponse::success(updated)))
}

/// Bulk delete groups
///
/// Students of a deleted group are kept and left without a group.
#[utoipa::path(
    delete,
    path = "/api/group",
    request_body = BulkDeleteDto,
    responses(
        (status = 200, description = "Groups deleted", body = DeletedResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Requires records:manage", body = ErrorResponse),
        (status = 404, description = "Some groups do not exist", body = ErrorResponse)
    ),
    tag = "Groups",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn delete_groups(
    State(state): State<AppState>,
    RequireManageRecords(_auth_user): RequireManageRecords,
    ValidatedJson(dto): ValidatedJson<BulkDeleteDto>,
) -> Result<Json<DeletedResponse>, AppError> {
    let deleted = GroupService::delete_groups(&state.db, &dto.ids).await?;
    Ok(Json(DeletedResponse::success(deleted)))
}

/// Put a student into a group
///
/// A student already in another group is moved.
#[utoipa::path(
    post,
    path = "/api/group/add",
    params(AddMemberQuery),
    responses(
        (status = 200, description = "Student added", body = StatusResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Requires records:manage", body = ErrorResponse),
        (status = 404, description = "Student or group not found", body = ErrorResponse),
        (status = 409, description = "Student already in this group", body = ErrorResponse)
    ),
    tag = "Groups",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn add_student(
    State(state): State<AppState>,
    RequireManageRecords(_auth_user): RequireManageRecords,
    ApiQuery(query): ApiQuery<AddMemberQuery>,
) -> Result<Json<StatusResponse>, AppError> {
    GroupService::add_student(&state.db, query.student_id, query.group_id).await?;
    Ok(Json(StatusResponse::success()))
}

/// Take a student out of its group
#[utoipa::path(
    post,
    path = "/api/group/remove",
    params(RemoveMemberQuery),
    responses(
        (status = 200, description = "Student removed", body = StatusResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Requires records:manage", body = ErrorResponse),
        (status = 404, description = "Student not found or not in a group", body = ErrorResponse)
    ),
    tag = "Groups",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn remove_student(
    State(state): State<AppState>,
    RequireManageRecords(_auth_user): RequireManageRecords,
    ApiQuery(query): ApiQuery<RemoveMemberQuery>,
) -> Result<Json<StatusResponse>, AppError> {
    GroupService::remove_student(&state.db, query.student_id).await?;
    Ok(Json(StatusResponse::success()))
}
