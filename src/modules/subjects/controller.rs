use axum::{Json, extract::State, http::StatusCode};
use registrar_core::AppError;
use tracing::instrument;

use super::model::{
    BulkDeleteDto, BulkUpdateSubjectsDto, CreateSubjectDto, DeletedResponse, Subject,
    SubjectQuery, UpdatedResponse,
};
use super::service::SubjectService;
use crate::middleware::auth::{RequireManageRecords, RequireReadRecords};
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::{ApiQuery, ValidatedJson};

#[utoipa::path(
    post,
    path = "/api/subject",
    request_body = CreateSubjectDto,
    responses(
        (status = 201, description = "Subject created", body = Subject),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Requires records:manage", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Subjects",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_subject(
    State(state): State<AppState>,
    RequireManageRecords(_auth_user): RequireManageRecords,
    ValidatedJson(dto): ValidatedJson<CreateSubjectDto>,
) -> Result<(StatusCode, Json<Subject>), AppError> {
    let subject = SubjectService::create_subject(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(subject)))
}

#[utoipa::path(
    get,
    path = "/api/subject",
    params(SubjectQuery),
    responses(
        (status = 200, description = "Subjects ordered by id", body = Vec<Subject>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Requires records:read", body = ErrorResponse)
    ),
    tag = "Subjects",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_subjects(
    State(state): State<AppState>,
    RequireReadRecords(_auth_user): RequireReadRecords,
    ApiQuery(query): ApiQuery<SubjectQuery>,
) -> Result<Json<Vec<Subject>>, AppError> {
    let subjects = SubjectService::get_subjects(&state.db, query.subject_id).await?;
    Ok(Json(subjects))
}

#[utoipa::path(
    put,
    path = "/api/subject",
    request_body = BulkUpdateSubjectsDto,
    responses(
        (status = 200, description = "Subjects updated", body = UpdatedResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Requires records:manage", body = ErrorResponse),
        (status = 404, description = "Some subjects do not exist", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Subjects",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_subjects(
    State(state): State<AppState>,
    RequireManageRecords(_auth_user): RequireManageRecords,
    ValidatedJson(dto): ValidatedJson<BulkUpdateSubjectsDto>,
) -> Result<Json<UpdatedResponse>, AppError> {
    let updated = SubjectService::update_subjects(&state.db, dto).await?;
    Ok(Json(UpdatedResponse::success(updated)))
}

/// Bulk delete subjects and their exams
#[utoipa::path(
    delete,
    path = "/api/subject",
    request_body = BulkDeleteDto,
    responses(
        (status = 200, description = "Subjects deleted", body = DeletedResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Requires records:manage", body = ErrorResponse),
        (status = 404, description = "Some subjects do not exist", body = ErrorResponse)
    ),
    tag = "Subjects",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn delete_subjects(
    State(state): State<AppState>,
    RequireManageRecords(_auth_user): RequireManageRecords,
    ValidatedJson(dto): ValidatedJson<BulkDeleteDto>,
) -> Result<Json<DeletedResponse>, AppError> {
    let deleted = SubjectService::delete_subjects(&state.db, &dto.ids).await?;
    Ok(Json(DeletedResponse::success(deleted)))
}
