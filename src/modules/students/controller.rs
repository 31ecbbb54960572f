use axum::{Json, extract::State, http::StatusCode};
use registrar_core::AppError;
use registrar_models::StudentId;
use tracing::instrument;

use super::model::{
    BulkDeleteDto, BulkUpdateStudentsDto, CreateExamDto, CreateStudentDto, DeletedResponse,
    Diploma, Exam, Student, StudentInfo, StudentQuery, UpdatedResponse, UpsertDiplomaDto,
};
use super::service::StudentService;
use crate::middleware::auth::{RequireManageRecords, RequireReadRecords};
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::{ApiPath, ApiQuery, ValidatedJson};

#[utoipa::path(
    post,
    path = "/api/student",
    request_body = CreateStudentDto,
    responses(
        (status = 201, description = "Student created", body = Student),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Requires records:manage", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse),
        (status = 409, description = "Educational id already used", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_student(
    State(state): State<AppState>,
    RequireManageRecords(_auth_user): RequireManageRecords,
    ValidatedJson(dto): ValidatedJson<CreateStudentDto>,
) -> Result<(StatusCode, Json<Student>), AppError> {
    let student = StudentService::create_student(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

/// List students, or fetch one with `student_id`
#[utoipa::path(
    get,
    path = "/api/student",
    params(StudentQuery),
    responses(
        (status = 200, description = "Students with group, diploma and exam summary", body = Vec<StudentInfo>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Requires records:read", body = ErrorResponse)
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_students(
    State(state): State<AppState>,
    RequireReadRecords(_auth_user): RequireReadRecords,
    ApiQuery(query): ApiQuery<StudentQuery>,
) -> Result<Json<Vec<StudentInfo>>, AppError> {
    let students = StudentService::get_students(&state.db, query.student_id).await?;
    Ok(Json(students))
}

#[utoipa::path(
    put,
    path = "/api/student",
    request_body = BulkUpdateStudentsDto,
    responses(
        (status = 200, description = "Students updated", body = UpdatedResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Requires records:manage", body = ErrorResponse),
        (status = 404, description = "Some students or groups do not exist", body = ErrorResponse),
        (status = 409, description = "Educational id already used", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_students(
    State(state): State<AppState>,
    RequireManageRecords(_auth_user): RequireManageRecords,
    ValidatedJson(dto): ValidatedJson<BulkUpdateStudentsDto>,
) -> Result<Json<UpdatedResponse>, AppError> {
    let updated = StudentService::update_students(&state.db, dto).await?;
    Ok(Json(UpdatedResponse::success(updated)))
}

/// Bulk delete students together with their diplomas and exams
#[utoipa::path(
    delete,
    path = "/api/student",
    request_body = BulkDeleteDto,
    responses(
        (status = 200, description = "Students deleted", body = DeletedResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Requires records:manage", body = ErrorResponse),
        (status = 404, description = "Some students do not exist", body = ErrorResponse)
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn delete_students(
    State(state): State<AppState>,
    RequireManageRecords(_auth_user): RequireManageRecords,
    ValidatedJson(dto): ValidatedJson<BulkDeleteDto>,
) -> Result<Json<DeletedResponse>, AppError> {
    let deleted = StudentService::delete_students(&state.db, &dto.ids).await?;
    Ok(Json(DeletedResponse::success(deleted)))
}

/// Create or replace a student's diploma
#[utoipa::path(
    put,
    path = "/api/student/{id}/diploma",
    params(
        ("id" = i64, Path, description = "Student ID")
    ),
    request_body = UpsertDiplomaDto,
    responses(
        (status = 200, description = "Diploma saved", body = Diploma),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Requires records:manage", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn put_diploma(
    State(state): State<AppState>,
    RequireManageRecords(_auth_user): RequireManageRecords,
    ApiPath(id): ApiPath<StudentId>,
    ValidatedJson(dto): ValidatedJson<UpsertDiplomaDto>,
) -> Result<Json<Diploma>, AppError> {
    let diploma = StudentService::put_diploma(&state.db, id, dto).await?;
    Ok(Json(diploma))
}

#[utoipa::path(
    get,
    path = "/api/student/{id}/diploma",
    params(
        ("id" = i64, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "The student's diploma", body = Diploma),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Requires records:read", body = ErrorResponse),
        (status = 404, description = "Student or diploma not found", body = ErrorResponse)
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_diploma(
    State(state): State<AppState>,
    RequireReadRecords(_auth_user): RequireReadRecords,
    ApiPath(id): ApiPath<StudentId>,
) -> Result<Json<Diploma>, AppError> {
    let diploma = StudentService::get_diploma(&state.db, id).await?;
    Ok(Json(diploma))
}

#[utoipa::path(
    post,
    path = "/api/student/{id}/exams",
    params(
        ("id" = i64, Path, description = "Student ID")
    ),
    request_body = CreateExamDto,
    responses(
        (status = 201, description = "Exam recorded", body = Exam),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Requires records:manage", body = ErrorResponse),
        (status = 404, description = "Student or subject not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn add_exam(
    State(state): State<AppState>,
    RequireManageRecords(_auth_user): RequireManageRecords,
    ApiPath(id): ApiPath<StudentId>,
    ValidatedJson(dto): ValidatedJson<CreateExamDto>,
) -> Result<(StatusCode, Json<Exam>), AppError> {
    let exam = StudentService::add_exam(&state.db, id, dto).await?;
    Ok((StatusCode::CREATED, Json(exam)))
}

#[utoipa::path(
    get,
    path = "/api/student/{id}/exams",
    params(
        ("id" = i64, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "The student's exams", body = Vec<Exam>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Requires records:read", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_exams(
    State(state): State<AppState>,
    RequireReadRecords(_auth_user): RequireReadRecords,
    ApiPath(id): ApiPath<StudentId>,
) -> Result<Json<Vec<Exam>>, AppError> {
    let exams = StudentService::list_exams(&state.db, id).await?;
    Ok(Json(exams))
}
