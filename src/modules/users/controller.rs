use axum::{Json, extract::State, http::StatusCode};
use registrar_core::AppError;
use tracing::instrument;

use super::model::{
    BulkDeleteDto, BulkUpdateUsersDto, CreateUserDto, DeletedResponse, UpdatedResponse, User,
    UserQuery,
};
use super::service::{Actor, UserService};
use crate::middleware::auth::{AuthUser, RequireDeleteUsers};
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::{ApiQuery, ValidatedJson};

/// Register a new account
///
/// Open to everyone. New accounts are always guests (privilege 0).
#[utoipa::path(
    post,
    path = "/api/user",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User registered", body = User),
        (status = 409, description = "Login already taken", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Users"
)]
#[instrument(skip(state, dto))]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateUserDto>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = UserService::create_user(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// List users, or fetch one with `user_id`
#[utoipa::path(
    get,
    path = "/api/user",
    params(UserQuery),
    responses(
        (status = 200, description = "Users ordered by id", body = Vec<User>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_users(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ApiQuery(query): ApiQuery<UserQuery>,
) -> Result<Json<Vec<User>>, AppError> {
    let users = UserService::get_users(&state.db, query.user_id).await?;
    Ok(Json(users))
}

/// The account behind the current session
#[utoipa::path(
    get,
    path = "/api/user/me",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<User>, AppError> {
    let user_id = auth_user.user_id()?;
    let user = UserService::get_user(&state.db, user_id)
        .await
        .map_err(|e| {
            if e.status == StatusCode::NOT_FOUND {
                AppError::unauthorized("User no longer exists")
            } else {
                e
            }
        })?;
    Ok(Json(user))
}

/// Bulk update users
///
/// All items are applied or none are. Editing another user's record or
/// changing any privilege requires an admin.
#[utoipa::path(
    put,
    path = "/api/user",
    request_body = BulkUpdateUsersDto,
    responses(
        (status = 200, description = "Users updated", body = UpdatedResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Missing capability", body = ErrorResponse),
        (status = 404, description = "Some users do not exist", body = ErrorResponse),
        (status = 409, description = "Login already taken", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_users(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<BulkUpdateUsersDto>,
) -> Result<Json<UpdatedResponse>, AppError> {
    let actor = Actor {
        id: auth_user.user_id()?,
        privilege: auth_user.privilege(),
    };
    let updated = UserService::update_users(&state.db, actor, dto).await?;
    Ok(Json(UpdatedResponse::success(updated)))
}

/// Bulk delete users (admin)
#[utoipa::path(
    delete,
    path = "/api/user",
    request_body = BulkDeleteDto,
    responses(
        (status = 200, description = "Users deleted", body = DeletedResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Requires users:delete", body = ErrorResponse),
        (status = 404, description = "Some users do not exist", body = ErrorResponse)
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn delete_users(
    State(state): State<AppState>,
    RequireDeleteUsers(_auth_user): RequireDeleteUsers,
    ValidatedJson(dto): ValidatedJson<BulkDeleteDto>,
) -> Result<Json<DeletedResponse>, AppError> {
    let deleted = UserService::delete_users(&state.db, &dto.ids).await?;
    Ok(Json(DeletedResponse::success(deleted)))
}
