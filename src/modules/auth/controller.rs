use axum::Json;
use axum::extract::State;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use registrar_auth::ACCESS_TOKEN_COOKIE;
use registrar_core::AppError;
use tracing::instrument;
use utoipa::ToSchema;

use super::model::{LoginRequest, TokenResponse};
use super::service::AuthService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[derive(ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Present when a bulk request names IDs that do not exist
    pub missing_ids: Option<Vec<i64>>,
}

/// Login and receive a session token
///
/// The token is returned in the body and also set as the `access_token`
/// cookie.
#[utoipa::path(
    post,
    path = "/oauth2/authorize",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Incorrect password", body = ErrorResponse),
        (status = 404, description = "Unknown login", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, jar, dto))]
pub async fn login_user(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, Json<TokenResponse>), AppError> {
    let token = AuthService::login(&state.db, dto, &state.jwt_config).await?;

    let cookie = Cookie::build((ACCESS_TOKEN_COOKIE, token.access_token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    Ok((jar.add(cookie), Json(token)))
}
