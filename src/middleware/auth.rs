use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;

use registrar_auth::{ACCESS_TOKEN_COOKIE, Claims, verify_token};
use registrar_core::{AppError, Capability, Privilege, privilege};
use registrar_models::UserId;

use crate::state::AppState;

/// Extractor that validates the session token and provides its claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn user_id(&self) -> Result<UserId, AppError> {
        self.0.user_id().map(UserId::new)
    }

    /// Privilege recorded when the token was issued.
    pub fn privilege(&self) -> Privilege {
        self.0.privilege
    }

    pub fn require(&self, capability: Capability) -> Result<(), AppError> {
        privilege::ensure(self.0.privilege, capability)
    }
}

/// Picks the token from the `Authorization` header, falling back to the
/// `access_token` cookie.
fn extract_token(headers: &HeaderMap) -> Result<String, AppError> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        let value = value
            .to_str()
            .map_err(|_| AppError::unauthorized("Invalid authorization header format"))?;
        let token = value
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("Invalid authorization header format"))?;
        return Ok(token.trim().to_string());
    }

    CookieJar::from_headers(headers)
        .get(ACCESS_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or_else(|| AppError::unauthorized("Not authenticated"))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers)?;
        let claims = verify_token(&token, &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}

/// Defines an extractor that authenticates the caller and requires a capability.
#[macro_export]
macro_rules! require_capability {
    ($name:ident, $capability:expr) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub $crate::middleware::auth::AuthUser);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = registrar_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let auth_user =
                    $crate::middleware::auth::AuthUser::from_request_parts(parts, state).await?;
                auth_user.require($capability)?;
                Ok($name(auth_user))
            }
        }
    };
}

require_capability!(RequireReadRecords, Capability::ReadRecords);
require_capability!(RequireManageRecords, Capability::ManageRecords);
require_capability!(RequireDeleteUsers, Capability::DeleteUsers);
