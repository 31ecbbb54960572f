use registrar_auth::create_access_token;
use registrar_config::JwtConfig;
use registrar_core::{AppError, verify_password};
use registrar_models::users::UserCredentials;
use sqlx::PgPool;
use tracing::{info, instrument, warn};

use super::model::{LoginRequest, TokenResponse};

pub struct AuthService;

impl AuthService {
    /// Checks a login/password pair and issues a session token.
    ///
    /// The token records the privilege the user holds right now; a later
    /// privilege change takes effect on the next login.
    #[instrument(skip(db, dto, jwt_config), fields(login = %dto.login))]
    pub async fn login(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<TokenResponse, AppError> {
        let credentials = sqlx::query_as::<_, UserCredentials>(
            "SELECT id, login, password, salt, privilege FROM users WHERE login = $1",
        )
        .bind(&dto.login)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))?;

        if !verify_password(&dto.password, &credentials.salt, &credentials.password)? {
            warn!(user_id = %credentials.id, "Incorrect password");
            return Err(AppError::unauthorized("Incorrect password"));
        }

        let access_token = create_access_token(
            credentials.id.into_inner(),
            &credentials.login,
            credentials.privilege,
            jwt_config,
        )?;

        info!(user_id = %credentials.id, privilege = %credentials.privilege, "User logged in");

        Ok(TokenResponse::bearer(access_token))
    }
}
