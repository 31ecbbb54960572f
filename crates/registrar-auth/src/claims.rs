use registrar_core::{AppError, Privilege};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Claims embedded in a session token.
///
/// - `sub`: User ID (subject)
/// - `login`: User's login at issuance
/// - `privilege`: Privilege level at issuance (0 guest, 1 teacher, 2 admin)
/// - `exp` / `iat`: Expiry and issued-at Unix timestamps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub login: String,
    #[schema(value_type = i16, minimum = 0, maximum = 2)]
    pub privilege: Privilege,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Result<i64, AppError> {
        self.sub
            .parse()
            .map_err(|_| AppError::unauthorized("Invalid user ID in token"))
    }
}
