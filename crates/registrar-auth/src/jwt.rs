//! Session token creation and verification.
//!
//! Tokens are HMAC-signed with the secret and algorithm from [`JwtConfig`].
//! Verification checks the signature, the algorithm and the `exp` claim.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use registrar_config::JwtConfig;
use registrar_core::{AppError, Privilege};

use crate::claims::Claims;

/// Name of the cookie the login endpoint sets.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Creates a session token for `user_id`.
///
/// # Errors
///
/// Returns an internal error if encoding fails.
pub fn create_access_token(
    user_id: i64,
    login: &str,
    privilege: Privilege,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;
    let exp = now + jwt_config.token_expiry as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        login: login.to_string(),
        privilege,
        exp,
        iat: now,
    };

    encode(
        &Header::new(jwt_config.algorithm),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal_error(format!("Failed to create token: {}", e)))
}

/// Verifies a session token and returns its claims.
///
/// # Errors
///
/// Returns 401 if the signature is invalid, the token has expired, or the
/// token is malformed.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::new(jwt_config.algorithm),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Could not validate credentials"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::Algorithm;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test_secret_key_for_testing_purposes".to_string(),
            algorithm: Algorithm::HS256,
            token_expiry: 3600,
        }
    }

    #[test]
    fn test_round_trip() {
        let token = create_access_token(5, "jdoe", Privilege::Teacher, &config()).unwrap();
        let claims = verify_token(&token, &config()).unwrap();

        assert_eq!(claims.user_id().unwrap(), 5);
        assert_eq!(claims.login, "jdoe");
        assert_eq!(claims.privilege, Privilege::Teacher);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = create_access_token(5, "jdoe", Privilege::Admin, &config()).unwrap();
        let other = JwtConfig {
            secret: "another_secret".to_string(),
            ..config()
        };
        assert!(verify_token(&token, &other).is_err());
    }

    #[test]
    fn test_algorithm_mismatch_rejected() {
        let token = create_access_token(5, "jdoe", Privilege::Admin, &config()).unwrap();
        let other = JwtConfig {
            algorithm: Algorithm::HS512,
            ..config()
        };
        assert!(verify_token(&token, &other).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: "5".to_string(),
            login: "jdoe".to_string(),
            privilege: Privilege::Guest,
            exp: now - 3600,
            iat: now - 7200,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config().secret.as_bytes()),
        )
        .unwrap();

        assert!(verify_token(&token, &config()).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        let err = verify_token("not.a.token", &config()).unwrap_err();
        assert_eq!(err.status.as_u16(), 401);
    }
}
