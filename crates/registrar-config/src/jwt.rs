//! Session token settings.
//!
//! # Environment Variables
//!
//! - `JWT_SECRET`: HMAC signing secret
//! - `JWT_ALGORITHM`: `HS256`, `HS384` or `HS512` (default: `HS256`)
//! - `JWT_EXPIRY`: token lifetime in seconds (default: 30 days)

use std::env;
use std::str::FromStr;

use jsonwebtoken::Algorithm;

pub const DEFAULT_TOKEN_EXPIRY: i64 = 30 * 24 * 60 * 60;

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    pub algorithm: Algorithm,
    pub token_expiry: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Self {
        let algorithm = get("JWT_ALGORITHM")
            .map(|raw| parse_algorithm(&raw))
            .unwrap_or(Algorithm::HS256);

        Self {
            secret: get("JWT_SECRET")
                .unwrap_or_else(|| "your-secret-key-change-in-production".to_string()),
            algorithm,
            token_expiry: get("JWT_EXPIRY")
                .and_then(|s| s.parse().ok())
                .filter(|secs: &i64| *secs > 0)
                .unwrap_or(DEFAULT_TOKEN_EXPIRY),
        }
    }
}

/// Only the shared-secret HMAC family fits a single `JWT_SECRET`.
fn parse_algorithm(raw: &str) -> Algorithm {
    match Algorithm::from_str(raw.trim()) {
        Ok(alg @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)) => alg,
        _ => {
            tracing::warn!(algorithm = %raw, "Unsupported JWT_ALGORITHM, falling back to HS256");
            Algorithm::HS256
        }
    }
}
