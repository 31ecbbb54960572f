//! # Registrar Auth
//!
//! Session tokens for the Registrar API.
//!
//! - [`claims`]: The claim set carried by a session token
//! - [`jwt`]: Token creation and verification
//!
//! A session token is issued by the login endpoint and identifies the user
//! together with the privilege level they held at issuance. It travels in the
//! `Authorization: Bearer` header or in the `access_token` cookie.
//!
//! # Example
//!
//! ```ignore
//! use registrar_auth::{create_access_token, verify_token};
//! use registrar_config::JwtConfig;
//! use registrar_core::Privilege;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(42, "jdoe", Privilege::Teacher, &config)?;
//! let claims = verify_token(&token, &config)?;
//! assert_eq!(claims.login, "jdoe");
//! ```

pub mod claims;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::Claims;
pub use jwt::{ACCESS_TOKEN_COOKIE, create_access_token, verify_token};
