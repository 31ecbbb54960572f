//! # Registrar Config
//!
//! Configuration types for the Registrar API.
//!
//! Every struct is read from process environment variables at startup
//! (after `dotenvy` has loaded any `.env` file):
//!
//! - [`database`]: Connection string, pool size, drop-on-start flag
//! - [`jwt`]: Token signing secret, algorithm and lifetime
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`server`]: Listen address
//!
//! # Example
//!
//! ```ignore
//! use registrar_config::{CorsConfig, DatabaseConfig, JwtConfig, ServerConfig};
//!
//! let database = DatabaseConfig::from_env()?;
//! let jwt_config = JwtConfig::from_env();
//! let cors_config = CorsConfig::from_env();
//! let server = ServerConfig::from_env();
//! ```

pub mod cors;
pub mod database;
pub mod jwt;
pub mod server;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use jwt::JwtConfig;
pub use server::ServerConfig;

/// Parses a boolean flag the way operators tend to write them.
pub(crate) fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
