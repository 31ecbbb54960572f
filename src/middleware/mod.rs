//! Request extractors for authentication and authorization.
//!
//! # Authentication Flow
//!
//! 1. Client sends `Authorization: Bearer <token>` or the `access_token` cookie
//! 2. `AuthUser` verifies the token and exposes its claims
//! 3. Capability extractors check the caller's privilege level
//! 4. Handler executes if all checks pass
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::{AuthUser, RequireManageRecords};
//!
//! // Any valid token
//! async fn me(auth_user: AuthUser) -> impl IntoResponse { /* ... */ }
//!
//! // Teacher or above
//! async fn create_group(RequireManageRecords(auth_user): RequireManageRecords) { /* ... */ }
//! ```

pub mod auth;
