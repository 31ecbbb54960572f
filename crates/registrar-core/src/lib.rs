//! # Registrar Core
//!
//! Core types, errors, and record-keeping rules for the Registrar API.
//!
//! This crate provides the pieces every other crate leans on:
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`password`]: Salted password hashing and verification
//! - [`privilege`]: Privilege levels and the capabilities they unlock
//! - [`reconcile`]: Existing-vs-missing reconciliation for bulk batches
//! - [`cascade`]: Declarative delete behavior between related entities
//! - [`serde`]: Custom serde deserialization helpers
//!
//! # Example
//!
//! ```ignore
//! use registrar_core::{AppError, BatchPlan, Capability, Privilege};
//!
//! // Refuse guests before touching storage
//! registrar_core::privilege::ensure(Privilege::Guest, Capability::ManageRecords)?;
//!
//! // Split a requested batch into targets and missing IDs
//! let plan = BatchPlan::new(&[1, 2, 999], &existing);
//! let targets = plan.into_targets("Users")?;
//! ```

pub mod cascade;
pub mod errors;
pub mod password;
pub mod privilege;
pub mod reconcile;
pub mod serde;

// Re-export commonly used types at crate root
pub use cascade::{DeleteBehavior, EntityKind, Relation};
pub use errors::AppError;
pub use password::{generate_salt, hash_password, verify_password};
pub use privilege::{Capability, Privilege};
pub use reconcile::{BatchPlan, ExistenceLookup, reconcile};
