//! Student data models and DTOs.
//!
//! Re-exported from the `registrar-models` crate.

pub use registrar_models::batch::{BulkDeleteDto, DeletedResponse, UpdatedResponse};
pub use registrar_models::students::*;
