//! Group data models and DTOs.
//!
//! Re-exported from the `registrar-models` crate.

pub use registrar_models::batch::{BulkDeleteDto, DeletedResponse, StatusResponse, UpdatedResponse};
pub use registrar_models::groups::*;
