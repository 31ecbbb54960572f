pub use registrar_models::batch::{BulkDeleteDto, DeletedResponse, UpdatedResponse};
pub use registrar_models::subjects::*;
