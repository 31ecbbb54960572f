//! Request and response shapes shared by the bulk endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Body of every bulk `DELETE`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BulkDeleteDto {
    #[validate(length(min = 1, message = "ids must not be empty"))]
    pub ids: Vec<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdatedResponse {
    pub status: String,
    pub updated: u64,
}

impl UpdatedResponse {
    pub fn success(updated: u64) -> Self {
        Self {
            status: "success".to_string(),
            updated,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeletedResponse {
    pub status: String,
    pub deleted: u64,
}

impl DeletedResponse {
    pub fn success(deleted: u64) -> Self {
        Self {
            status: "success".to_string(),
            deleted,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn success() -> Self {
        Self {
            status: "success".to_string(),
        }
    }
}
