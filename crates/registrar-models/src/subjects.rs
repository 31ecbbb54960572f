//! Subject domain models and DTOs.

use crate::ids::SubjectId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// A subject exams are taken in. Deleting a subject deletes its exams.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateSubjectDto {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct UpdateSubjectDto {
    pub id: SubjectId,
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct BulkUpdateSubjectsDto {
    #[validate(length(min = 1, message = "items must not be empty"), nested)]
    pub items: Vec<UpdateSubjectDto>,
}

#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SubjectQuery {
    #[param(value_type = Option<i64>)]
    pub subject_id: Option<SubjectId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_rename_validation() {
        let empty: BulkUpdateSubjectsDto = serde_json::from_str(r#"{"items": []}"#).unwrap();
        assert!(empty.validate().is_err());

        let ok: BulkUpdateSubjectsDto =
            serde_json::from_str(r#"{"items": [{"id": 7, "name": "Algebra"}]}"#).unwrap();
        assert!(ok.validate().is_ok());
        assert_eq!(serde_json::to_value(&ok.items[0]).unwrap()["name"], "Algebra");
    }
}
