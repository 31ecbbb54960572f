//! Student domain models and DTOs.
//!
//! A student optionally belongs to one group, owns at most one diploma and
//! any number of exams. Deleting a student deletes its diploma and exams.

use crate::ids::{DiplomaId, ExamId, GroupId, StudentId, SubjectId};
use registrar_core::serde::{deserialize_nullable, deserialize_optional_trimmed};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Raw student row.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Student {
    pub id: StudentId,
    pub educational_id: String,
    pub name: String,
    pub surname: String,
    pub lastname: Option<String>,
    pub phone: Option<String>,
    pub entrance: bool,
    pub group_id: Option<GroupId>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Student read model.
///
/// Shows the group's name, the diploma title and the number of exams instead
/// of raw foreign keys.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct StudentInfo {
    pub id: StudentId,
    pub educational_id: String,
    pub name: String,
    pub surname: String,
    pub lastname: Option<String>,
    pub phone: Option<String>,
    pub entrance: bool,
    /// Name of the student's group
    pub group: Option<String>,
    /// Title of the student's diploma
    pub diploma: Option<String>,
    /// Number of exams taken
    pub exams: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateStudentDto {
    #[validate(length(min = 1, max = 32))]
    pub educational_id: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub surname: String,
    #[validate(length(max = 100))]
    pub lastname: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    #[serde(default)]
    pub entrance: bool,
    pub group_id: Option<GroupId>,
}

/// One item of a bulk student update.
///
/// `group_id` distinguishes absent (unchanged) from `null` (leave the group).
#[derive(Serialize, Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct UpdateStudentDto {
    pub id: StudentId,
    #[validate(length(min = 1, max = 32))]
    pub educational_id: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub surname: Option<String>,
    #[validate(length(max = 100))]
    pub lastname: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    pub entrance: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<i64>)]
    pub group_id: Option<Option<GroupId>>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct BulkUpdateStudentsDto {
    #[validate(length(min = 1, message = "items must not be empty"), nested)]
    pub items: Vec<UpdateStudentDto>,
}

#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StudentQuery {
    #[param(value_type = Option<i64>)]
    pub student_id: Option<StudentId>,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Diploma {
    pub id: DiplomaId,
    pub student_id: StudentId,
    pub assignment: Option<String>,
    pub title: Option<String>,
    pub chapters: i32,
    pub originality: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Creates the student's diploma or updates the existing one.
#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct UpsertDiplomaDto {
    #[validate(length(max = 255))]
    pub assignment: Option<String>,
    #[validate(length(max = 1000))]
    pub title: Option<String>,
    #[validate(range(min = 0))]
    pub chapters: Option<i32>,
    #[validate(range(min = 0, max = 100))]
    pub originality: Option<i32>,
}

/// An exam together with its subject's name.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Exam {
    pub id: ExamId,
    pub student_id: StudentId,
    pub subject_id: SubjectId,
    pub subject: String,
    pub semester: i16,
    pub year: i32,
    pub score: i16,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateExamDto {
    pub subject_id: SubjectId,
    #[validate(range(min = 1, max = 12))]
    pub semester: i16,
    /// Defaults to the current year
    #[validate(range(min = 1900, max = 2100))]
    pub year: Option<i32>,
    #[validate(range(min = 0, max = 100))]
    pub score: i16,
}
