//! # Registrar Models
//!
//! Domain models and DTOs for the Registrar API.
//!
//! - [`ids`]: Strongly-typed ID newtypes
//! - [`auth`]: Login request and token response
//! - [`batch`]: Shapes shared by every bulk endpoint
//! - [`users`]: User accounts
//! - [`students`]: Students, their diploma and exams
//! - [`groups`]: Groups and membership
//! - [`subjects`]: Subjects
//!
//! Entity structs derive `sqlx::FromRow` and are returned as-is from the API;
//! request DTOs derive `validator::Validate` and are checked by the
//! `ValidatedJson` extractor before they reach a service.

pub mod auth;
pub mod batch;
pub mod groups;
pub mod ids;
pub mod students;
pub mod subjects;
pub mod users;

pub use ids::{DiplomaId, ExamId, GroupId, StudentId, SubjectId, UserId};
