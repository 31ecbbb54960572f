//! Strongly-typed ID newtypes for domain entities.
//!
//! Every table uses a `BIGSERIAL` key. Wrapping it per entity prevents passing
//! a `GroupId` where a `StudentId` is expected, while staying a plain integer
//! on the wire and in the database.
//!
//! # Example
//!
//! ```ignore
//! use registrar_models::ids::{GroupId, StudentId};
//!
//! fn attach(student: StudentId, group: GroupId) { /* ... */ }
//!
//! attach(StudentId::new(5), GroupId::new(1));     // OK
//! // attach(GroupId::new(1), StudentId::new(5));  // Compile error
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Macro to define a strongly-typed ID newtype over `i64`.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
        )]
        #[serde(transparent)]
        #[sqlx(transparent)]
        #[schema(value_type = i64)]
        pub struct $name(pub i64);

        impl $name {
            #[inline]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            #[inline]
            pub const fn into_inner(self) -> i64 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            #[inline]
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i64 {
            #[inline]
            fn from(id: $name) -> i64 {
                id.0
            }
        }
    };
}

define_id!(
    /// Primary key of `users`.
    UserId
);

define_id!(
    /// Primary key of `students`.
    StudentId
);

define_id!(
    /// Primary key of `groups`.
    GroupId
);

define_id!(
    /// Primary key of `subjects`.
    SubjectId
);

define_id!(
    /// Primary key of `diplomas`.
    DiplomaId
);

define_id!(
    /// Primary key of `exams`.
    ExamId
);

/// Unwraps a slice of typed IDs for array binds (`WHERE id = ANY($1)`).
pub fn raw_ids<I>(ids: &[I]) -> Vec<i64>
where
    I: Copy + Into<i64>,
{
    ids.iter().map(|id| (*id).into()).collect()
}
