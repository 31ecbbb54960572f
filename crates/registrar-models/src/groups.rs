//! Group domain models and DTOs.
//!
//! A group holds any number of students; a student belongs to at most one
//! group. Deleting a group leaves its students in place without a group.

use crate::ids::{GroupId, StudentId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Short student entry listed under a group.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct GroupMember {
    pub id: StudentId,
    pub educational_id: String,
    pub name: String,
    pub surname: String,
    pub lastname: Option<String>,
    #[serde(skip)]
    pub group_id: Option<GroupId>,
}

/// Group read model, optionally carrying its members.
#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct GroupView {
    pub id: GroupId,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub students: Option<Vec<GroupMember>>,
}

impl From<Group> for GroupView {
    fn from(group: Group) -> Self {
        Self {
            id: group.id,
            name: group.name,
            created_at: group.created_at,
            updated_at: group.updated_at,
            students: None,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateGroupDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct UpdateGroupDto {
    pub id: GroupId,
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct BulkUpdateGroupsDto {
    #[validate(length(min = 1, message = "items must not be empty"), nested)]
    pub items: Vec<UpdateGroupDto>,
}

#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GroupQuery {
    #[param(value_type = Option<i64>)]
    pub group_id: Option<GroupId>,
    /// Include each group's students.
    #[serde(default)]
    pub with_students: bool,
}

/// Query for `POST /api/group/add`.
#[derive(Deserialize, Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AddMemberQuery {
    #[param(value_type = i64)]
    pub student_id: StudentId,
    #[param(value_type = i64)]
    pub group_id: GroupId,
}

/// Query for `POST /api/group/remove`.
#[derive(Deserialize, Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RemoveMemberQuery {
    #[param(value_type = i64)]
    pub student_id: StudentId,
}
