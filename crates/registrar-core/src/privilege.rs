//! Privilege levels and capability checks.
//!
//! Privileges form a total order (`Guest < Teacher < Admin`) and every
//! authorization decision is a threshold comparison against the level a
//! [`Capability`] requires. Call sites ask for a capability by name instead
//! of comparing raw integers.
//!
//! # Example
//!
//! ```ignore
//! use registrar_core::privilege::{Capability, Privilege, ensure};
//!
//! ensure(Privilege::Teacher, Capability::ManageRecords)?; // ok
//! ensure(Privilege::Teacher, Capability::DeleteUsers)?;   // 403
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Privilege level stored on every user and embedded in session tokens.
///
/// Serialized as its integer rank (`0`, `1`, `2`) both in JSON and in the
/// `users.privilege` SMALLINT column.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, sqlx::Type,
)]
#[serde(try_from = "i16", into = "i16")]
#[repr(i16)]
pub enum Privilege {
    #[default]
    Guest = 0,
    Teacher = 1,
    Admin = 2,
}

impl Privilege {
    pub const fn rank(self) -> i16 {
        self as i16
    }

    pub fn allows(self, capability: Capability) -> bool {
        self >= capability.required_privilege()
    }
}

impl TryFrom<i16> for Privilege {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Privilege::Guest),
            1 => Ok(Privilege::Teacher),
            2 => Ok(Privilege::Admin),
            other => Err(format!("invalid privilege level {}, expected 0, 1 or 2", other)),
        }
    }
}

impl From<Privilege> for i16 {
    fn from(privilege: Privilege) -> i16 {
        privilege.rank()
    }
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Privilege::Guest => "guest",
            Privilege::Teacher => "teacher",
            Privilege::Admin => "admin",
        };
        f.write_str(name)
    }
}

/// Something a caller may be allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Read students, groups and subjects.
    ReadRecords,
    /// Create, update and delete students, groups and subjects.
    ManageRecords,
    /// Modify a user record that is not the caller's own.
    EditOtherUsers,
    /// Change any user's privilege level.
    ChangePrivilege,
    /// Delete user accounts.
    DeleteUsers,
}

impl Capability {
    pub const fn required_privilege(self) -> Privilege {
        match self {
            Capability::ReadRecords | Capability::ManageRecords => Privilege::Teacher,
            Capability::EditOtherUsers | Capability::ChangePrivilege | Capability::DeleteUsers => {
                Privilege::Admin
            }
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Capability::ReadRecords => "records:read",
            Capability::ManageRecords => "records:manage",
            Capability::EditOtherUsers => "users:edit_others",
            Capability::ChangePrivilege => "users:change_privilege",
            Capability::DeleteUsers => "users:delete",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fails with 403 unless `privilege` unlocks `capability`.
pub fn ensure(privilege: Privilege, capability: Capability) -> Result<(), AppError> {
    if privilege.allows(capability) {
        return Ok(());
    }

    Err(AppError::forbidden(format!(
        "Access denied. Missing required capability: {} (requires {})",
        capability,
        capability.required_privilege()
    )))
}

/// Owners may always act on their own record; everyone else needs `capability`.
pub fn ensure_owner_or<Id: PartialEq>(
    actor: &Id,
    target: &Id,
    privilege: Privilege,
    capability: Capability,
) -> Result<(), AppError> {
    if actor == target {
        return Ok(());
    }
    ensure(privilege, capability)
}
