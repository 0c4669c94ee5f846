//! Staff roles.
//!
//! [`Role`] is the single declaration of the role hierarchy. Every
//! consumer (permission table, route guard, navigation filter, CLI)
//! compares roles through [`Role::level`] or `Ord`; nothing else
//! re-declares an ordering table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Staff role, totally ordered by seniority.
///
/// | Role | Level |
/// |------|-------|
/// | `Viewer` | 1 |
/// | `Manager` | 2 |
/// | `Admin` | 3 |
///
/// The derived `Ord` follows declaration order, which matches the level.
///
/// # Example
///
/// ```
/// use stockroom_types::Role;
///
/// assert!(Role::Admin > Role::Manager);
/// assert_eq!(Role::Viewer.level(), 1);
/// assert_eq!("manager".parse::<Role>().unwrap(), Role::Manager);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Read-only staff.
    Viewer,
    /// Inventory, merchant and report operators.
    Manager,
    /// Full access including user management.
    Admin,
}

impl Role {
    /// All roles, most junior first.
    pub const ALL: [Role; 3] = [Role::Viewer, Role::Manager, Role::Admin];

    /// Seniority level (`Viewer=1`, `Manager=2`, `Admin=3`).
    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Self::Viewer => 1,
            Self::Manager => 2,
            Self::Admin => 3,
        }
    }

    /// Returns `true` if this role is `required` or senior to it.
    #[must_use]
    pub const fn at_least(self, required: Role) -> bool {
        self.level() >= required.level()
    }

    /// Canonical name as sent by the API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Viewer => "Viewer",
            Self::Manager => "Manager",
            Self::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Error returned when parsing an unrecognised role name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role '{0}' (expected Viewer, Manager or Admin)")]
pub struct ParseRoleError(pub String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "viewer" => Ok(Self::Viewer),
            "manager" => Ok(Self::Manager),
            "admin" => Ok(Self::Admin),
            _ => Err(ParseRoleError(s.to_string())),
        }
    }
}
