//! Authorization errors.
//!
//! Two distinct failure kinds exist:
//!
//! ```text
//! AccessDenied        ordinary outcome: pending session, not signed in,
//!                     missing permission, role too junior
//! UnknownPermission   configuration defect: a key that is not in the table
//! ```
//!
//! Permission checks themselves never return these as `Err`; the boolean
//! and [`AccessDecision`](crate::AccessDecision) APIs report outcomes as
//! values. `AccessDenied` appears once a caller converts a decision into
//! a `Result` with [`AccessDecision::require`](crate::AccessDecision::require).

use crate::Permission;
use stockroom_types::{ErrorCode, Role};
use thiserror::Error;

/// Access was not granted.
///
/// # Example
///
/// ```
/// use stockroom_auth::{AccessDenied, Permission};
/// use stockroom_types::Role;
///
/// let err = AccessDenied::MissingPermission {
///     permission: Permission::UsersDelete,
///     role: Role::Manager,
/// };
/// assert!(err.to_string().contains("users.delete"));
/// assert!(!err.is_pending());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessDenied {
    /// The session has not been resolved yet.
    #[error("access pending: session not resolved yet")]
    Pending,

    /// No principal is signed in.
    #[error("access denied: not signed in")]
    Unauthenticated,

    /// The principal's role is not authorized for the permission.
    #[error("access denied: '{permission}' is not granted to {role}")]
    MissingPermission {
        /// The permission that was checked.
        permission: Permission,
        /// The principal's role.
        role: Role,
    },

    /// The principal's role is below the required seniority.
    #[error("access denied: requires {required} or above, signed in as {actual}")]
    InsufficientRole {
        /// Minimum role for the action.
        required: Role,
        /// The principal's role.
        actual: Role,
    },

    /// The requirement names nothing any role holds.
    #[error("access denied: requirement cannot be satisfied by any role")]
    Unsatisfiable,
}

impl AccessDenied {
    /// Returns `true` for [`AccessDenied::Pending`].
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl ErrorCode for AccessDenied {
    fn code(&self) -> &'static str {
        match self {
            Self::Pending => "AUTH_PENDING",
            Self::Unauthenticated => "AUTH_UNAUTHENTICATED",
            Self::MissingPermission { .. } => "AUTH_MISSING_PERMISSION",
            Self::InsufficientRole { .. } => "AUTH_INSUFFICIENT_ROLE",
            Self::Unsatisfiable => "AUTH_UNSATISFIABLE",
        }
    }

    fn is_recoverable(&self) -> bool {
        // Waiting or signing in can fix these.
        matches!(self, Self::Pending | Self::Unauthenticated)
    }
}

/// A permission key that is not in the static table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown permission key '{key}'")]
pub struct UnknownPermission {
    /// The key as given by the caller.
    pub key: String,
}

impl UnknownPermission {
    /// Creates the error for `key`.
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl ErrorCode for UnknownPermission {
    fn code(&self) -> &'static str {
        "AUTH_UNKNOWN_PERMISSION"
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}
