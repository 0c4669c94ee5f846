//! Three-way access decisions.
//!
//! A UI region gated by a permission renders one of three things:
//!
//! ```text
//! Pending   → loading placeholder (session not resolved yet)
//! Denied    → fallback (message or nothing, caller's choice)
//! Granted   → the content
//! ```
//!
//! Keeping `Pending` distinct from `Denied` is what prevents an
//! access-denied flash while the session bootstrap is still in flight.

use crate::{AccessDenied, Permission};
use stockroom_types::Role;

/// Why a resolved session was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// Nobody is signed in.
    Unauthenticated,
    /// The role is not authorized for the permission.
    MissingPermission { permission: Permission, role: Role },
    /// The role is below the required seniority.
    InsufficientRole { required: Role, actual: Role },
    /// No role can satisfy the requirement (empty any-of set, unknown key).
    Unsatisfiable,
}

impl From<DenyReason> for AccessDenied {
    fn from(reason: DenyReason) -> Self {
        match reason {
            DenyReason::Unauthenticated => Self::Unauthenticated,
            DenyReason::MissingPermission { permission, role } => {
                Self::MissingPermission { permission, role }
            }
            DenyReason::InsufficientRole { required, actual } => {
                Self::InsufficientRole { required, actual }
            }
            DenyReason::Unsatisfiable => Self::Unsatisfiable,
        }
    }
}

/// Result of a gated check.
///
/// # Example
///
/// ```
/// use stockroom_auth::{AccessDecision, DenyReason};
///
/// let d = AccessDecision::Pending;
/// assert!(d.is_pending());
/// assert!(d.require().unwrap_err().is_pending());
///
/// let d = AccessDecision::Denied(DenyReason::Unauthenticated);
/// assert!(d.is_denied());
/// assert_eq!(d.status_str(), "denied");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// Session not resolved yet.
    Pending,
    /// Session resolved and the check failed.
    Denied(DenyReason),
    /// Session resolved and the check passed.
    Granted,
}

impl AccessDecision {
    #[must_use]
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }

    #[must_use]
    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Denied(_))
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns the status as a string ("pending", "denied", "granted").
    #[must_use]
    pub fn status_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Denied(_) => "denied",
            Self::Granted => "granted",
        }
    }

    /// Converts to a `Result` for callers that must not proceed unless
    /// granted.
    ///
    /// # Errors
    ///
    /// [`AccessDenied::Pending`] for `Pending`, the matching variant for
    /// `Denied`.
    pub fn require(self) -> Result<(), AccessDenied> {
        match self {
            Self::Granted => Ok(()),
            Self::Pending => Err(AccessDenied::Pending),
            Self::Denied(reason) => Err(reason.into()),
        }
    }
}
