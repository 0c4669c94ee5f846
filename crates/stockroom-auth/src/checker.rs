//! Permission checks.
//!
//! Free functions take the principal's role as `Option<Role>`; `None`
//! (nobody signed in) is never granted anything. [`PermissionChecker`]
//! binds the same checks to one known role.
//!
//! These are pure lookups over the static table: no I/O, no allocation
//! except for [`granted_permissions`].
//!
//! # Example
//!
//! ```
//! use stockroom_auth::{has_minimum_role, has_permission, Permission};
//! use stockroom_types::Role;
//!
//! assert!(has_permission(Some(Role::Viewer), Permission::InventoryView));
//! assert!(!has_permission(Some(Role::Viewer), Permission::InventoryDelete));
//! assert!(!has_permission(None, Permission::DashboardView));
//! assert!(has_minimum_role(Some(Role::Admin), Role::Manager));
//! ```

use crate::route::required_permissions;
use crate::table::minimum_role;
use crate::{Permission, UnknownPermission};
use std::collections::BTreeSet;
use stockroom_types::Role;

/// `true` iff `role` is in the authorized set of `permission`.
#[must_use]
pub fn has_permission(role: Option<Role>, permission: Permission) -> bool {
    role.is_some_and(|r| r >= minimum_role(permission))
}

/// String-keyed form of [`has_permission`].
///
/// An unknown key is a programming error: debug builds panic, release
/// builds log at `error` level and deny.
#[must_use]
pub fn has_permission_key(role: Option<Role>, key: &str) -> bool {
    match Permission::from_key(key) {
        Ok(permission) => has_permission(role, permission),
        Err(err) => {
            report_unknown(&err);
            false
        }
    }
}

pub(crate) fn report_unknown(err: &UnknownPermission) {
    tracing::error!(key = %err.key, "permission check against unknown key, denying");
    debug_assert!(false, "{err}");
}

/// `seniority(role) >= seniority(required)`; `None` is never enough.
#[must_use]
pub fn has_minimum_role(role: Option<Role>, required: Role) -> bool {
    role.is_some_and(|r| r.at_least(required))
}

/// `true` iff at least one of `permissions` is granted.
#[must_use]
pub fn has_any_permission(role: Option<Role>, permissions: &[Permission]) -> bool {
    permissions.iter().any(|p| has_permission(role, *p))
}

/// `true` iff every one of `permissions` is granted.
///
/// An empty slice is vacuously granted to a signed-in role, but never to
/// `None`.
#[must_use]
pub fn has_all_permissions(role: Option<Role>, permissions: &[Permission]) -> bool {
    role.is_some() && permissions.iter().all(|p| has_permission(role, *p))
}

/// Every permission granted to `role`.
#[must_use]
pub fn granted_permissions(role: Role) -> BTreeSet<Permission> {
    Permission::ALL
        .iter()
        .copied()
        .filter(|p| has_permission(Some(role), *p))
        .collect()
}

/// The checks of this module bound to one role.
///
/// # Example
///
/// ```
/// use stockroom_auth::{Permission, PermissionChecker};
/// use stockroom_types::Role;
///
/// let checker = PermissionChecker::new(Role::Manager);
/// assert!(checker.has_permission(Permission::MerchantsCreate));
/// assert!(!checker.has_permission(Permission::UsersDelete));
/// assert!(checker.can_access_route("/dashboard/merchants/new"));
/// assert!(!checker.can_access_route("/dashboard/users"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionChecker {
    role: Role,
}

impl PermissionChecker {
    #[must_use]
    pub fn new(role: Role) -> Self {
        Self { role }
    }

    /// Returns a checker for `role`, or `None` when nobody is signed in.
    #[must_use]
    pub fn for_role(role: Option<Role>) -> Option<Self> {
        role.map(Self::new)
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn has_permission(&self, permission: Permission) -> bool {
        has_permission(Some(self.role), permission)
    }

    #[must_use]
    pub fn has_any_permission(&self, permissions: &[Permission]) -> bool {
        has_any_permission(Some(self.role), permissions)
    }

    #[must_use]
    pub fn has_all_permissions(&self, permissions: &[Permission]) -> bool {
        has_all_permissions(Some(self.role), permissions)
    }

    #[must_use]
    pub fn has_minimum_role(&self, required: Role) -> bool {
        self.role.at_least(required)
    }

    #[must_use]
    pub fn granted_permissions(&self) -> BTreeSet<Permission> {
        granted_permissions(self.role)
    }

    /// `true` if the route has no requirements or any of them is granted.
    #[must_use]
    pub fn can_access_route(&self, path: &str) -> bool {
        let required = required_permissions(path);
        required.is_empty() || self.has_any_permission(required)
    }
}
