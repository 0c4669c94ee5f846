//! Session status and status-aware authorization.
//!
//! # State Machine
//!
//! ```text
//!              bootstrap / login
//! Unresolved ───────────────────────► Resolved(Some(principal))
//!     │                                   │        ▲
//!     │ no credentials / invalid token    │ logout │ login
//!     ▼                                   ▼        │
//! Resolved(None) ◄────────────────────────┘────────┘
//! ```
//!
//! While `Unresolved`, every [`Authorizer`] check answers
//! [`AccessDecision::Pending`]; nothing is granted or denied until the
//! session bootstrap finishes.

use crate::checker::{self, report_unknown};
use crate::navigation::{filter_navigation_items, NavItem};
use crate::{AccessDecision, DenyReason, Permission};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use stockroom_types::{Role, User};

/// The signed-in staff member, reduced to what authorization needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

impl Principal {
    pub fn new(id: i64, username: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            username: username.into(),
            role,
        }
    }
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self::new(user.id, user.username.clone(), user.role())
    }
}

/// Authentication status of the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthStatus {
    /// Bootstrap has not finished.
    #[default]
    Unresolved,
    /// Bootstrap finished; `None` means nobody is signed in.
    Resolved(Option<Principal>),
}

impl AuthStatus {
    /// `Resolved(None)`.
    #[must_use]
    pub fn signed_out() -> Self {
        Self::Resolved(None)
    }

    /// `Resolved(Some(principal))`.
    #[must_use]
    pub fn signed_in(principal: Principal) -> Self {
        Self::Resolved(Some(principal))
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Resolved(Some(_)))
    }

    #[must_use]
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Self::Resolved(Some(p)) => Some(p),
            _ => None,
        }
    }

    /// Role of the principal; `None` while unresolved or signed out.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.principal().map(|p| p.role)
    }
}

/// Evaluates checks against one [`AuthStatus`] snapshot.
///
/// # Example
///
/// ```
/// use stockroom_auth::{AuthStatus, Authorizer, Permission, Principal};
/// use stockroom_types::Role;
///
/// let pending = Authorizer::new(AuthStatus::Unresolved);
/// assert!(pending.permission(Permission::DashboardView).is_pending());
///
/// let viewer = Authorizer::new(AuthStatus::signed_in(Principal::new(1, "amy", Role::Viewer)));
/// assert!(viewer.permission(Permission::InventoryView).is_granted());
/// assert!(viewer.permission(Permission::InventoryDelete).is_denied());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Authorizer {
    status: AuthStatus,
}

impl Authorizer {
    #[must_use]
    pub fn new(status: AuthStatus) -> Self {
        Self { status }
    }

    #[must_use]
    pub fn status(&self) -> &AuthStatus {
        &self.status
    }

    /// Resolves the principal's role, or the decision to return instead.
    fn role(&self) -> Result<(Role, &str), AccessDecision> {
        match &self.status {
            AuthStatus::Unresolved => Err(AccessDecision::Pending),
            AuthStatus::Resolved(None) => {
                Err(AccessDecision::Denied(DenyReason::Unauthenticated))
            }
            AuthStatus::Resolved(Some(p)) => Ok((p.role, p.username.as_str())),
        }
    }

    /// Decision for a single permission.
    #[must_use]
    pub fn permission(&self, permission: Permission) -> AccessDecision {
        let (role, principal) = match self.role() {
            Ok(r) => r,
            Err(decision) => return decision,
        };

        if checker::has_permission(Some(role), permission) {
            tracing::debug!(principal, %role, %permission, "permission granted");
            AccessDecision::Granted
        } else {
            tracing::debug!(principal, %role, %permission, "permission denied");
            AccessDecision::Denied(DenyReason::MissingPermission { permission, role })
        }
    }

    /// String-keyed form of [`Authorizer::permission`].
    ///
    /// An unknown key panics in debug builds. Release builds log it and
    /// deny once the session is resolved; an unresolved session still
    /// answers `Pending`.
    #[must_use]
    pub fn permission_key(&self, key: &str) -> AccessDecision {
        match Permission::from_key(key) {
            Ok(permission) => self.permission(permission),
            Err(err) => {
                report_unknown(&err);
                match self.role() {
                    Err(decision) => decision,
                    Ok(_) => AccessDecision::Denied(DenyReason::Unsatisfiable),
                }
            }
        }
    }

    /// Decision for "role is `required` or senior".
    #[must_use]
    pub fn minimum_role(&self, required: Role) -> AccessDecision {
        let (role, principal) = match self.role() {
            Ok(r) => r,
            Err(decision) => return decision,
        };

        if role.at_least(required) {
            AccessDecision::Granted
        } else {
            tracing::debug!(principal, %role, %required, "role below minimum");
            AccessDecision::Denied(DenyReason::InsufficientRole {
                required,
                actual: role,
            })
        }
    }

    /// Granted if any of `permissions` is granted.
    ///
    /// The deny reason names the first permission of the slice; an empty
    /// slice is [`DenyReason::Unsatisfiable`].
    #[must_use]
    pub fn any(&self, permissions: &[Permission]) -> AccessDecision {
        let (role, principal) = match self.role() {
            Ok(r) => r,
            Err(decision) => return decision,
        };

        if checker::has_any_permission(Some(role), permissions) {
            return AccessDecision::Granted;
        }
        tracing::debug!(principal, %role, count = permissions.len(), "no permission of set granted");
        match permissions.first() {
            Some(&permission) => {
                AccessDecision::Denied(DenyReason::MissingPermission { permission, role })
            }
            None => AccessDecision::Denied(DenyReason::Unsatisfiable),
        }
    }

    /// Granted if every one of `permissions` is granted; the deny reason
    /// names the first missing one.
    #[must_use]
    pub fn all(&self, permissions: &[Permission]) -> AccessDecision {
        let (role, principal) = match self.role() {
            Ok(r) => r,
            Err(decision) => return decision,
        };

        match permissions
            .iter()
            .find(|p| !checker::has_permission(Some(role), **p))
        {
            None => AccessDecision::Granted,
            Some(&permission) => {
                tracing::debug!(principal, %role, %permission, "permission of set missing");
                AccessDecision::Denied(DenyReason::MissingPermission { permission, role })
            }
        }
    }

    /// Permissions of the signed-in principal; empty when signed out,
    /// `None` while unresolved.
    #[must_use]
    pub fn granted(&self) -> Option<BTreeSet<Permission>> {
        match &self.status {
            AuthStatus::Unresolved => None,
            AuthStatus::Resolved(None) => Some(BTreeSet::new()),
            AuthStatus::Resolved(Some(p)) => Some(checker::granted_permissions(p.role)),
        }
    }

    /// Navigation entries the principal may see; `None` while unresolved.
    #[must_use]
    pub fn visible_navigation(&self, items: &[NavItem]) -> Option<Vec<NavItem>> {
        self.granted()
            .map(|granted| filter_navigation_items(items, &granted))
    }
}

/// Supplies the current principal's status.
///
/// Implemented by the session manager; tests implement it directly or use
/// an [`AuthStatus`] value, which is its own source.
///
/// ```
/// use stockroom_auth::{AuthStatus, Permission, Principal, RoleSource};
/// use stockroom_types::Role;
///
/// let fake = AuthStatus::signed_in(Principal::new(7, "ops", Role::Manager));
/// assert_eq!(fake.current_role(), Some(Role::Manager));
/// assert!(fake.decide(Permission::ReportsSend).is_granted());
/// ```
pub trait RoleSource {
    /// Snapshot of the current status.
    fn auth_status(&self) -> AuthStatus;

    /// Role of the signed-in principal, if any.
    fn current_role(&self) -> Option<Role> {
        self.auth_status().role()
    }

    /// An authorizer over the current snapshot.
    fn authorizer(&self) -> Authorizer {
        Authorizer::new(self.auth_status())
    }

    /// Decision for `permission` against the current snapshot.
    fn decide(&self, permission: Permission) -> AccessDecision {
        self.authorizer().permission(permission)
    }
}

impl RoleSource for AuthStatus {
    fn auth_status(&self) -> AuthStatus {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::default_navigation;

    fn as_role(role: Role) -> Authorizer {
        Authorizer::new(AuthStatus::signed_in(Principal::new(1, "tester", role)))
    }

    #[test]
    fn unresolved_is_pending_for_every_check() {
        let a = Authorizer::new(AuthStatus::Unresolved);
        for p in Permission::ALL {
            assert!(a.permission(*p).is_pending(), "{p}");
        }
        assert!(a.minimum_role(Role::Viewer).is_pending());
        assert!(a.any(&[Permission::DashboardView]).is_pending());
        assert!(a.all(&[]).is_pending());
        assert!(a.granted().is_none());
        assert!(a.visible_navigation(&default_navigation()).is_none());
    }

    #[test]
    fn signed_out_is_unauthenticated() {
        let a = Authorizer::new(AuthStatus::signed_out());
        assert_eq!(
            a.permission(Permission::DashboardView),
            AccessDecision::Denied(DenyReason::Unauthenticated)
        );
        assert_eq!(a.granted(), Some(BTreeSet::new()));
        assert_eq!(a.visible_navigation(&default_navigation()), Some(vec![]));
    }

    #[test]
    fn viewer_decisions() {
        let a = as_role(Role::Viewer);
        assert!(a.permission(Permission::InventoryView).is_granted());
        assert_eq!(
            a.permission(Permission::InventoryDelete),
            AccessDecision::Denied(DenyReason::MissingPermission {
                permission: Permission::InventoryDelete,
                role: Role::Viewer,
            })
        );
    }

    #[test]
    fn manager_decisions() {
        let a = as_role(Role::Manager);
        assert!(a.permission(Permission::MerchantsCreate).is_granted());
        assert!(a.permission(Permission::UsersDelete).is_denied());
    }

    #[test]
    fn minimum_role_decisions() {
        assert!(as_role(Role::Admin).minimum_role(Role::Manager).is_granted());
        assert_eq!(
            as_role(Role::Viewer).minimum_role(Role::Manager),
            AccessDecision::Denied(DenyReason::InsufficientRole {
                required: Role::Manager,
                actual: Role::Viewer,
            })
        );
    }

    #[test]
    fn any_and_all_decisions() {
        let a = as_role(Role::Manager);
        let set = [Permission::UsersView, Permission::ReportsView];
        assert!(a.any(&set).is_granted());
        assert_eq!(
            a.all(&set),
            AccessDecision::Denied(DenyReason::MissingPermission {
                permission: Permission::UsersView,
                role: Role::Manager,
            })
        );
        assert!(a.all(&[]).is_granted());
        assert_eq!(a.any(&[]), AccessDecision::Denied(DenyReason::Unsatisfiable));
    }

    #[test]
    fn permission_key_resolves() {
        assert!(as_role(Role::Manager)
            .permission_key("merchants.import")
            .is_granted());
        assert!(Authorizer::new(AuthStatus::Unresolved)
            .permission_key("merchants.import")
            .is_pending());
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "unknown permission key")]
    fn permission_key_unknown_panics_in_debug() {
        let _ = as_role(Role::Admin).permission_key("merchants.evict");
    }

    #[test]
    fn viewer_navigation() {
        let nav = as_role(Role::Viewer)
            .visible_navigation(&default_navigation())
            .unwrap();
        let labels: Vec<_> = nav.iter().map(|i| i.label).collect();
        assert_eq!(labels, ["Dashboard", "Inventory"]);
    }

    #[test]
    fn status_accessors() {
        let s = AuthStatus::signed_in(Principal::new(3, "root", Role::Admin));
        assert!(s.is_resolved());
        assert!(s.is_authenticated());
        assert_eq!(s.role(), Some(Role::Admin));
        assert_eq!(s.principal().map(|p| p.username.as_str()), Some("root"));

        assert!(!AuthStatus::Unresolved.is_resolved());
        assert!(AuthStatus::signed_out().is_resolved());
        assert!(!AuthStatus::signed_out().is_authenticated());
        assert_eq!(AuthStatus::default(), AuthStatus::Unresolved);
    }

    #[test]
    fn custom_role_source() {
        struct Fixed(Role);

        impl RoleSource for Fixed {
            fn auth_status(&self) -> AuthStatus {
                AuthStatus::signed_in(Principal::new(9, "fixed", self.0))
            }
        }

        let src = Fixed(Role::Viewer);
        assert_eq!(src.current_role(), Some(Role::Viewer));
        assert!(src.decide(Permission::ReportsView).is_denied());
        assert!(src.authorizer().minimum_role(Role::Viewer).is_granted());
    }

    #[test]
    fn principal_from_user() {
        let json = r#"{
            "id": 4, "username": "dana", "email": "dana@example.com",
            "role": {"id": 2, "name": "Manager", "description": ""},
            "isActive": true, "lastLogin": null,
            "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-01T00:00:00Z"
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        let p = Principal::from(&user);
        assert_eq!(p, Principal::new(4, "dana", Role::Manager));
    }
}
