//! Authorization model for the stockroom back office.
//!
//! Maps a signed-in principal's [`Role`] to the actions, routes and
//! navigation entries it may use. Used to gate what the client shows and
//! where it navigates.
//!
//! **This is not a security boundary.** Every check here is advisory and
//! mirrors rules the API server enforces on its own; a caller that skips
//! these checks gains nothing the server would not refuse.
//!
//! # Crate Architecture
//!
//! ```text
//! stockroom-types  (Role, User, records)
//!        ↑
//! stockroom-auth  ◄── THIS CRATE
//!   Permission ── table (minimum role) ── checker (bool checks)
//!        │
//!   AuthStatus ── Authorizer (three-way AccessDecision)
//!        │
//!   RouteGuard, navigation filter
//!        ↑
//! stockroom-client (SessionManager implements RoleSource)
//! ```
//!
//! # Example
//!
//! ```
//! use stockroom_auth::{
//!     default_navigation, AuthStatus, Authorizer, Permission, Principal, Role,
//! };
//!
//! let status = AuthStatus::signed_in(Principal::new(1, "amy", Role::Viewer));
//! let auth = Authorizer::new(status);
//!
//! assert!(auth.permission(Permission::InventoryView).is_granted());
//! assert!(auth.permission(Permission::InventoryDelete).is_denied());
//!
//! let nav = auth.visible_navigation(&default_navigation()).unwrap();
//! assert_eq!(nav.len(), 2);
//! ```

pub mod checker;
pub mod decision;
pub mod error;
pub mod navigation;
pub mod permission;
pub mod route;
pub mod status;
pub mod table;

pub use checker::{
    granted_permissions, has_all_permissions, has_any_permission, has_minimum_role,
    has_permission, has_permission_key, PermissionChecker,
};
pub use decision::{AccessDecision, DenyReason};
pub use error::{AccessDenied, UnknownPermission};
pub use navigation::{default_navigation, filter_navigation_items, user_menu, NavItem};
pub use permission::Permission;
pub use route::{
    is_asset_path, is_public_route, required_permissions, RouteDecision, RouteGuard,
    FORBIDDEN_FALLBACK, LOGIN_PATH, PUBLIC_ROUTES,
};
pub use status::{AuthStatus, Authorizer, Principal, RoleSource};
pub use table::{authorized_roles, minimum_role};

// Re-export Role so consumers need only this crate for checks.
pub use stockroom_types::Role;
