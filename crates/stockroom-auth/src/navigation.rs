//! Navigation entries and permission-based filtering.

use crate::Permission;
use std::collections::BTreeSet;

/// One entry of the dashboard navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub href: &'static str,
    pub permission: Permission,
    pub description: &'static str,
}

/// The sidebar, in display order.
#[must_use]
pub fn default_navigation() -> Vec<NavItem> {
    vec![
        NavItem {
            label: "Dashboard",
            href: "/dashboard",
            permission: Permission::DashboardView,
            description: "Overview and statistics",
        },
        NavItem {
            label: "Inventory",
            href: "/dashboard/inventory",
            permission: Permission::InventoryView,
            description: "Manage inventory items",
        },
        NavItem {
            label: "Merchants",
            href: "/dashboard/merchants",
            permission: Permission::MerchantsView,
            description: "Manage merchant contacts",
        },
        NavItem {
            label: "Users",
            href: "/dashboard/users",
            permission: Permission::UsersView,
            description: "Manage system users",
        },
        NavItem {
            label: "Reports",
            href: "/dashboard/reports",
            permission: Permission::ReportsView,
            description: "Send inventory reports",
        },
    ]
}

/// The account menu.
#[must_use]
pub fn user_menu() -> Vec<NavItem> {
    vec![NavItem {
        label: "Profile",
        href: "/dashboard/profile",
        permission: Permission::ProfileView,
        description: "Account settings",
    }]
}

/// Keeps the items whose permission is in `granted`, preserving order.
///
/// ```
/// use stockroom_auth::{default_navigation, filter_navigation_items, granted_permissions};
/// use stockroom_types::Role;
///
/// let visible = filter_navigation_items(&default_navigation(), &granted_permissions(Role::Viewer));
/// let labels: Vec<_> = visible.iter().map(|i| i.label).collect();
/// assert_eq!(labels, ["Dashboard", "Inventory"]);
/// ```
#[must_use]
pub fn filter_navigation_items(items: &[NavItem], granted: &BTreeSet<Permission>) -> Vec<NavItem> {
    items
        .iter()
        .filter(|item| granted.contains(&item.permission))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::granted_permissions;
    use stockroom_types::Role;

    fn labels(items: &[NavItem]) -> Vec<&'static str> {
        items.iter().map(|i| i.label).collect()
    }

    #[test]
    fn per_role_navigation() {
        let nav = default_navigation();
        assert_eq!(
            labels(&filter_navigation_items(&nav, &granted_permissions(Role::Viewer))),
            ["Dashboard", "Inventory"]
        );
        assert_eq!(
            labels(&filter_navigation_items(&nav, &granted_permissions(Role::Manager))),
            ["Dashboard", "Inventory", "Merchants", "Reports"]
        );
        assert_eq!(
            labels(&filter_navigation_items(&nav, &granted_permissions(Role::Admin))),
            ["Dashboard", "Inventory", "Merchants", "Users", "Reports"]
        );
    }

    #[test]
    fn filtering_is_idempotent() {
        let granted = granted_permissions(Role::Manager);
        let once = filter_navigation_items(&default_navigation(), &granted);
        let twice = filter_navigation_items(&once, &granted);
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_grant_hides_everything() {
        assert!(filter_navigation_items(&default_navigation(), &BTreeSet::new()).is_empty());
    }

    #[test]
    fn profile_is_visible_to_everyone() {
        for role in Role::ALL {
            let menu = filter_navigation_items(&user_menu(), &granted_permissions(role));
            assert_eq!(labels(&menu), ["Profile"], "{role}");
        }
    }
}
