//! The static permission table.
//!
//! Every permission is defined by a minimum [`Role`]; the roles authorized
//! for it are that role and every role senior to it. The match in
//! [`minimum_role`] is exhaustive, so a permission without an entry does
//! not compile, and every authorized set contains at least `Admin`.
//!
//! | Area | Minimum role |
//! |------|--------------|
//! | `dashboard.view`, `inventory.view`, `profile.*` | Viewer |
//! | `inventory.create/edit/delete/quantity.update` | Manager |
//! | `merchants.*`, `reports.*` | Manager |
//! | `users.*` | Admin |

use crate::Permission;
use stockroom_types::Role;

/// The least senior role granted `permission`.
#[must_use]
pub const fn minimum_role(permission: Permission) -> Role {
    use Permission::*;

    match permission {
        DashboardView | InventoryView => Role::Viewer,
        ProfileView | ProfileEdit | ProfilePasswordChange => Role::Viewer,

        InventoryCreate | InventoryEdit | InventoryDelete | InventoryQuantityUpdate => {
            Role::Manager
        }
        MerchantsView | MerchantsCreate | MerchantsEdit | MerchantsDelete | MerchantsImport => {
            Role::Manager
        }
        ReportsView | ReportsSend | ReportsHistory => Role::Manager,

        UsersView | UsersCreate | UsersEdit | UsersDelete | UsersStatusUpdate => Role::Admin,
    }
}

/// Roles authorized for `permission`, most junior first. Never empty.
#[must_use]
pub fn authorized_roles(permission: Permission) -> Vec<Role> {
    let min = minimum_role(permission);
    Role::ALL.into_iter().filter(|r| *r >= min).collect()
}
