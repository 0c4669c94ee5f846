//! Permission keys.
//!
//! Each [`Permission`] names one grantable action by a stable dotted key
//! (`"inventory.view"`, `"users.delete"`). The set is closed: a key that
//! is not listed here cannot be checked, see [`Permission::from_key`].

use crate::UnknownPermission;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

macro_rules! permissions {
    ($( $(#[$doc:meta])* $variant:ident => $key:literal, )*) => {
        /// A grantable action.
        ///
        /// The derived `Ord` follows declaration order, which groups keys by
        /// area (dashboard, inventory, users, merchants, reports, profile).
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum Permission {
            $( $(#[$doc])* $variant, )*
        }

        impl Permission {
            /// Every permission, in declaration order.
            pub const ALL: &'static [Permission] = &[ $( Permission::$variant, )* ];

            /// The stable dotted key.
            #[must_use]
            pub const fn key(self) -> &'static str {
                match self {
                    $( Self::$variant => $key, )*
                }
            }

            /// Looks up a permission by key.
            ///
            /// # Errors
            ///
            /// Returns [`UnknownPermission`] if `key` is not in the table.
            /// Callers treat this as a programming error, not a denial.
            ///
            /// ```
            /// use stockroom_auth::Permission;
            ///
            /// assert_eq!(Permission::from_key("reports.send"), Ok(Permission::ReportsSend));
            /// assert!(Permission::from_key("reports.shred").is_err());
            /// ```
            pub fn from_key(key: &str) -> Result<Self, UnknownPermission> {
                match key {
                    $( $key => Ok(Self::$variant), )*
                    _ => Err(UnknownPermission::new(key)),
                }
            }
        }
    };
}

permissions! {
    DashboardView => "dashboard.view",

    InventoryView => "inventory.view",
    InventoryCreate => "inventory.create",
    InventoryEdit => "inventory.edit",
    InventoryDelete => "inventory.delete",
    /// Quick stock adjustment without a full edit.
    InventoryQuantityUpdate => "inventory.quantity.update",

    UsersView => "users.view",
    UsersCreate => "users.create",
    UsersEdit => "users.edit",
    UsersDelete => "users.delete",
    /// Activate or deactivate an account.
    UsersStatusUpdate => "users.status.update",

    MerchantsView => "merchants.view",
    MerchantsCreate => "merchants.create",
    MerchantsEdit => "merchants.edit",
    MerchantsDelete => "merchants.delete",
    /// Bulk import of merchant contacts from a pasted address list.
    MerchantsImport => "merchants.import",

    ReportsView => "reports.view",
    ReportsSend => "reports.send",
    /// Browse the email delivery log.
    ReportsHistory => "reports.history",

    ProfileView => "profile.view",
    ProfileEdit => "profile.edit",
    ProfilePasswordChange => "profile.password.change",
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Permission {
    type Err = UnknownPermission;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s)
    }
}

impl Serialize for Permission {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl<'de> Deserialize<'de> for Permission {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        Self::from_key(&key).map_err(serde::de::Error::custom)
    }
}
