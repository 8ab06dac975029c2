use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Permission identifier.
///
/// Permissions are modeled as opaque strings (e.g. "view_shipment"). The
/// constants below pin the brokerage vocabulary; `system_admin` acts as a
/// universal override for policy layers that honor it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_system_admin(&self) -> bool {
        self.as_str() == SYSTEM_ADMIN.as_str()
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

// Shipment lifecycle.
pub const CREATE_SHIPMENT: Permission = Permission::from_static("create_shipment");
pub const VIEW_SHIPMENT: Permission = Permission::from_static("view_shipment");
pub const EDIT_SHIPMENT: Permission = Permission::from_static("edit_shipment");
pub const DELETE_SHIPMENT: Permission = Permission::from_static("delete_shipment");

// Rates and routes.
pub const MANAGE_RATES: Permission = Permission::from_static("manage_rates");
pub const VIEW_RATES: Permission = Permission::from_static("view_rates");
pub const ADD_ROUTES: Permission = Permission::from_static("add_routes");
pub const VIEW_ROUTES: Permission = Permission::from_static("view_routes");

// User administration.
pub const MANAGE_USERS: Permission = Permission::from_static("manage_users");
pub const VIEW_USERS: Permission = Permission::from_static("view_users");

// Financials.
pub const VIEW_FINANCIALS: Permission = Permission::from_static("view_financials");
pub const MANAGE_PAYMENTS: Permission = Permission::from_static("manage_payments");

// Platform administration.
pub const SYSTEM_ADMIN: Permission = Permission::from_static("system_admin");
pub const MANAGE_SETTINGS: Permission = Permission::from_static("manage_settings");
pub const VIEW_SETTINGS: Permission = Permission::from_static("view_settings");

/// Every permission the platform defines, for audit listings and blanket
/// grants.
pub const ALL: [Permission; 15] = [
    SYSTEM_ADMIN,
    MANAGE_SETTINGS,
    VIEW_SETTINGS,
    MANAGE_USERS,
    VIEW_USERS,
    CREATE_SHIPMENT,
    VIEW_SHIPMENT,
    EDIT_SHIPMENT,
    DELETE_SHIPMENT,
    MANAGE_RATES,
    VIEW_RATES,
    ADD_ROUTES,
    VIEW_ROUTES,
    VIEW_FINANCIALS,
    MANAGE_PAYMENTS,
];
