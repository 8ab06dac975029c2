//! Role-to-permission catalog.
//!
//! The catalog is fixed at compile time and never mutated at runtime. Looking
//! up a role it does not define yields an empty grant set rather than an
//! error, so unknown roles simply carry no authority.

use crate::{permissions, Permission, Role};

static ADMIN_GRANTS: [Permission; 15] = permissions::ALL;

static SHIPPER_GRANTS: [Permission; 6] = [
    permissions::CREATE_SHIPMENT,
    permissions::VIEW_SHIPMENT,
    permissions::EDIT_SHIPMENT,
    permissions::VIEW_RATES,
    permissions::VIEW_ROUTES,
    permissions::VIEW_FINANCIALS,
];

static CARRIER_GRANTS: [Permission; 6] = [
    permissions::VIEW_SHIPMENT,
    permissions::MANAGE_RATES,
    permissions::VIEW_RATES,
    permissions::ADD_ROUTES,
    permissions::VIEW_ROUTES,
    permissions::VIEW_FINANCIALS,
];

/// Permissions granted by a role. Unknown roles get the empty slice.
pub fn role_permissions(role: &Role) -> &'static [Permission] {
    match role.as_str() {
        "admin" => &ADMIN_GRANTS,
        "shipper" => &SHIPPER_GRANTS,
        "carrier" => &CARRIER_GRANTS,
        _ => &[],
    }
}

/// Pure membership check against the catalog.
pub fn role_has_permission(role: &Role, permission: &Permission) -> bool {
    role_permissions(role).contains(permission)
}
