use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role identifier used for RBAC.
///
/// Roles are intentionally opaque strings at this layer. The catalog maps the
/// well-known ones to their granted permissions; a role the catalog does not
/// define grants nothing but is still carried verbatim in sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The admin role passes every role gate regardless of the requirement.
    pub fn is_admin(&self) -> bool {
        self.as_str() == ADMIN.as_str()
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Platform administrator. Overrides role gates and carries every catalog
/// permission.
pub const ADMIN: Role = Role::from_static("admin");

/// Freight owner: posts shipments and tracks them through delivery.
pub const SHIPPER: Role = Role::from_static("shipper");

/// Transport operator: quotes rates and runs routes for posted freight.
pub const CARRIER: Role = Role::from_static("carrier");
