use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Permission, Role, SessionClaims};

/// Identity of an authenticated principal (human user, service account, etc).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for UserId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<UserId> for Uuid {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s)?))
    }
}

/// A resolved principal for authorization decisions.
///
/// This is an authorization boundary object: it states *who* is acting, which
/// roles and direct permission grants they hold, and whether the account is
/// still enabled. Construction is decoupled from transport and storage, so a
/// gate can build one from token claims alone or enrich it from a store
/// record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,

    /// Roles held by the identity. For session-scoped checks these come from
    /// the token, not the store.
    pub roles: Vec<Role>,

    /// Permissions granted directly, on top of whatever the roles carry
    /// through the catalog.
    pub permissions: Vec<Permission>,

    /// Disabled identities fail every authorization check.
    pub active: bool,
}

impl Identity {
    pub fn new(id: UserId, roles: Vec<Role>) -> Self {
        Self {
            id,
            roles,
            permissions: Vec::new(),
            active: true,
        }
    }

    /// Projection of session claims: roles from the token, no direct grants.
    pub fn from_claims(claims: &SessionClaims) -> Self {
        Self::new(claims.user_id, claims.roles.clone())
    }
}
