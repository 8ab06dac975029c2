use serde::{Deserialize, Serialize};

use crate::{Role, UserId};

/// Session token claims (transport-agnostic).
///
/// This is the full set of claims a session token carries once the codec has
/// verified its signature. Deliberately strongly typed: a payload whose
/// subject is not a UUID string, or whose role list is missing or mis-shaped,
/// is rejected at decode time instead of failing somewhere downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject identity the session was issued to.
    pub user_id: UserId,

    /// Roles bound to the session at issuance. Role gates trust this list;
    /// permission gates combine it with the stored identity.
    pub roles: Vec<Role>,

    /// Expiration as unix epoch seconds.
    pub exp: i64,
}
