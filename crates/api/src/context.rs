use loadstar_auth::{Identity, Role, UserId};

/// Session context for a request (authenticated identity + session roles).
///
/// Inserted by the session middleware; role and permission gates downstream
/// read it out of request extensions. The roles here come from the token, not
/// the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    user_id: UserId,
    roles: Vec<Role>,
}

impl SessionContext {
    pub fn new(user_id: UserId, roles: Vec<Role>) -> Self {
        Self { user_id, roles }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }
}

/// Admin-surface context: the fully resolved identity behind the admin
/// cookie, store record included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminContext {
    identity: Identity,
}

impl AdminContext {
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }
}
