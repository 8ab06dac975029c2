use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use chrono::{DateTime, Utc};
use thiserror::Error;

use loadstar_auth::{Identity, Role, TokenCodec, TokenValidator, UserId};

use crate::config::Environment;

/// Identity record as the store keeps it. The password hash stays inside the
/// credential flows and never serializes into a response.
#[derive(Debug, Clone)]
pub struct StoredIdentity {
    pub identity: Identity,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub last_login: Option<DateTime<Utc>>,
}

/// The email is already registered.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("an identity with this email already exists")]
pub struct DuplicateEmail;

/// Persistence seam for identities.
///
/// Relational storage lives outside this service; the in-memory
/// implementation below backs tests and local runs.
pub trait IdentityStore: Send + Sync {
    fn find_by_id(&self, id: &UserId) -> Option<StoredIdentity>;
    fn find_by_email(&self, email: &str) -> Option<StoredIdentity>;
    fn insert(&self, record: StoredIdentity) -> Result<(), DuplicateEmail>;
    fn list(&self) -> Vec<StoredIdentity>;
    fn remove(&self, id: &UserId) -> bool;
    fn set_active(&self, id: &UserId, active: bool) -> bool;
    fn touch_last_login(&self, id: &UserId, at: DateTime<Utc>);
    fn count_with_role(&self, role: &Role) -> usize;
}

#[derive(Debug, Default)]
pub struct InMemoryIdentityStore {
    inner: RwLock<HashMap<UserId, StoredIdentity>>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdentityStore for InMemoryIdentityStore {
    fn find_by_id(&self, id: &UserId) -> Option<StoredIdentity> {
        self.inner.read().unwrap().get(id).cloned()
    }

    fn find_by_email(&self, email: &str) -> Option<StoredIdentity> {
        self.inner
            .read()
            .unwrap()
            .values()
            .find(|record| record.email == email)
            .cloned()
    }

    fn insert(&self, record: StoredIdentity) -> Result<(), DuplicateEmail> {
        let mut inner = self.inner.write().unwrap();

        if inner.values().any(|existing| existing.email == record.email) {
            return Err(DuplicateEmail);
        }

        inner.insert(record.identity.id, record);
        Ok(())
    }

    fn list(&self) -> Vec<StoredIdentity> {
        let mut records: Vec<StoredIdentity> = self.inner.read().unwrap().values().cloned().collect();
        // v7 ids are time-ordered, so this is registration order.
        records.sort_by_key(|record| *record.identity.id.as_uuid());
        records
    }

    fn remove(&self, id: &UserId) -> bool {
        self.inner.write().unwrap().remove(id).is_some()
    }

    fn set_active(&self, id: &UserId, active: bool) -> bool {
        match self.inner.write().unwrap().get_mut(id) {
            Some(record) => {
                record.identity.active = active;
                true
            }
            None => false,
        }
    }

    fn touch_last_login(&self, id: &UserId, at: DateTime<Utc>) {
        if let Some(record) = self.inner.write().unwrap().get_mut(id) {
            record.last_login = Some(at);
        }
    }

    fn count_with_role(&self, role: &Role) -> usize {
        self.inner
            .read()
            .unwrap()
            .values()
            .filter(|record| record.identity.roles.contains(role))
            .count()
    }
}

/// Shared service container handed to every route and guard.
#[derive(Clone)]
pub struct AppServices {
    identities: Arc<dyn IdentityStore>,
    tokens: Arc<TokenCodec>,
    environment: Environment,
}

impl AppServices {
    pub fn new(tokens: Arc<TokenCodec>, environment: Environment) -> Self {
        Self {
            identities: Arc::new(InMemoryIdentityStore::new()),
            tokens,
            environment,
        }
    }

    pub fn identities(&self) -> &dyn IdentityStore {
        self.identities.as_ref()
    }

    pub fn tokens(&self) -> &TokenCodec {
        &self.tokens
    }

    /// The codec behind the middleware's validation seam.
    pub fn validator(&self) -> Arc<dyn TokenValidator> {
        self.tokens.clone()
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }
}
