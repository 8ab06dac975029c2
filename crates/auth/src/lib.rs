//! `loadstar-auth` — pure authentication/authorization core.
//!
//! This crate is intentionally decoupled from HTTP and storage: it verifies
//! credentials, mints and parses session tokens, and answers role and
//! permission questions over a resolved identity. Transport concerns (cookies,
//! headers, status codes) live in the API crate.

pub mod authorize;
pub mod catalog;
pub mod claims;
pub mod error;
pub mod identity;
pub mod password;
pub mod permissions;
pub mod roles;
pub mod token;

pub use authorize::{
    identity_has_permission, identity_has_role, require_permission, require_role,
};
pub use catalog::{role_has_permission, role_permissions};
pub use claims::SessionClaims;
pub use error::AuthError;
pub use identity::{Identity, UserId};
pub use password::{hash_password, verify_password, PasswordHashError};
pub use permissions::Permission;
pub use roles::Role;
pub use token::{
    default_session_ttl, EmptySigningSecret, TokenCodec, TokenSigningError, TokenValidator,
};
