use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use loadstar_auth::{authorize, roles, AuthError, Identity, Permission, Role, TokenValidator};

use crate::app::errors::AuthRejection;
use crate::app::services::AppServices;
use crate::context::{AdminContext, SessionContext};

/// Cookie carrying the user session token.
pub const SESSION_COOKIE: &str = "auth_token";

/// Cookie carrying the admin-surface session token. Never read for regular
/// API routes, and the admin surface never falls back to bearer headers.
pub const ADMIN_SESSION_COOKIE: &str = "admin_auth_token";

#[derive(Clone)]
pub struct AuthState {
    pub tokens: Arc<dyn TokenValidator>,
}

/// Session middleware for the API surface.
///
/// Looks for a token in the session cookie first, then in the Authorization
/// header. A request carrying neither is turned away before any verification
/// work happens. On success the decoded claims are inserted as a
/// [`SessionContext`] for downstream gates and handlers.
pub async fn session_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AuthRejection> {
    let token = extract_token(req.headers()).ok_or(AuthError::AuthRequired)?;

    let claims = state.tokens.parse(token)?;

    tracing::debug!(user_id = %claims.user_id, "session authenticated");

    req.extensions_mut()
        .insert(SessionContext::new(claims.user_id, claims.roles));

    Ok(next.run(req).await)
}

/// Role gate. Claims-only: the token's role list is the session's truth, so
/// no store lookup happens here.
#[derive(Clone)]
pub struct RequiredRoles(pub Vec<Role>);

pub async fn role_guard(
    State(RequiredRoles(required)): State<RequiredRoles>,
    req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AuthRejection> {
    let session = req
        .extensions()
        .get::<SessionContext>()
        .ok_or(AuthError::AuthRequired)?;

    let identity = Identity::new(session.user_id(), session.roles().to_vec());
    authorize::require_role(&identity, &required)?;

    Ok(next.run(req).await)
}

/// Permission gate. Resolves the stored identity so direct grants and the
/// active flag participate; the token's roles still override whatever the
/// store has recorded.
#[derive(Clone)]
pub struct PermissionGuard {
    pub services: AppServices,
    pub required: Permission,
}

pub async fn permission_guard(
    State(guard): State<PermissionGuard>,
    req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AuthRejection> {
    let session = req
        .extensions()
        .get::<SessionContext>()
        .ok_or(AuthError::AuthRequired)?;

    // A session whose subject has vanished from the store is a dangling
    // token, not a permission failure.
    let stored = guard
        .services
        .identities()
        .find_by_id(&session.user_id())
        .ok_or(AuthError::TokenInvalid)?;

    let identity = Identity {
        roles: session.roles().to_vec(),
        ..stored.identity
    };

    if let Err(err) = authorize::require_permission(&identity, &guard.required) {
        tracing::info!(
            user_id = %identity.id,
            permission = %guard.required,
            denial = err.code(),
            "permission denied"
        );
        return Err(err.into());
    }

    Ok(next.run(req).await)
}

/// Admin-surface gate: separate cookie, no bearer fallback, and the store
/// record is consulted with the active check ahead of the role check.
#[derive(Clone)]
pub struct AdminGuard {
    pub services: AppServices,
}

pub async fn admin_guard(
    State(guard): State<AdminGuard>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AuthRejection> {
    let token =
        extract_cookie(req.headers(), ADMIN_SESSION_COOKIE).ok_or(AuthError::AuthRequired)?;

    let claims = guard.services.tokens().parse(token)?;

    let stored = guard
        .services
        .identities()
        .find_by_id(&claims.user_id)
        .ok_or(AuthError::TokenInvalid)?;
    if !stored.identity.active {
        return Err(AuthError::IdentityInactive.into());
    }

    let identity = Identity {
        roles: claims.roles,
        ..stored.identity
    };
    authorize::require_role(&identity, &[roles::ADMIN])?;

    req.extensions_mut().insert(AdminContext::new(identity));

    Ok(next.run(req).await)
}

fn extract_token(headers: &HeaderMap) -> Option<&str> {
    extract_cookie(headers, SESSION_COOKIE).or_else(|| extract_bearer(headers))
}

/// Pull one cookie's value out of the Cookie header.
fn extract_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;

    raw.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name && !value.is_empty()).then_some(value)
    })
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();

    if token.is_empty() {
        return None;
    }

    Some(token)
}
