use axum::{
    extract::Extension,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::Utc;

use loadstar_auth::{
    default_session_ttl, hash_password, roles, verify_password, AuthError, Identity, UserId,
};

use crate::app::dto::{LoginRequest, RegisterRequest, UserSummary};
use crate::app::errors::{json_error, status_for};
use crate::app::services::{AppServices, StoredIdentity};
use crate::config::Environment;
use crate::context::SessionContext;
use crate::middleware::SESSION_COOKIE;

pub fn public_router() -> Router {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
}

/// POST /api/auth/register — self-service signup. New identities get the
/// shipper role; everything else is an admin concern.
pub async fn register(
    Extension(services): Extension<AppServices>,
    Json(req): Json<RegisterRequest>,
) -> Response {
    let username = req.username.trim();
    let email = req.email.trim();

    if username.is_empty() || email.is_empty() || req.password.is_empty() {
        return json_error(
            StatusCode::BAD_REQUEST,
            "missing_fields",
            "username, email and password are required",
        );
    }

    let password_hash = match hash_password(&req.password) {
        Ok(hash) => hash,
        Err(err) => {
            tracing::error!(error = %err, "password hashing failed");
            return json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "hash_failure",
                "could not process credentials",
            );
        }
    };

    let record = StoredIdentity {
        identity: Identity::new(UserId::new(), vec![roles::SHIPPER]),
        username: username.to_string(),
        email: email.to_string(),
        password_hash,
        last_login: None,
    };

    if services.identities().insert(record.clone()).is_err() {
        return json_error(
            StatusCode::CONFLICT,
            "email_taken",
            "an identity with this email already exists",
        );
    }

    tracing::info!(user_id = %record.identity.id, "identity registered");

    session_response(StatusCode::CREATED, SESSION_COOKIE, &services, &record)
}

/// POST /api/auth/login — credential check against the stored hash. Unknown
/// email and wrong password are indistinguishable on the wire.
pub async fn login(
    Extension(services): Extension<AppServices>,
    Json(req): Json<LoginRequest>,
) -> Response {
    let Some(record) = services.identities().find_by_email(req.email.trim()) else {
        return invalid_credentials();
    };

    if !record.identity.active {
        return json_error(
            status_for(AuthError::IdentityInactive),
            AuthError::IdentityInactive.code(),
            "account is disabled, contact support",
        );
    }

    if !verify_password(&req.password, &record.password_hash) {
        return invalid_credentials();
    }

    services
        .identities()
        .touch_last_login(&record.identity.id, Utc::now());

    tracing::info!(user_id = %record.identity.id, "login succeeded");

    session_response(StatusCode::OK, SESSION_COOKIE, &services, &record)
}

/// POST /api/auth/logout — expire the session cookie. The token itself stays
/// valid until its expiry; there is no server-side revocation.
pub async fn logout(Extension(services): Extension<AppServices>) -> Response {
    (
        StatusCode::OK,
        [(
            header::SET_COOKIE,
            clear_cookie(SESSION_COOKIE, services.environment()),
        )],
        Json(serde_json::json!({
            "status": "success",
            "message": "logged out",
        })),
    )
        .into_response()
}

/// GET /api/auth/me — echo of the session context.
pub async fn me(Extension(session): Extension<SessionContext>) -> impl IntoResponse {
    Json(serde_json::json!({
        "user_id": session.user_id().to_string(),
        "roles": session
            .roles()
            .iter()
            .map(|role| role.as_str())
            .collect::<Vec<_>>(),
    }))
}

fn invalid_credentials() -> Response {
    json_error(
        StatusCode::UNAUTHORIZED,
        "invalid_credentials",
        "invalid email or password",
    )
}

/// Issue a session token for `record` and shape the cookie + JSON response.
pub(super) fn session_response(
    status: StatusCode,
    cookie_name: &str,
    services: &AppServices,
    record: &StoredIdentity,
) -> Response {
    let token = match services.tokens().issue(
        record.identity.id,
        &record.identity.roles,
        default_session_ttl(),
    ) {
        Ok(token) => token,
        Err(err) => {
            tracing::error!(error = %err, "token issuance failed");
            return json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "token_failure",
                "could not issue session token",
            );
        }
    };

    (
        status,
        [(
            header::SET_COOKIE,
            session_cookie(cookie_name, &token, services.environment()),
        )],
        Json(serde_json::json!({
            "status": "success",
            "token": token,
            "user": UserSummary::from(record),
        })),
    )
        .into_response()
}

/// Session cookie string. HttpOnly always; production adds Secure and
/// tightens SameSite.
pub(super) fn session_cookie(name: &str, token: &str, environment: Environment) -> String {
    let mut cookie = format!(
        "{name}={token}; Path=/; HttpOnly; Max-Age={}",
        default_session_ttl().num_seconds()
    );

    if environment.is_production() {
        cookie.push_str("; Secure; SameSite=Strict");
    } else {
        cookie.push_str("; SameSite=Lax");
    }

    cookie
}

pub(super) fn clear_cookie(name: &str, environment: Environment) -> String {
    let mut cookie = format!("{name}=; Path=/; HttpOnly; Max-Age=0");

    if environment.is_production() {
        cookie.push_str("; Secure; SameSite=Strict");
    } else {
        cookie.push_str("; SameSite=Lax");
    }

    cookie
}
