//! Admin surface: first-admin bootstrap, admin login, and the dashboard.
//!
//! The dashboard sits behind its own cookie and guard; the bootstrap
//! endpoints are public but self-limiting (setup closes once an admin
//! exists, the superadmin endpoint refuses to run in production).

use axum::{
    extract::Extension,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use loadstar_auth::{hash_password, permissions, roles, verify_password, Identity, UserId};

use crate::app::dto::{LoginRequest, RegisterRequest, UserSummary};
use crate::app::errors::json_error;
use crate::app::routes::auth::session_response;
use crate::app::services::{AppServices, StoredIdentity};
use crate::context::AdminContext;
use crate::middleware::{self, AdminGuard, ADMIN_SESSION_COOKIE};

// ─────────────────────────────────────────────────────────────────────────────
// Routers
// ─────────────────────────────────────────────────────────────────────────────

pub fn public_router() -> Router {
    Router::new()
        .route("/admin/setup", post(setup))
        .route("/admin/login", post(login))
        .route("/admin/dev/superadmin", post(create_dev_superadmin))
}

pub fn guarded_router(services: &AppServices) -> Router {
    Router::new()
        .route("/admin/dashboard", get(dashboard))
        .route_layer(from_fn_with_state(
            AdminGuard {
                services: services.clone(),
            },
            middleware::admin_guard,
        ))
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// POST /admin/setup — create the first admin. Closed permanently as soon as
/// any identity holds the admin role.
pub async fn setup(
    Extension(services): Extension<AppServices>,
    Json(req): Json<RegisterRequest>,
) -> Response {
    if services.identities().count_with_role(&roles::ADMIN) > 0 {
        return json_error(
            StatusCode::FORBIDDEN,
            "setup_closed",
            "admin setup is closed, an admin already exists",
        );
    }

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
        identity: Identity::new(UserId::new(), vec![roles::ADMIN]),
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

    tracing::info!(user_id = %record.identity.id, "first admin created");

    (
        StatusCode::CREATED,
        Json(serde_json::json!({
            "status": "success",
            "message": "admin account created",
            "user": UserSummary::from(&record),
        })),
    )
        .into_response()
}

/// POST /admin/login — credential check plus an admin-role requirement, and
/// the session lands in the admin cookie rather than the API one.
pub async fn login(
    Extension(services): Extension<AppServices>,
    Json(req): Json<LoginRequest>,
) -> Response {
    let Some(record) = services.identities().find_by_email(req.email.trim()) else {
        return json_error(
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            "invalid email or password",
        );
    };

    if !record.identity.active {
        return json_error(
            StatusCode::UNAUTHORIZED,
            "identity_inactive",
            "account is disabled, contact support",
        );
    }

    if !verify_password(&req.password, &record.password_hash) {
        return json_error(
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            "invalid email or password",
        );
    }

    if !record.identity.roles.iter().any(|role| role.is_admin()) {
        return json_error(
            StatusCode::FORBIDDEN,
            "forbidden",
            "admin privileges required",
        );
    }

    tracing::info!(user_id = %record.identity.id, "admin login succeeded");

    session_response(StatusCode::OK, ADMIN_SESSION_COOKIE, &services, &record)
}

/// POST /admin/dev/superadmin — development convenience: an identity with
/// every role and every permission granted directly. Refused outright in
/// production.
pub async fn create_dev_superadmin(
    Extension(services): Extension<AppServices>,
    Json(req): Json<RegisterRequest>,
) -> Response {
    if services.environment().is_production() {
        return json_error(
            StatusCode::FORBIDDEN,
            "disabled_in_production",
            "this endpoint is disabled in production",
        );
    }

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

    let mut identity = Identity::new(
        UserId::new(),
        vec![roles::ADMIN, roles::SHIPPER, roles::CARRIER],
    );
    identity.permissions = permissions::ALL.to_vec();

    let record = StoredIdentity {
        identity,
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

    tracing::warn!(user_id = %record.identity.id, "dev superadmin created");

    (
        StatusCode::CREATED,
        Json(serde_json::json!({
            "status": "success",
            "message": "superadmin account created",
            "user": UserSummary::from(&record),
        })),
    )
        .into_response()
}

/// GET /admin/dashboard — headline counts for the admin landing page.
pub async fn dashboard(
    Extension(admin): Extension<AdminContext>,
    Extension(services): Extension<AppServices>,
) -> impl IntoResponse {
    let records = services.identities().list();
    let active = records.iter().filter(|r| r.identity.active).count();

    Json(serde_json::json!({
        "admin": admin.identity().id.to_string(),
        "totals": {
            "identities": records.len(),
            "active": active,
            "admins": services.identities().count_with_role(&roles::ADMIN),
            "shippers": services.identities().count_with_role(&roles::SHIPPER),
            "carriers": services.identities().count_with_role(&roles::CARRIER),
        },
    }))
}
