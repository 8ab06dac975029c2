//! Identity administration, nested under /superadmin.
//!
//! The whole tree is behind the `system_admin` permission gate, which an
//! admin satisfies through the catalog and a dev superadmin through a direct
//! grant.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::{delete, get, patch},
    Json, Router,
};
use uuid::Uuid;

use loadstar_auth::{permissions, UserId};

use crate::app::dto::{SetActiveRequest, UserSummary};
use crate::app::errors::json_error;
use crate::app::services::AppServices;
use crate::middleware::{self, PermissionGuard};

pub fn router(services: &AppServices) -> Router {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:id/active", patch(set_user_active))
        .route("/users/:id", delete(delete_user))
        .route_layer(from_fn_with_state(
            PermissionGuard {
                services: services.clone(),
                required: permissions::SYSTEM_ADMIN,
            },
            middleware::permission_guard,
        ))
}

/// GET /superadmin/users — every identity on the platform.
pub async fn list_users(Extension(services): Extension<AppServices>) -> impl IntoResponse {
    let users: Vec<UserSummary> = services
        .identities()
        .list()
        .iter()
        .map(UserSummary::from)
        .collect();

    Json(serde_json::json!({ "users": users }))
}

/// PATCH /superadmin/users/:id/active — enable or disable an identity.
/// Disabling takes effect on the next permission-gated request; the session
/// token itself cannot be recalled.
pub async fn set_user_active(
    Extension(services): Extension<AppServices>,
    Path(id): Path<Uuid>,
    Json(req): Json<SetActiveRequest>,
) -> Response {
    let id = UserId::from_uuid(id);

    if !services.identities().set_active(&id, req.active) {
        return json_error(StatusCode::NOT_FOUND, "not_found", "no such identity");
    }

    tracing::info!(user_id = %id, active = req.active, "identity active flag updated");

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "success",
            "user_id": id.to_string(),
            "active": req.active,
        })),
    )
        .into_response()
}

/// DELETE /superadmin/users/:id — remove an identity outright.
pub async fn delete_user(
    Extension(services): Extension<AppServices>,
    Path(id): Path<Uuid>,
) -> Response {
    let id = UserId::from_uuid(id);

    if !services.identities().remove(&id) {
        return json_error(StatusCode::NOT_FOUND, "not_found", "no such identity");
    }

    tracing::info!(user_id = %id, "identity removed");

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "success",
            "user_id": id.to_string(),
        })),
    )
        .into_response()
}
