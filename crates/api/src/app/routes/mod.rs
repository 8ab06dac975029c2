use axum::{routing::get, Router};

use crate::app::services::AppServices;

pub mod admin;
pub mod auth;
pub mod freight;
pub mod superadmin;
pub mod system;

/// Router for all session-gated endpoints.
///
/// The session middleware is layered on top by the app builder; permission
/// and role gates attach per sub-router here.
pub fn router(services: &AppServices) -> Router {
    Router::new()
        .route("/api/auth/me", get(auth::me))
        .merge(freight::router(services))
        .nest("/superadmin", superadmin::router(services))
}
