//! Shipment and rate endpoints.
//!
//! CRUD against the relational store is outside this service; these handlers
//! return thin JSON so the gates in front of them protect something real.
//! Each sub-router carries exactly one gate, and same-path routers merge by
//! method.

use axum::{
    extract::Extension,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use loadstar_auth::{permissions, roles};

use crate::app::dto::{CreateShipmentRequest, QuoteRateRequest};
use crate::app::services::AppServices;
use crate::context::SessionContext;
use crate::middleware::{self, PermissionGuard, RequiredRoles};

pub fn router(services: &AppServices) -> Router {
    let view_shipments = Router::new()
        .route("/api/shipments", get(list_shipments))
        .route_layer(from_fn_with_state(
            PermissionGuard {
                services: services.clone(),
                required: permissions::VIEW_SHIPMENT,
            },
            middleware::permission_guard,
        ));

    let create_shipments = Router::new()
        .route("/api/shipments", post(create_shipment))
        .route_layer(from_fn_with_state(
            PermissionGuard {
                services: services.clone(),
                required: permissions::CREATE_SHIPMENT,
            },
            middleware::permission_guard,
        ));

    let view_rates = Router::new()
        .route("/api/rates", get(list_rates))
        .route_layer(from_fn_with_state(
            PermissionGuard {
                services: services.clone(),
                required: permissions::VIEW_RATES,
            },
            middleware::permission_guard,
        ));

    let quote_rates = Router::new()
        .route("/api/rates", post(quote_rate))
        .route_layer(from_fn_with_state(
            PermissionGuard {
                services: services.clone(),
                required: permissions::MANAGE_RATES,
            },
            middleware::permission_guard,
        ));

    let carrier_board = Router::new()
        .route("/api/carrier/loads", get(open_loads))
        .route_layer(from_fn_with_state(
            RequiredRoles(vec![roles::CARRIER]),
            middleware::role_guard,
        ));

    view_shipments
        .merge(create_shipments)
        .merge(view_rates)
        .merge(quote_rates)
        .merge(carrier_board)
}

pub async fn list_shipments(Extension(session): Extension<SessionContext>) -> impl IntoResponse {
    Json(serde_json::json!({
        "shipments": [],
        "viewer": session.user_id().to_string(),
    }))
}

pub async fn create_shipment(
    Extension(session): Extension<SessionContext>,
    Json(req): Json<CreateShipmentRequest>,
) -> impl IntoResponse {
    let shipment_id = Uuid::now_v7();

    tracing::info!(
        shipment_id = %shipment_id,
        origin = %req.origin,
        destination = %req.destination,
        "shipment posted"
    );

    (
        StatusCode::CREATED,
        Json(serde_json::json!({
            "shipment_id": shipment_id.to_string(),
            "origin": req.origin,
            "destination": req.destination,
            "weight_lbs": req.weight_lbs,
            "status": "draft",
            "created_by": session.user_id().to_string(),
        })),
    )
}

pub async fn list_rates() -> impl IntoResponse {
    Json(serde_json::json!({ "rates": [] }))
}

pub async fn quote_rate(
    Extension(session): Extension<SessionContext>,
    Json(req): Json<QuoteRateRequest>,
) -> impl IntoResponse {
    (
        StatusCode::CREATED,
        Json(serde_json::json!({
            "lane": req.lane,
            "rate_per_mile": req.rate_per_mile,
            "status": "quoted",
            "quoted_by": session.user_id().to_string(),
        })),
    )
}

pub async fn open_loads(Extension(session): Extension<SessionContext>) -> impl IntoResponse {
    Json(serde_json::json!({
        "loads": [],
        "carrier": session.user_id().to_string(),
    }))
}
