use std::sync::Arc;

use axum::{middleware::from_fn_with_state, routing::get, Extension, Router};
use tower::ServiceBuilder;

use loadstar_auth::TokenCodec;

use crate::config::AppConfig;
use crate::middleware::{self, AuthState};

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

use services::AppServices;

/// Build the full application router.
///
/// Fails when the signing secret is empty; the process must not come up with
/// an unusable codec.
pub fn build_app(config: AppConfig) -> anyhow::Result<Router> {
    let tokens = Arc::new(TokenCodec::new(config.signing_secret.as_bytes())?);
    let services = AppServices::new(tokens, config.environment);

    let auth_state = AuthState {
        tokens: services.validator(),
    };

    // Everything here sits behind the session middleware; permission and
    // role gates attach per sub-router inside.
    let protected = routes::router(&services).layer(from_fn_with_state(
        auth_state,
        middleware::session_middleware,
    ));

    let app = Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::auth::public_router())
        .merge(routes::admin::public_router())
        .merge(routes::admin::guarded_router(&services))
        .merge(protected)
        .layer(ServiceBuilder::new().layer(Extension(services)));

    Ok(app)
}
