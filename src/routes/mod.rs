//! API Routes
//!
//! - `/api/health` - Health check (public)
//! - `/api/me` - Claims of the authenticated caller
//! - `/api/payments` - Process a payment

pub mod account;
pub mod health;
pub mod payments;

use axum::{middleware, Router};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::middleware::{auth::require_auth, cors::apply_cors};
use crate::models::AppState;

/// Create the main application router
///
/// Everything except the health check sits behind `require_auth`.
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let protected = Router::new()
        .merge(account::router())
        .merge(payments::router(state.clone()))
        .route_layer(middleware::from_fn_with_state(
            state.verifier.clone(),
            require_auth,
        ));

    let router = Router::new()
        .merge(health::router())
        .merge(protected);

    apply_cors(router, &state.config.server.cors_allowed_origins)
        .layer(TraceLayer::new_for_http())
}
