//! HTTP transport for the auth service.

pub mod handlers;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::service::AuthService;

/// Shared handler state.
pub type AppState = Arc<AuthService>;

/// Create the router with all endpoints.
///
/// # Routes
///
/// - `POST /login` - Exchange `{username, password}` for `{token}`
/// - `POST /verify` - Validate the token in the `Authorization` header
/// - `GET /health` - Liveness probe
pub fn create_router(service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/login", post(handlers::login_handler))
        .route("/verify", post(handlers::verify_handler))
        .route("/health", get(handlers::health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}
