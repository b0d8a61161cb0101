use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

// API Routes - validation endpoints for the other services
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new().nest(
        "/api",
        Router::new()
            // Shape registry
            .route("/schemas", get(handlers::api::list_schemas))
            .route("/validate/{shape}", post(handlers::api::validate_payload))
            // System status
            .route("/status", get(handlers::api::system_status)),
    )
}
