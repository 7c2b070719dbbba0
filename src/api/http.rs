//! HTTP server setup with Axum

use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
};

use super::middleware::log_requests;
use super::rest::events;
use super::state::AppState;

/// Create the Axum router with all endpoints.
///
/// A request not answered within `request_timeout` gets `408 Request Timeout`.
pub fn create_router(state: Arc<AppState>, request_timeout: Duration) -> Router {
    // CORS configuration - allow all origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Mutations
        .route("/create_event", post(events::create_event))
        .route("/update_event", post(events::update_event))
        .route("/delete_event", post(events::delete_event))
        // Queries
        .route("/events_for_day", get(events::events_for_day))
        .route("/events_for_week", get(events::events_for_week))
        .route("/events_for_month", get(events::events_for_month))
        .route("/events", get(events::active_events))
        // Inside the logger so timed-out requests are still logged
        .layer(TimeoutLayer::new(request_timeout))
        .layer(from_fn_with_state(state.clone(), log_requests))
        .layer(cors)
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
