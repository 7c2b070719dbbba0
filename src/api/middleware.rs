//! Request logging middleware

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use serde_json::json;

use super::state::AppState;

/// Log method, URL, status and duration of every request
pub async fn log_requests(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let url = request.uri().to_string();

    let response = next.run(request).await;

    state.logger.info(
        "HTTP Request",
        json!({
            "method": method,
            "url": url,
            "status_code": response.status().as_u16(),
            "duration_ms": whole_millis(start.elapsed()),
        }),
    );
    response
}

/// Milliseconds as `u64`, saturating
fn whole_millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
