//! Health check endpoint.

use axum::extract::State;
use axum::Json;

use crate::response::HealthResponse;
use crate::state::AppState;

/// GET /health - liveness plus queue depth.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        queue_depth: state.queue.depth() as u64,
    })
}
