//! API routes.

pub mod health;
pub mod stats;
pub mod track;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Creates the API router.
///
/// No CORS layer: the beacon travels as an `<img>` fetch, which needs
/// none, and the stats surface is same-origin behind the dashboard.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/track", get(track::track_handler))
        .route("/stats", post(stats::stats_handler))
        .route("/stats/", post(stats::stats_handler))
        .route("/health", get(health::health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
