//! Aggregate stats endpoint.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use clickhouse_store::{page_views, uniques, StatsRow};
use serde::Deserialize;
use tracing::error;

use crate::response::ApiError;
use crate::state::AppState;

/// Stats request body. Missing fields take their zero values, mirroring
/// what dashboards actually send; only syntactically broken JSON is a
/// client error.
#[derive(Debug, Default, Deserialize)]
pub struct StatsRequest {
    #[serde(default)]
    pub site_id: String,
    /// Inclusive start day bucket (`YYYYMMDD`).
    #[serde(default)]
    pub start: u32,
    /// Inclusive end day bucket (`YYYYMMDD`).
    #[serde(default)]
    pub end: u32,
    /// Metric selector: `"pv"` or `"uv"`. Unknown or empty means `"pv"`.
    #[serde(default)]
    pub what: String,
}

/// POST /stats - time-bucketed aggregates.
///
/// `400` on an undecodable body, `500` with a plain-text error line when
/// the store fails, otherwise the aggregate rows verbatim.
pub async fn stats_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Vec<StatsRow>>, ApiError> {
    let request: StatsRequest =
        serde_json::from_slice(&body).map_err(|e| ApiError::bad_request(e.to_string()))?;

    let result = match request.what.as_str() {
        "uv" => uniques(&state.clickhouse, &request.site_id, request.start, request.end).await,
        _ => page_views(&state.clickhouse, &request.site_id, request.start, request.end).await,
    };

    match result {
        Ok(rows) => Ok(Json(rows)),
        Err(e) => {
            error!(site_id = %request.site_id, error = %e, "stats query failed");
            Err(ApiError::internal(e.to_string()))
        }
    }
}
