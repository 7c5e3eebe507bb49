//! Beacon ingest endpoint.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Query, State};
use axum::http::{HeaderMap, StatusCode};
use lantern_core::{decode_payload, referrer_domain, EnrichedEvent};
use serde::Deserialize;
use telemetry::metrics;
use tracing::warn;

use crate::extractors::resolve_client_ip;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct TrackParams {
    pub data: Option<String>,
}

/// GET /track - beacon ingest.
///
/// Fire-and-forget: the browser treats the response as an image load, so
/// the status is `200 OK` with an empty body on every path. Malformed
/// payloads and unparseable addresses are logged and dropped; geo
/// failures degrade to empty fields. The enqueue is non-blocking.
pub async fn track_handler(
    State(state): State<AppState>,
    Query(params): Query<TrackParams>,
    headers: HeaderMap,
    peer: Option<ConnectInfo<SocketAddr>>,
) -> StatusCode {
    let Some(raw) = params.data else {
        metrics().beacons_rejected.inc();
        warn!("beacon without data parameter");
        return StatusCode::OK;
    };

    let beacon = match decode_payload(&raw) {
        Ok(beacon) => beacon,
        Err(e) => {
            metrics().beacons_rejected.inc();
            warn!(error = %e, "undecodable beacon payload");
            return StatusCode::OK;
        }
    };

    let ua = state.ua.classify(&beacon.tracking.ua);

    let ip = match resolve_client_ip(&headers, peer.map(|ConnectInfo(addr)| addr), state.ip_override)
    {
        Ok(ip) => ip,
        Err(e) => {
            metrics().beacons_rejected.inc();
            warn!(error = %e, "could not resolve client address");
            return StatusCode::OK;
        }
    };

    let geo = state.geo.lookup_or_default(ip).await;

    let tracking = beacon.tracking;
    let event = EnrichedEvent {
        site_id: beacon.site_id,
        event_type: tracking.event_type,
        user_id: tracking.identity,
        event: tracking.event,
        category: tracking.category,
        referrer_domain: referrer_domain(&tracking.referrer),
        referrer: tracking.referrer,
        is_touch: tracking.is_touch,
        browser_name: ua.browser,
        os_name: ua.os,
        device_type: ua.device,
        country: geo.country,
        region: geo.region_name,
    };

    state.queue.enqueue(event);

    StatusCode::OK
}
