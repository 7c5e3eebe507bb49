//! Beacon wire format and payload codec.
//!
//! The browser tracking script emits a fire-and-forget GET whose `data`
//! query parameter is the base64 of a JSON envelope: an outer object
//! carrying `site_id`, wrapping the `tracking` block recorded by the
//! script. The codec decodes that parameter into typed form and rejects
//! payloads that are not plausibly beacon-shaped.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The category label the browser script uses to mark page views.
///
/// Carries meaning only on the browser side: beacons with this category
/// are sent with `type = "page"`. The server stores both verbatim and
/// does not cross-check them.
pub const PAGE_VIEW_CATEGORY: &str = "Page views";

/// The inner tracking block recorded by the browser script.
///
/// Every field defaults to empty/false when absent; only the envelope
/// fields are mandatory. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackingData {
    /// Event discriminator, `"page"` or `"event"` by convention.
    #[serde(rename = "type", default)]
    pub event_type: String,
    /// Opaque visitor token persisted by the browser. May be empty.
    #[serde(default)]
    pub identity: String,
    /// Raw user-agent string as seen by the script.
    #[serde(default)]
    pub ua: String,
    /// Page path for page views, event name otherwise.
    #[serde(default)]
    pub event: String,
    /// Free-form label; see [`PAGE_VIEW_CATEGORY`].
    #[serde(default)]
    pub category: String,
    /// Free-form referrer URL. May be empty.
    #[serde(default)]
    pub referrer: String,
    #[serde(rename = "isTouch", default)]
    pub is_touch: bool,
}

/// The beacon envelope: a site tag wrapping one tracking record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Beacon {
    /// Opaque tenant tag chosen by the dashboard operator. Not validated
    /// against the metadata database here.
    pub site_id: String,
    pub tracking: TrackingData,
}

/// Decode the `data` query parameter into a [`Beacon`].
///
/// Rejects empty input, non-base64 input (standard alphabet, padded),
/// non-JSON payloads, and envelopes missing `site_id` or `tracking`.
pub fn decode_payload(raw: &str) -> Result<Beacon> {
    if raw.is_empty() {
        return Err(Error::decode("empty payload"));
    }

    let bytes = STANDARD
        .decode(raw)
        .map_err(|e| Error::decode(format!("invalid base64: {e}")))?;

    serde_json::from_slice(&bytes).map_err(|e| Error::decode(format!("invalid payload: {e}")))
}
