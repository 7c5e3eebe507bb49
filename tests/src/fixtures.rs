//! Beacon fixtures and payload encoding helpers.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// A desktop Chrome user agent, classified as Chrome / Mac OSX / desktop.
pub const CHROME_MAC_UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/129.0.0.0 Safari/537.36";

/// A page-view beacon for `/` with an anonymous visitor.
pub fn page_view(site_id: &str) -> serde_json::Value {
    beacon(site_id, "page", "", "/", "Page views", "")
}

/// A page-view beacon with an explicit visitor identity.
pub fn page_view_as(site_id: &str, identity: &str) -> serde_json::Value {
    beacon(site_id, "page", identity, "/", "Page views", "")
}

/// A page-view beacon carrying a referrer URL.
pub fn page_view_from(site_id: &str, referrer: &str) -> serde_json::Value {
    beacon(site_id, "page", "", "/", "Page views", referrer)
}

/// A fully specified beacon envelope.
pub fn beacon(
    site_id: &str,
    event_type: &str,
    identity: &str,
    event: &str,
    category: &str,
    referrer: &str,
) -> serde_json::Value {
    serde_json::json!({
        "site_id": site_id,
        "tracking": {
            "type": event_type,
            "identity": identity,
            "isTouch": false,
            "ua": CHROME_MAC_UA,
            "event": event,
            "category": category,
            "referrer": referrer,
        }
    })
}

/// Encode a beacon the way the browser script does: JSON, then base64
/// with the standard alphabet.
pub fn encode(payload: &serde_json::Value) -> String {
    STANDARD.encode(payload.to_string())
}
