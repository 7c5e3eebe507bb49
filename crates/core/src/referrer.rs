//! Referrer host extraction.

use url::Url;

/// Extract the canonical host from a free-form referrer URL.
///
/// Returns the host part when the input is a non-empty absolute URL,
/// otherwise the empty string. Unparseable referrers are silently dropped;
/// the raw `referrer` value is stored verbatim either way.
pub fn referrer_domain(referrer: &str) -> String {
    if referrer.is_empty() {
        return String::new();
    }

    match Url::parse(referrer) {
        Ok(url) => url.host_str().unwrap_or_default().to_string(),
        Err(_) => String::new(),
    }
}
