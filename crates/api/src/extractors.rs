//! Request metadata extraction.

use std::net::{IpAddr, SocketAddr};

use axum::http::HeaderMap;
use lantern_core::{Error, Result};

/// Determine the originating client IP for a request.
///
/// Order of precedence:
/// 1. the administrative override, returned verbatim (local development);
/// 2. `X-Forwarded-For`, taking the left of the first comma (the
///    original client, per convention);
/// 3. `X-Real-IP`;
/// 4. the transport peer address.
///
/// The winner must parse as an IPv4 or IPv6 literal. No anonymization is
/// applied here.
pub fn resolve_client_ip(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    override_ip: Option<IpAddr>,
) -> Result<IpAddr> {
    if let Some(ip) = override_ip {
        return Ok(ip);
    }

    if let Some(forwarded) = header_str(headers, "X-Forwarded-For") {
        let first = forwarded.split(',').next().unwrap_or("").trim();
        if !first.is_empty() {
            return parse_ip(first);
        }
    }

    if let Some(real_ip) = header_str(headers, "X-Real-IP") {
        let real_ip = real_ip.trim();
        if !real_ip.is_empty() {
            return parse_ip(real_ip);
        }
    }

    match peer {
        Some(addr) => Ok(addr.ip()),
        None => Err(Error::address_unparseable("no peer address")),
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn parse_ip(raw: &str) -> Result<IpAddr> {
    raw.parse()
        .map_err(|_| Error::address_unparseable(raw.to_string()))
}
