//! Client address resolution.

use std::net::{IpAddr, SocketAddr};

use axum::http::HeaderMap;

/// Resolves the client IP.
///
/// With `behind_proxy`, the first `X-Forwarded-For` entry wins, then
/// `X-Real-IP`. Header values that are not IP addresses are ignored.
/// Falls back to the socket peer.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>, behind_proxy: bool) -> Option<String> {
    if behind_proxy {
        let forwarded = header_str(headers, "x-forwarded-for")
            .and_then(|v| v.split(',').next())
            .and_then(parse_ip);
        if let Some(ip) = forwarded {
            return Some(ip.to_string());
        }

        if let Some(ip) = header_str(headers, "x-real-ip").and_then(parse_ip) {
            return Some(ip.to_string());
        }
    }

    peer.map(|addr| addr.ip().to_string())
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn parse_ip(value: &str) -> Option<IpAddr> {
    value.trim().parse().ok()
}
