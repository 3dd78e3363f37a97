use std::net::IpAddr;

use axum::http::HeaderMap;
use ipnet::IpNet;

/// Prefix under which stored images are served.
pub const IMAGES_PATH: &str = "/images";

/// Absolute (or, failing that, root-relative) link to a stored image.
///
/// A configured base wins. Otherwise the base comes from the request's `Host`,
/// or from `X-Forwarded-Host`/`X-Forwarded-Proto` when `peer` is a trusted proxy.
pub fn image_url(
    configured_base: Option<&str>,
    headers: &HeaderMap,
    peer: IpAddr,
    trusted_proxies: &[IpNet],
    key: &str,
) -> String {
    let base = match configured_base {
        Some(base) => base.trim_end_matches('/').to_string(),
        None => request_base(headers, is_trusted(peer, trusted_proxies)).unwrap_or_default(),
    };
    format!("{base}{IMAGES_PATH}/{key}")
}

fn is_trusted(peer: IpAddr, trusted_proxies: &[IpNet]) -> bool {
    trusted_proxies.iter().any(|net| net.contains(&peer))
}

fn request_base(headers: &HeaderMap, trust_forwarded: bool) -> Option<String> {
    let forwarded_host = trust_forwarded
        .then(|| header_first(headers, "x-forwarded-host"))
        .flatten();
    let host = forwarded_host.or_else(|| header_first(headers, "host"))?;

    let scheme = trust_forwarded
        .then(|| header_first(headers, "x-forwarded-proto"))
        .flatten()
        .filter(|p| p == "http" || p == "https")
        .unwrap_or_else(|| "http".to_string());
    Some(format!("{scheme}://{host}"))
}

fn header_first(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
