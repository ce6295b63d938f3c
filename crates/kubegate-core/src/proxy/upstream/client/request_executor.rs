use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use url::Url;

use kubegate_types::ProxyError;

use crate::proxy::common::header_constants::is_hop_by_hop;

/// Join the upstream base (keeping any base path) with the inbound path and
/// query, both unchanged.
pub fn build_url(base: &Url, path: &str, query: Option<&str>) -> String {
    let base = base.as_str().trim_end_matches('/');
    match query {
        Some(qs) => format!("{}{}?{}", base, path, qs),
        None => format!("{}{}", base, path),
    }
}

/// Parse the joined upstream URL and make sure parsing kept the path as
/// sent. Anything the parser would rewrite (dot segments, backslashes) is
/// refused as an unmatched route.
pub fn resolve_upstream_url(base: &Url, path: &str, query: Option<&str>) -> Result<Url, ProxyError> {
    let url = Url::parse(&build_url(base, path, query)).map_err(|e| ProxyError::Internal {
        message: format!("cannot build upstream URL: {}", e),
    })?;

    let expected = format!("{}{}", base.path().trim_end_matches('/'), path);
    if url.path() != expected {
        return Err(ProxyError::RouteNotFound { path: path.to_string() });
    }

    Ok(url)
}

/// Names listed in the `Connection` header(s). These are connection-scoped
/// just like the fixed hop-by-hop set.
fn connection_nominated(headers: &HeaderMap) -> Vec<HeaderName> {
    headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect()
}

fn strip_hop_by_hop(headers: &HeaderMap) -> HeaderMap {
    let nominated = connection_nominated(headers);
    let mut out = HeaderMap::with_capacity(headers.len());

    for (name, value) in headers {
        if is_hop_by_hop(name.as_str()) || nominated.contains(name) {
            continue;
        }
        out.append(name.clone(), value.clone());
    }

    out
}

/// Headers for the upstream request.
///
/// Any client `Authorization` is dropped and replaced by `authorization`.
/// `Host` and `Content-Length` are left to the HTTP client.
pub fn build_request_headers(inbound: &HeaderMap, authorization: &HeaderValue) -> HeaderMap {
    let mut headers = strip_hop_by_hop(inbound);
    headers.remove(header::HOST);
    headers.remove(header::CONTENT_LENGTH);
    headers.remove(header::AUTHORIZATION);
    headers.insert(header::AUTHORIZATION, authorization.clone());
    headers
}

/// Headers relayed back to the client: everything but the hop-by-hop set.
/// `Content-Length` is kept; the body bytes are relayed undecoded, so the
/// declared length still holds (and HEAD answers keep it).
pub fn build_response_headers(upstream: &HeaderMap) -> HeaderMap {
    strip_hop_by_hop(upstream)
}
