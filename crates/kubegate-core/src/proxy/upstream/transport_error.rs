//! Mapping of reqwest transport failures to [`ProxyError`].

use std::error::Error as StdError;
use std::time::Duration;

use kubegate_types::ProxyError;

/// Markers found in rustls error chains on handshake or certificate failures.
const TLS_MARKERS: &[&str] =
    &["certificate", "Certificate", "UnknownIssuer", "fatal alert", "HandshakeFailure", "handshake"];

/// Display and Debug text of every source below the top-level error. The
/// top-level message embeds the request URL, which is left out.
fn source_chain(error: &reqwest::Error) -> String {
    let mut parts = Vec::new();
    let mut source = error.source();
    while let Some(inner) = source {
        parts.push(inner.to_string());
        parts.push(format!("{:?}", inner));
        source = inner.source();
    }
    parts.join(": ")
}

fn is_tls_failure(chain: &str) -> bool {
    TLS_MARKERS.iter().any(|marker| chain.contains(marker))
}

/// Classify a failed upstream call.
///
/// Order matters: a TLS handshake failure is also reported as a connect
/// error by reqwest, so it is checked first.
pub fn classify_transport_error(error: &reqwest::Error, timeout: Duration) -> ProxyError {
    if error.is_timeout() {
        return ProxyError::UpstreamTimeout { duration_secs: timeout.as_secs() };
    }

    let chain = source_chain(error);
    let message = format!("{}: {}", error, chain);

    if is_tls_failure(&chain) {
        return ProxyError::TlsTrustFailure { message };
    }

    if error.is_connect() {
        return ProxyError::UpstreamUnreachable { message };
    }

    ProxyError::Transport { message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tls_markers() {
        assert!(is_tls_failure("invalid peer certificate: UnknownIssuer"));
        assert!(is_tls_failure("received fatal alert: HandshakeFailure"));
        assert!(!is_tls_failure("tcp connect error: Connection refused (os error 111)"));
    }

    #[tokio::test]
    async fn test_refused_is_unreachable() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind free port");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);

        let err = reqwest::Client::new()
            .get(format!("http://{}/api", addr))
            .send()
            .await
            .expect_err("nothing listens on the freed port");

        let mapped = classify_transport_error(&err, Duration::from_secs(5));
        assert!(matches!(mapped, ProxyError::UpstreamUnreachable { .. }), "{:?}", mapped);
        assert_eq!(mapped.http_status_code(), 502);
    }
}
