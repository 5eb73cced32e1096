//! URL and header plumbing.
//!
//! The service URL is configured once; every endpoint is derived from it
//! by appending path segments. The push socket lives at the same place as
//! `GET /status`, on the matching socket scheme.

use url::Url;

use crate::ProtocolError;

/// Parses and checks a service base URL. Only `http` and `https` are
/// accepted, and a host is required.
///
/// # Errors
/// Returns [`ProtocolError::InvalidUrl`] for unparsable input, other
/// schemes, or a missing host.
pub fn normalize_base(raw: &str) -> Result<Url, ProtocolError> {
    let url = Url::parse(raw).map_err(|e| ProtocolError::InvalidUrl(format!("{raw}: {e}")))?;
    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ProtocolError::InvalidUrl(format!(
                "{raw}: unsupported scheme {other}"
            )));
        }
    }
    if url.host_str().is_none() {
        return Err(ProtocolError::InvalidUrl(format!("{raw}: missing host")));
    }
    Ok(url)
}

/// Joins `segments` onto `base` with single slashes: `{base}/{a}/{b}`.
pub fn endpoint(base: &Url, segments: &[&str]) -> String {
    let root = base.as_str().trim_end_matches('/');
    if segments.is_empty() {
        return root.to_string();
    }
    format!("{root}/{}", segments.join("/"))
}

/// Derives the push socket URL from the service base URL.
///
/// `https` maps to `wss`, anything else to `ws`. Host, explicit port and
/// path are kept, and `/status` is appended.
///
/// ```rust
/// let base = ooth_protocol::urls::normalize_base("https://auth.example.com/auth").unwrap();
/// assert_eq!(
///     ooth_protocol::urls::push_status_url(&base),
///     "wss://auth.example.com/auth/status"
/// );
/// ```
pub fn push_status_url(base: &Url) -> String {
    let scheme = if base.scheme() == "https" { "wss" } else { "ws" };
    let host = base.host_str().unwrap_or_default();
    let port = base.port().map(|p| format!(":{p}")).unwrap_or_default();
    let path = base.path().trim_end_matches('/');
    format!("{scheme}://{host}{port}{path}/status")
}

/// Serializes cookie pairs into a `Cookie` header value: `k1=v1; k2=v2`.
/// Pairs keep their input order.
pub fn cookie_header<K, V>(pairs: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k.as_ref(), v.as_ref()))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(raw: &str) -> Url {
        normalize_base(raw).expect("valid base url")
    }

    // =====================================================================
    // normalize_base()
    // =====================================================================

    #[test]
    fn test_normalize_base_accepts_http_and_https() {
        assert!(normalize_base("http://localhost:3000").is_ok());
        assert!(normalize_base("https://auth.example.com/auth").is_ok());
    }

    #[test]
    fn test_normalize_base_rejects_other_schemes() {
        let err = normalize_base("ftp://auth.example.com").unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidUrl(m) if m.contains("ftp")));
    }

    #[test]
    fn test_normalize_base_rejects_garbage() {
        assert!(matches!(
            normalize_base("not a url"),
            Err(ProtocolError::InvalidUrl(_))
        ));
    }

    // =====================================================================
    // endpoint()
    // =====================================================================

    #[test]
    fn test_endpoint_on_bare_host() {
        let b = base("https://auth.example.com");
        assert_eq!(
            endpoint(&b, &["local", "login"]),
            "https://auth.example.com/local/login"
        );
        assert_eq!(endpoint(&b, &["status"]), "https://auth.example.com/status");
    }

    #[test]
    fn test_endpoint_keeps_base_path_without_double_slash() {
        let b = base("http://localhost:3000/auth/");
        assert_eq!(endpoint(&b, &["logout"]), "http://localhost:3000/auth/logout");
    }

    #[test]
    fn test_endpoint_without_segments_is_base() {
        let b = base("https://auth.example.com/auth");
        assert_eq!(endpoint(&b, &[]), "https://auth.example.com/auth");
    }

    // =====================================================================
    // push_status_url()
    // =====================================================================

    #[test]
    fn test_push_url_https_maps_to_wss() {
        let b = base("https://auth.example.com");
        assert_eq!(push_status_url(&b), "wss://auth.example.com/status");
    }

    #[test]
    fn test_push_url_http_maps_to_ws_and_keeps_port_and_path() {
        let b = base("http://localhost:3000/auth");
        assert_eq!(push_status_url(&b), "ws://localhost:3000/auth/status");
    }

    #[test]
    fn test_push_url_drops_default_port() {
        // `Url` normalizes away the scheme's default port.
        let b = base("https://auth.example.com:443/");
        assert_eq!(push_status_url(&b), "wss://auth.example.com/status");
    }

    // =====================================================================
    // cookie_header()
    // =====================================================================

    #[test]
    fn test_cookie_header_single_pair() {
        assert_eq!(cookie_header(&[("sid", "abc")]), "sid=abc");
    }

    #[test]
    fn test_cookie_header_multiple_pairs_in_order() {
        let pairs = vec![("b".to_string(), "2".to_string()), ("a".into(), "1".into())];
        assert_eq!(cookie_header(&pairs), "b=2; a=1");
    }

    #[test]
    fn test_cookie_header_empty() {
        let pairs: [(&str, &str); 0] = [];
        assert_eq!(cookie_header(&pairs), "");
    }
}
