//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate and propagate a unique request ID (UUID v4)
//! - Extract routing-relevant information (host, path, query)
//! - Apply a rewrite target to the request URI
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - A target without a leading `/` is rooted, so `acme/dashboard`
//!   dispatches to `/acme/dashboard`
//! - Target bytes are kept as-is: no dot-segment removal, no re-encoding
//! - Scheme and authority of the original URI are preserved

use axum::body::Body;
use axum::http::{header, uri::PathAndQuery, Request, Uri};
use thiserror::Error;

use crate::routing::RequestDescriptor;

pub use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("rewritten path is not a valid URI: {0}")]
    InvalidPath(#[from] axum::http::uri::InvalidUri),

    #[error("cannot rebuild URI: {0}")]
    InvalidParts(#[from] axum::http::uri::InvalidUriParts),
}

/// Request ID set by the request-id layer, or "unknown".
pub fn request_id(request: &Request<Body>) -> String {
    request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

/// Build the routing view of a request.
///
/// Host comes from the Host header, falling back to the URI authority
/// (HTTP/2 requests carry it as `:authority`).
pub fn descriptor_from_request(request: &Request<Body>) -> RequestDescriptor {
    let uri = request.uri();
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
        .or_else(|| uri.authority().map(|a| a.to_string()));

    RequestDescriptor {
        path: uri.path().to_string(),
        query: uri.query().unwrap_or_default().to_string(),
        host,
    }
}

/// Replace the path and query of `uri` with the rewrite `target`.
pub fn rewrite_uri(uri: &Uri, target: &str) -> Result<Uri, RewriteError> {
    let path_and_query = if target.starts_with('/') {
        target.to_string()
    } else {
        format!("/{}", target)
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(path_and_query)?);
    Ok(Uri::from_parts(parts)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_from_host_header() {
        let req = Request::builder()
            .uri("/agency/billing?plan=pro")
            .header("Host", "acme.example.com")
            .body(Body::empty())
            .unwrap();

        let d = descriptor_from_request(&req);
        assert_eq!(d.path, "/agency/billing");
        assert_eq!(d.query, "plan=pro");
        assert_eq!(d.host.as_deref(), Some("acme.example.com"));
    }

    #[test]
    fn test_descriptor_falls_back_to_authority() {
        let req = Request::builder()
            .uri("https://example.com/site")
            .body(Body::empty())
            .unwrap();
        assert_eq!(descriptor_from_request(&req).host.as_deref(), Some("example.com"));

        let req = Request::builder().uri("/site").body(Body::empty()).unwrap();
        assert_eq!(descriptor_from_request(&req).host, None);
    }

    #[test]
    fn test_relative_target_resolves_from_root() {
        let uri: Uri = "/dashboard".parse().unwrap();
        assert_eq!(rewrite_uri(&uri, "acme/dashboard").unwrap(), "/acme/dashboard");

        let uri: Uri = "/deeply/nested/page".parse().unwrap();
        assert_eq!(rewrite_uri(&uri, "acme/deeply/nested/page").unwrap(), "/acme/deeply/nested/page");
    }

    #[test]
    fn test_target_query_is_kept() {
        let uri: Uri = "/agency/billing?plan=pro".parse().unwrap();
        let rewritten = rewrite_uri(&uri, "/agency/billing?plan=pro").unwrap();
        assert_eq!(rewritten.path(), "/agency/billing");
        assert_eq!(rewritten.query(), Some("plan=pro"));
    }

    #[test]
    fn test_query_dropped_when_target_has_none() {
        let uri: Uri = "/sign-up?ref=ad".parse().unwrap();
        assert_eq!(rewrite_uri(&uri, "/agency/sign-in").unwrap(), "/agency/sign-in");
    }

    #[test]
    fn test_identity_rewrite_is_byte_identical() {
        for raw in [
            "/agency/x?name=o'brien",
            "/agency/a/./b/../c",
            "/agency/%7e{id}",
            "/subaccount/7?q=a%20b&r=c+d",
        ] {
            let uri: Uri = raw.parse().unwrap();
            let rewritten = rewrite_uri(&uri, raw).unwrap();
            assert_eq!(rewritten.to_string(), raw);
        }
    }

    #[test]
    fn test_invalid_target_is_an_error() {
        let uri: Uri = "/x".parse().unwrap();
        assert!(matches!(rewrite_uri(&uri, "/a b"), Err(RewriteError::InvalidPath(_))));
    }

    #[test]
    fn test_absolute_uri_keeps_authority() {
        let uri: Uri = "http://acme.example.com/x".parse().unwrap();
        let rewritten = rewrite_uri(&uri, "acme/x").unwrap();
        assert_eq!(rewritten.authority().map(|a| a.as_str()), Some("acme.example.com"));
        assert_eq!(rewritten.path(), "/acme/x");
    }
}
