//! Boundary to the external identity provider.
//!
//! Session and token validation happen outside this crate. An
//! [`Authenticator`] only reports who the identity layer says is signed in.

use axum::http::{HeaderMap, HeaderName};

/// Classifies a request as signed in (with a user id) or anonymous.
pub trait Authenticator: Send + Sync + std::fmt::Debug {
    /// Returns the signed-in user id, if any.
    fn authenticate(&self, headers: &HeaderMap) -> Option<String>;
}

/// Treats every request as anonymous.
#[derive(Debug, Clone, Default)]
pub struct AnonymousAuthenticator;

impl Authenticator for AnonymousAuthenticator {
    fn authenticate(&self, _headers: &HeaderMap) -> Option<String> {
        None
    }
}

/// Reads the user id from a header set by a trusted identity proxy.
///
/// Only safe behind a proxy that strips the header from client requests.
#[derive(Debug, Clone)]
pub struct TrustedHeaderAuthenticator {
    header: HeaderName,
}

impl TrustedHeaderAuthenticator {
    pub fn new(header: HeaderName) -> Self {
        Self { header }
    }
}

impl Authenticator for TrustedHeaderAuthenticator {
    fn authenticate(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get(&self.header)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_anonymous() {
        let mut headers = HeaderMap::new();
        headers.insert("x-user-id", HeaderValue::from_static("user_1"));
        assert_eq!(AnonymousAuthenticator.authenticate(&headers), None);
    }

    #[test]
    fn test_trusted_header() {
        let auth = TrustedHeaderAuthenticator::new(HeaderName::from_static("x-user-id"));

        let mut headers = HeaderMap::new();
        assert_eq!(auth.authenticate(&headers), None);

        headers.insert("x-user-id", HeaderValue::from_static("  "));
        assert_eq!(auth.authenticate(&headers), None);

        headers.insert("x-user-id", HeaderValue::from_static("user_1"));
        assert_eq!(auth.authenticate(&headers).as_deref(), Some("user_1"));
    }
}
