//! Authentication gate.
//! Lets public routes through, redirects anonymous requests for protected ones.

use axum::http::{HeaderMap, HeaderName};
use std::fmt;
use std::sync::Arc;
use url::form_urlencoded;

use crate::config::AuthConfig;
use crate::routing::{PathPattern, PatternSet, RequestDescriptor};
use crate::security::authenticator::{AnonymousAuthenticator, Authenticator, TrustedHeaderAuthenticator};

/// Callback run before authentication. Observes the request only.
pub type BeforeAuth = Arc<dyn Fn(&RequestDescriptor) + Send + Sync>;

/// Context attached to requests that passed the gate.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: Option<String>,
    pub is_public_route: bool,
}

impl AuthContext {
    pub fn is_signed_in(&self) -> bool {
        self.user_id.is_some()
    }
}

/// Result of running the gate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateOutcome {
    /// Continue to the router.
    Proceed(AuthContext),
    /// Send the client to sign in; holds the `Location` value.
    RedirectToSignIn(String),
}

/// Classifies requests as public or protected and enforces sign-in.
#[derive(Clone)]
pub struct AccessGate {
    public_routes: PatternSet,
    sign_in_url: String,
    authenticator: Arc<dyn Authenticator>,
    before_auth: Option<BeforeAuth>,
}

impl AccessGate {
    pub fn new(mut public_routes: PatternSet, sign_in_url: impl Into<String>, authenticator: Arc<dyn Authenticator>) -> Self {
        let sign_in_url = sign_in_url.into();
        // The sign-in page itself must stay reachable.
        let sign_in_path = sign_in_url.split('?').next().unwrap_or_default();
        public_routes.push(PathPattern::Exact(sign_in_path.to_string()));

        Self {
            public_routes,
            sign_in_url,
            authenticator,
            before_auth: None,
        }
    }

    /// Build the gate from config. Anonymous unless `user_header` is set.
    pub fn from_config(config: &AuthConfig) -> Self {
        let authenticator: Arc<dyn Authenticator> = match config
            .user_header
            .as_deref()
            .and_then(|h| HeaderName::from_bytes(h.as_bytes()).ok())
        {
            Some(header) => Arc::new(TrustedHeaderAuthenticator::new(header)),
            None => Arc::new(AnonymousAuthenticator),
        };

        Self::new(
            PatternSet::new(&config.public_routes),
            config.sign_in_url.clone(),
            authenticator,
        )
    }

    pub fn with_before_auth(mut self, hook: BeforeAuth) -> Self {
        self.before_auth = Some(hook);
        self
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.public_routes.matches(path)
    }

    /// Run the gate for one request.
    pub fn check(&self, req: &RequestDescriptor, headers: &HeaderMap) -> GateOutcome {
        if let Some(hook) = &self.before_auth {
            hook(req);
        }

        let user_id = self.authenticator.authenticate(headers);
        let is_public_route = self.is_public(&req.path);

        if user_id.is_none() && !is_public_route {
            tracing::debug!(path = %req.path, "Anonymous request to protected route");
            return GateOutcome::RedirectToSignIn(self.sign_in_location(req));
        }

        GateOutcome::Proceed(AuthContext {
            user_id,
            is_public_route,
        })
    }

    fn sign_in_location(&self, req: &RequestDescriptor) -> String {
        let separator = if self.sign_in_url.contains('?') { '&' } else { '?' };
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("redirect_url", &req.path_and_query())
            .finish();
        format!("{}{}{}", self.sign_in_url, separator, query)
    }
}

impl fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessGate")
            .field("public_routes", &self.public_routes)
            .field("sign_in_url", &self.sign_in_url)
            .field("authenticator", &self.authenticator)
            .field("before_auth", &self.before_auth.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn gate() -> AccessGate {
        let mut config = AuthConfig::default();
        config.user_header = Some("x-user-id".into());
        AccessGate::from_config(&config)
    }

    fn signed_in() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-user-id", HeaderValue::from_static("user_1"));
        headers
    }

    #[test]
    fn test_public_route_is_anonymous_ok() {
        let outcome = gate().check(&RequestDescriptor::new("/site"), &HeaderMap::new());
        assert_eq!(
            outcome,
            GateOutcome::Proceed(AuthContext {
                user_id: None,
                is_public_route: true
            })
        );
    }

    #[test]
    fn test_sign_in_page_is_always_public() {
        let outcome = gate().check(&RequestDescriptor::new("/sign-in"), &HeaderMap::new());
        assert!(matches!(outcome, GateOutcome::Proceed(_)));
    }

    #[test]
    fn test_protected_route_redirects() {
        let req = RequestDescriptor::new("/agency/billing").with_query("plan=pro");
        let outcome = gate().check(&req, &HeaderMap::new());
        assert_eq!(
            outcome,
            GateOutcome::RedirectToSignIn("/sign-in?redirect_url=%2Fagency%2Fbilling%3Fplan%3Dpro".into())
        );
    }

    #[test]
    fn test_signed_in_user_proceeds() {
        let outcome = gate().check(&RequestDescriptor::new("/agency"), &signed_in());
        match outcome {
            GateOutcome::Proceed(ctx) => {
                assert!(ctx.is_signed_in());
                assert!(!ctx.is_public_route);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_sign_in_url_with_query() {
        let gate = AccessGate::new(
            PatternSet::default(),
            "/login?theme=dark",
            Arc::new(AnonymousAuthenticator),
        );
        assert!(gate.is_public("/login"));
        let outcome = gate.check(&RequestDescriptor::new("/x"), &HeaderMap::new());
        assert_eq!(
            outcome,
            GateOutcome::RedirectToSignIn("/login?theme=dark&redirect_url=%2Fx".into())
        );
    }

    #[test]
    fn test_before_auth_runs_once_per_check() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();
        let gate = gate().with_before_auth(Arc::new(move |_req: &RequestDescriptor| {
            c.fetch_add(1, Ordering::SeqCst);
        }));

        gate.check(&RequestDescriptor::new("/site"), &HeaderMap::new());
        gate.check(&RequestDescriptor::new("/agency"), &HeaderMap::new());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
