//! Routing middleware.
//! Runs hook scope → access gate → router, then rewrites the URI in place.

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::config::RouterConfig;
use crate::http::request::{descriptor_from_request, request_id, rewrite_uri};
use crate::http::response;
use crate::observability::metrics;
use crate::routing::{HookScope, RequestDescriptor, Router, RoutingDecision};
use crate::security::{AccessGate, AuthContext, GateOutcome};

/// Everything needed to route one request, compiled from one config.
#[derive(Debug, Clone)]
pub struct RoutingSnapshot {
    pub scope: HookScope,
    pub gate: AccessGate,
    pub router: Router,
}

impl RoutingSnapshot {
    pub fn new(scope: HookScope, gate: AccessGate, router: Router) -> Self {
        Self { scope, gate, router }
    }

    pub fn from_config(config: &RouterConfig) -> Self {
        Self {
            scope: HookScope::from_config(&config.matcher),
            gate: AccessGate::from_config(&config.auth),
            router: Router::from_config(&config.tenancy),
        }
    }

    /// Evaluate the hook for one request without touching it.
    pub fn evaluate(&self, req: &RequestDescriptor, headers: &axum::http::HeaderMap) -> HookOutcome {
        if !self.scope.applies_to(&req.path) {
            return HookOutcome::OutOfScope;
        }

        match self.gate.check(req, headers) {
            GateOutcome::RedirectToSignIn(location) => HookOutcome::SignIn(location),
            GateOutcome::Proceed(auth) => HookOutcome::Routed {
                decision: self.router.route(req),
                auth,
            },
        }
    }
}

/// Hot-swappable routing state shared by all requests.
pub type SharedRouting = Arc<ArcSwap<RoutingSnapshot>>;

pub fn shared_routing(snapshot: RoutingSnapshot) -> SharedRouting {
    Arc::new(ArcSwap::from_pointee(snapshot))
}

/// What the hook decided for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookOutcome {
    /// The hook does not run for this path.
    OutOfScope,
    /// Anonymous request to a protected path; holds the redirect location.
    SignIn(String),
    /// Passed the gate and was routed.
    Routed {
        decision: RoutingDecision,
        auth: AuthContext,
    },
}

/// Axum middleware applying the routing hook.
///
/// On success the inner service sees the rewritten URI, with the
/// [`AuthContext`] and [`RoutingDecision`] as request extensions.
pub async fn routing_middleware(
    State(routing): State<SharedRouting>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let snapshot = routing.load_full();
    let descriptor = descriptor_from_request(&request);

    match snapshot.evaluate(&descriptor, request.headers()) {
        HookOutcome::OutOfScope => next.run(request).await,
        HookOutcome::SignIn(location) => {
            metrics::record_sign_in_redirect();
            response::sign_in_redirect(&location)
        }
        HookOutcome::Routed { decision, auth } => {
            metrics::record_decision(decision.kind());

            if let RoutingDecision::RewriteTo(target) = &decision {
                match rewrite_uri(request.uri(), target) {
                    Ok(uri) => {
                        tracing::debug!(
                            request_id = %request_id(&request),
                            from = %descriptor.path_and_query(),
                            to = %uri,
                            "Rewriting request"
                        );
                        *request.uri_mut() = uri;
                    }
                    Err(e) => {
                        // Best effort: dispatch the original URI.
                        tracing::warn!(request_id = %request_id(&request), error = %e, "Rewrite failed");
                    }
                }
            }

            request.extensions_mut().insert(auth);
            request.extensions_mut().insert(decision);
            next.run(request).await
        }
    }
}
