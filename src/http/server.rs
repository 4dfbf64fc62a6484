//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the routing middleware and proxy handler
//! - Wire up middleware (request ID, tracing, timeout)
//! - Forward routed requests to the upstream application
//! - Apply configuration updates without dropping connections
//! - Observability (metrics, correlation IDs)

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::{
        uri::{Authority, PathAndQuery, Scheme},
        Request, Uri,
    },
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::RouterConfig;
use crate::http::middleware::{routing_middleware, shared_routing, RoutingSnapshot, SharedRouting};
use crate::http::request::{request_id, MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use crate::http::response;
use crate::observability::metrics;

/// Path answered by the router itself, outside the routing hook.
pub const HEALTH_PATH: &str = "/_router/health";

/// Errors forwarding a request upstream.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("invalid upstream address {0:?}")]
    InvalidUpstream(String),

    #[error("cannot build upstream URI: {0}")]
    Uri(#[from] axum::http::uri::InvalidUriParts),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),

    #[error("upstream timed out after {0:?}")]
    Timeout(Duration),
}

/// Where routed requests go.
#[derive(Debug, Clone)]
pub struct Upstream {
    pub authority: Authority,
    pub timeout: Duration,
}

impl Upstream {
    pub fn from_config(config: &RouterConfig) -> Result<Self, ForwardError> {
        let authority = Authority::from_str(&config.upstream.address)
            .map_err(|_| ForwardError::InvalidUpstream(config.upstream.address.clone()))?;
        Ok(Self {
            authority,
            timeout: Duration::from_secs(config.timeouts.upstream_secs),
        })
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<ArcSwap<Upstream>>,
    pub client: Client<HttpConnector, Body>,
}

/// HTTP server for the tenant router.
pub struct HttpServer {
    app: Router,
    config: RouterConfig,
    routing: SharedRouting,
    upstream: Arc<ArcSwap<Upstream>>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Fails only if the upstream address is unusable.
    pub fn new(config: RouterConfig) -> Result<Self, ForwardError> {
        Self::with_snapshot(RoutingSnapshot::from_config(&config), config)
    }

    /// Like [`HttpServer::new`] but with a prebuilt snapshot, e.g. one whose
    /// gate uses a custom authenticator.
    pub fn with_snapshot(snapshot: RoutingSnapshot, config: RouterConfig) -> Result<Self, ForwardError> {
        let routing = shared_routing(snapshot);
        let upstream = Arc::new(ArcSwap::from_pointee(Upstream::from_config(&config)?));

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState {
            upstream: upstream.clone(),
            client,
        };

        let app = Self::build_router(&config, routing.clone(), state);
        Ok(Self {
            app,
            config,
            routing,
            upstream,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RouterConfig, routing: SharedRouting, state: AppState) -> Router {
        let proxied = Router::new()
            .fallback(proxy_handler)
            .with_state(state)
            .layer(from_fn_with_state(routing, routing_middleware));

        Router::new()
            .route(HEALTH_PATH, get(|| async { "ok" }))
            .fallback_service(proxied)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    /// The Axum application, for embedding or in-process testing.
    pub fn app(&self) -> Router {
        self.app.clone()
    }

    /// Run the server until `shutdown` fires, applying config updates as they arrive.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<RouterConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.address,
            base_domain = %self.config.tenancy.base_domain,
            "HTTP server starting"
        );

        let routing = self.routing.clone();
        let upstream = self.upstream.clone();
        tokio::spawn(async move {
            while let Some(new_config) = config_updates.recv().await {
                apply_config(&routing, &upstream, &new_config);
            }
        });

        axum::serve(listener, self.app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the startup config.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }
}

fn apply_config(routing: &SharedRouting, upstream: &Arc<ArcSwap<Upstream>>, config: &RouterConfig) {
    match Upstream::from_config(config) {
        Ok(new_upstream) => {
            routing.store(Arc::new(RoutingSnapshot::from_config(config)));
            upstream.store(Arc::new(new_upstream));
            tracing::info!(
                base_domain = %config.tenancy.base_domain,
                upstream = %config.upstream.address,
                "Configuration reloaded"
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "Rejected configuration update. Keeping current configuration.");
        }
    }
}

/// Forwards the (possibly rewritten) request to the upstream application.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&request);
    let method = request.method().to_string();
    let upstream = state.upstream.load_full();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        uri = %request.uri(),
        upstream = %upstream.authority,
        "Forwarding request"
    );

    match forward(&state.client, &upstream, request).await {
        Ok(res) => {
            metrics::record_request(&method, res.status().as_u16(), start_time);
            res
        }
        Err(ForwardError::Timeout(after)) => {
            tracing::warn!(request_id = %request_id, after = ?after, "Upstream timed out");
            metrics::record_request(&method, 504, start_time);
            response::gateway_timeout()
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Upstream error");
            metrics::record_request(&method, 502, start_time);
            response::bad_gateway()
        }
    }
}

async fn forward(
    client: &Client<HttpConnector, Body>,
    upstream: &Upstream,
    request: Request<Body>,
) -> Result<Response, ForwardError> {
    let (mut parts, body) = request.into_parts();

    // The Host header is left as the client sent it; only the URI changes.
    let mut uri_parts = parts.uri.clone().into_parts();
    uri_parts.scheme = Some(Scheme::HTTP);
    uri_parts.authority = Some(upstream.authority.clone());
    if uri_parts.path_and_query.is_none() {
        uri_parts.path_and_query = Some(PathAndQuery::from_static("/"));
    }
    parts.uri = Uri::from_parts(uri_parts)?;

    let upstream_request = Request::from_parts(parts, body);
    let response = tokio::time::timeout(upstream.timeout, client.request(upstream_request))
        .await
        .map_err(|_| ForwardError::Timeout(upstream.timeout))??;

    Ok(response.map(Body::new).into_response())
}
