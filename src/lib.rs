//! Multi-tenant request router.
//!
//! Resolves a tenant from the Host header's subdomain, gates protected paths
//! behind an external identity layer, and rewrites requests to tenant-scoped
//! or fixed application paths.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;

pub use config::RouterConfig;
pub use http::{routing_middleware, HttpServer, RoutingSnapshot};
pub use lifecycle::Shutdown;
pub use routing::{resolve_tenant, RequestDescriptor, Router, RoutingDecision, TenantId};
