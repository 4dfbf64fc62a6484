//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, timeout)
//!     → middleware/routing.rs (scope → gate → router, URI rewrite)
//!     → server.rs proxy handler (forward to upstream app)
//!     → response.rs (router-generated responses: redirects, 502/504)
//!     → Send to client
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use middleware::{routing_middleware, shared_routing, RoutingSnapshot, SharedRouting};
pub use request::X_REQUEST_ID;
pub use server::HttpServer;
