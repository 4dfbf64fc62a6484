//! HTTP middleware.

pub mod routing;

pub use routing::{routing_middleware, shared_routing, HookOutcome, RoutingSnapshot, SharedRouting};
