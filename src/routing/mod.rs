//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (host, path, query)
//!     → matcher.rs (is the hook in scope for this path?)
//!     → [access control gate] (security module)
//!     → tenant.rs (subdomain → tenant label)
//!     → router.rs (evaluate rewrite rules)
//!     → Return: RewriteTo(target) or PassThrough
//! ```
//!
//! # Design Decisions
//! - Router built from config, immutable at runtime
//! - No regex in hot path (exact and prefix matching only)
//! - Deterministic: same input always yields the same decision
//! - First match wins

pub mod decision;
pub mod matcher;
pub mod router;
pub mod tenant;

pub use decision::{RequestDescriptor, RoutingDecision};
pub use matcher::{HookScope, PathPattern, PatternSet};
pub use router::Router;
pub use tenant::{is_base_host, resolve_tenant, TenantId};
