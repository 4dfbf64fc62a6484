//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the tenant router.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Application server that receives routed requests.
    pub upstream: UpstreamConfig,

    /// Tenant resolution settings.
    pub tenancy: TenancyConfig,

    /// Authentication gate settings.
    pub auth: AuthConfig,

    /// Which paths invoke the routing hook.
    pub matcher: MatcherConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream application server.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Upstream address (e.g., "127.0.0.1:3000").
    pub address: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Tenant resolution configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TenancyConfig {
    /// Root domain of the application. Empty disables tenant rewrites.
    pub base_domain: String,

    /// Subdomain labels that never name a tenant (e.g. "www").
    pub reserved_subdomains: Vec<String>,
}

/// Authentication gate configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Path patterns that bypass authentication.
    pub public_routes: Vec<String>,

    /// Where unauthenticated requests to protected paths are sent.
    pub sign_in_url: String,

    /// Header carrying the signed-in user id, set by an upstream identity proxy.
    /// Unset means every request is anonymous.
    pub user_header: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            public_routes: vec!["/site".to_string(), "/api/uploadthing".to_string()],
            sign_in_url: "/sign-in".to_string(),
            user_header: None,
        }
    }
}

/// Hook scope configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Patterns that always invoke the hook.
    pub include: Vec<String>,

    /// Path prefixes that never invoke the hook (framework internals).
    pub exclude_prefixes: Vec<String>,

    /// Skip paths whose last segment looks like a file (`logo.png`).
    pub skip_static_assets: bool,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            include: vec!["/".to_string(), "/api/*".to_string(), "/trpc/*".to_string()],
            exclude_prefixes: vec!["/_next".to_string()],
            skip_static_assets: true,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,

    /// Upstream response timeout in seconds.
    pub upstream_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            upstream_secs: 25,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Log output format: "pretty" or "json".
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
