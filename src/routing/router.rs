//! Rewrite rule evaluation.
//!
//! # Responsibilities
//! - Evaluate the rewrite rules in precedence order
//! - Return exactly one decision per request
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - First match wins; no match is an explicit `PassThrough`
//! - Pure string work: no I/O, never fails

use crate::config::TenancyConfig;
use crate::routing::decision::{RequestDescriptor, RoutingDecision};
use crate::routing::tenant::{is_base_host, resolve_tenant, TenantId};

const SIGN_IN_PATHS: [&str; 2] = ["/sign-in", "/sign-up"];
const SIGN_IN_TARGET: &str = "/agency/sign-in";
const SITE_PATH: &str = "/site";
const APP_PREFIXES: [&str; 2] = ["/agency", "/subaccount"];

/// Host-based request router.
#[derive(Debug, Clone)]
pub struct Router {
    base_domain: String,
    reserved_subdomains: Vec<String>,
}

impl Router {
    pub fn new(base_domain: impl Into<String>) -> Self {
        Self {
            base_domain: base_domain.into(),
            reserved_subdomains: Vec::new(),
        }
    }

    pub fn from_config(config: &TenancyConfig) -> Self {
        Self {
            base_domain: config.base_domain.clone(),
            reserved_subdomains: config
                .reserved_subdomains
                .iter()
                .map(|s| s.to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn base_domain(&self) -> &str {
        &self.base_domain
    }

    /// Tenant for this request, skipping reserved labels such as `www`.
    pub fn tenant_for(&self, req: &RequestDescriptor) -> Option<TenantId> {
        resolve_tenant(req.host.as_deref(), &self.base_domain)
            .filter(|t| !self.reserved_subdomains.iter().any(|r| r == t.as_str()))
    }

    /// Decide how to dispatch `req`.
    pub fn route(&self, req: &RequestDescriptor) -> RoutingDecision {
        if let Some(tenant) = self.tenant_for(req) {
            return RoutingDecision::RewriteTo(format!("{}{}", tenant, req.path_and_query()));
        }

        let path = req.path.as_str();

        if SIGN_IN_PATHS.contains(&path) {
            return RoutingDecision::RewriteTo(SIGN_IN_TARGET.to_string());
        }

        if path == "/" || (path == SITE_PATH && is_base_host(req.host.as_deref(), &self.base_domain)) {
            return RoutingDecision::RewriteTo(SITE_PATH.to_string());
        }

        if APP_PREFIXES.iter().any(|p| path.starts_with(p)) {
            return RoutingDecision::RewriteTo(req.path_and_query());
        }

        RoutingDecision::PassThrough
    }
}
