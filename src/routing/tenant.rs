//! Tenant resolution from the Host header.
//!
//! # Responsibilities
//! - Subtract the base domain from the host to recover the subdomain label
//! - Reject hosts that are not under the base domain
//! - Reject labels that are not DNS labels
//!
//! # Design Decisions
//! - Exact suffix match on `"." + base_domain`; a host outside the base
//!   domain never becomes a tenant
//! - Host comparison is case-insensitive (per HTTP spec), labels are lowercased
//! - A port on the host is ignored unless the base domain carries one
//! - A trailing root dot (`example.com.`) is ignored
//! - The label ends up in a dispatch path, so only `[a-z0-9-]` labels
//!   separated by `.` are accepted
//! - Derived per request, never cached

use std::fmt;

/// A tenant label recovered from the Host header (e.g. `acme`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TenantId(String);

impl TenantId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolve the tenant for a host under `base_domain`.
///
/// Returns `None` when the host is absent, equal to the base domain, outside
/// the base domain, not made of DNS labels, or when the base domain is empty
/// (tenancy disabled).
pub fn resolve_tenant(host: Option<&str>, base_domain: &str) -> Option<TenantId> {
    let base = normalize_base(base_domain)?;
    let host = normalize_host(host?, &base);

    let label = host.strip_suffix(base.as_str())?.strip_suffix('.')?;
    if !label.split('.').all(is_dns_label) {
        return None;
    }

    Some(TenantId(label.to_string()))
}

/// Returns true if `host` is the base domain itself, normalized the same way
/// as for tenant resolution.
pub fn is_base_host(host: Option<&str>, base_domain: &str) -> bool {
    match (host, normalize_base(base_domain)) {
        (Some(host), Some(base)) => normalize_host(host, &base) == base,
        _ => false,
    }
}

fn normalize_base(base_domain: &str) -> Option<String> {
    let base = base_domain.trim().trim_end_matches('.').to_ascii_lowercase();
    (!base.is_empty()).then_some(base)
}

fn normalize_host(host: &str, base: &str) -> String {
    let host = host.trim().to_ascii_lowercase();
    let host = if base.contains(':') {
        host.as_str()
    } else {
        strip_port(&host)
    };
    host.trim_end_matches('.').to_string()
}

fn is_dns_label(label: &str) -> bool {
    !label.is_empty()
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

fn strip_port(host: &str) -> &str {
    // IPv6 literals keep their brackets; only a trailing `:digits` is a port.
    match host.rsplit_once(':') {
        Some((name, port))
            if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) && !name.ends_with(':') =>
        {
            name
        }
        _ => host,
    }
}
