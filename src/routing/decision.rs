//! Routing inputs and outputs.

use std::fmt;

/// What the router sees of an inbound request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestDescriptor {
    /// Request path, always starting with `/` when non-empty.
    pub path: String,
    /// Raw query string without the leading `?`.
    pub query: String,
    /// Host header, if the client sent one.
    pub host: Option<String>,
}

impl RequestDescriptor {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Path followed by `?query` when the query is non-empty.
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query)
        }
    }
}

/// The single outcome of routing one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingDecision {
    /// No rule matched; default dispatch proceeds.
    PassThrough,
    /// Dispatch internally to this target, keeping the visible URL.
    RewriteTo(String),
}

impl RoutingDecision {
    /// Label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            RoutingDecision::PassThrough => "pass_through",
            RoutingDecision::RewriteTo(_) => "rewrite",
        }
    }

    pub fn target(&self) -> Option<&str> {
        match self {
            RoutingDecision::PassThrough => None,
            RoutingDecision::RewriteTo(target) => Some(target),
        }
    }
}

impl fmt::Display for RoutingDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutingDecision::PassThrough => f.write_str("pass-through"),
            RoutingDecision::RewriteTo(target) => write!(f, "rewrite -> {}", target),
        }
    }
}
