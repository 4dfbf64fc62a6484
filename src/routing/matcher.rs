//! Path pattern matching.
//!
//! # Responsibilities
//! - Match request paths against exact or prefix patterns
//! - Decide whether a path is in the hook's scope at all
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - No regex: a pattern is either an exact path or a prefix (`/api/*`,
//!   `/api/(.*)`), which keeps matching O(n) in the path length
//! - A prefix pattern also matches its bare root (`/api/*` matches `/api`)

use crate::config::MatcherConfig;

/// A single path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    /// Matches one path only.
    Exact(String),
    /// Matches the root and everything below it.
    Prefix(String),
}

impl PathPattern {
    /// Parse a pattern string.
    ///
    /// A trailing `*` or `(.*)` makes a prefix pattern; anything else is exact.
    pub fn parse(pattern: &str) -> Self {
        let pattern = pattern.trim();
        for wildcard in ["(.*)", "*"] {
            if let Some(root) = pattern.strip_suffix(wildcard) {
                let root = root.trim_end_matches('/');
                return PathPattern::Prefix(root.to_string());
            }
        }
        PathPattern::Exact(normalize(pattern).to_string())
    }

    /// Returns true if `path` matches this pattern.
    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathPattern::Exact(expected) => normalize(path) == expected,
            PathPattern::Prefix(root) => {
                if root.is_empty() {
                    return true;
                }
                match path.strip_prefix(root.as_str()) {
                    Some(rest) => rest.is_empty() || rest.starts_with('/'),
                    None => false,
                }
            }
        }
    }
}

fn normalize(path: &str) -> &str {
    if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    }
}

/// An ordered list of patterns; any match wins.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<PathPattern>,
}

impl PatternSet {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            patterns: patterns.into_iter().map(|p| PathPattern::parse(p.as_ref())).collect(),
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(path))
    }

    pub fn push(&mut self, pattern: PathPattern) {
        self.patterns.push(pattern);
    }
}

/// Declares which incoming paths invoke the routing hook.
#[derive(Debug, Clone)]
pub struct HookScope {
    include: PatternSet,
    exclude_prefixes: Vec<String>,
    skip_static_assets: bool,
}

impl HookScope {
    pub fn from_config(config: &MatcherConfig) -> Self {
        Self {
            include: PatternSet::new(&config.include),
            exclude_prefixes: config.exclude_prefixes.clone(),
            skip_static_assets: config.skip_static_assets,
        }
    }

    /// Returns true if the hook should run for `path`.
    pub fn applies_to(&self, path: &str) -> bool {
        if self.include.matches(path) {
            return true;
        }
        if self.exclude_prefixes.iter().any(|p| path.starts_with(p.as_str())) {
            return false;
        }
        !(self.skip_static_assets && is_static_asset(path))
    }
}

/// A path whose last segment looks like a file name (`name.ext`).
fn is_static_asset(path: &str) -> bool {
    let last = path.rsplit('/').next().unwrap_or_default();
    match last.rsplit_once('.') {
        Some((stem, ext)) => {
            !stem.is_empty()
                && !ext.is_empty()
                && ext.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    }
}
