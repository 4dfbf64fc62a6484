//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) + TENANT_ROUTER_BASE_DOMAIN
//!     → loader.rs (parse, deserialize, apply env override)
//!     → validation.rs (semantic checks)
//!     → RouterConfig (validated, immutable)
//!     → compiled into a routing snapshot
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → atomic swap of the routing snapshot
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - The environment is read once, at load time, never per request

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError, BASE_DOMAIN_ENV};
pub use schema::{
    AuthConfig, ListenerConfig, MatcherConfig, ObservabilityConfig, RouterConfig, TenancyConfig,
    TimeoutConfig, UpstreamConfig,
};
pub use validation::{validate_config, ValidationError};
