//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::RouterConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable that overrides `tenancy.base_domain` at load time.
pub const BASE_DOMAIN_ENV: &str = "TENANT_ROUTER_BASE_DOMAIN";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<RouterConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let base_domain = std::env::var(BASE_DOMAIN_ENV).ok();
    parse_config(&content, base_domain.as_deref())
}

/// Parse and validate configuration text, applying the base domain override.
pub fn parse_config(content: &str, base_domain_override: Option<&str>) -> Result<RouterConfig, ConfigError> {
    let mut config: RouterConfig = toml::from_str(content)?;

    if let Some(domain) = base_domain_override.map(str::trim).filter(|d| !d.is_empty()) {
        tracing::debug!(base_domain = %domain, "Base domain taken from environment");
        config.tenancy.base_domain = domain.to_string();
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins_over_file() {
        let config = parse_config(
            "[tenancy]\nbase_domain = \"example.com\"\n",
            Some("plura.dev"),
        )
        .unwrap();
        assert_eq!(config.tenancy.base_domain, "plura.dev");
    }

    #[test]
    fn test_blank_override_is_ignored() {
        let config = parse_config("[tenancy]\nbase_domain = \"example.com\"\n", Some("  ")).unwrap();
        assert_eq!(config.tenancy.base_domain, "example.com");
    }

    #[test]
    fn test_parse_error() {
        let err = parse_config("[tenancy\n", None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_error_lists_problems() {
        let err = parse_config("[auth]\nsign_in_url = \"sign-in\"\n", None).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref e) if e.len() == 1));
        assert!(err.to_string().contains("auth.sign_in_url"));
    }

    #[test]
    fn test_sample_config_is_valid() {
        let config = parse_config(include_str!("../../router.toml"), None).unwrap();
        assert_eq!(config.tenancy.reserved_subdomains, vec!["www"]);
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
