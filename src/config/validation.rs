//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (default locale is a supported locale)
//! - Validate value ranges and pattern shapes
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use crate::config::schema::GatewayConfig;

/// A single semantic validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g., "locale.default").
    pub field: String,
    /// Human-readable description of the problem.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.domain.base_domain.trim().is_empty() {
        errors.push(ValidationError {
            field: "domain.base_domain".to_string(),
            message: "must not be empty".to_string(),
        });
    }

    if config.domain.default_tenant.trim().is_empty() {
        errors.push(ValidationError {
            field: "domain.default_tenant".to_string(),
            message: "must not be empty".to_string(),
        });
    }

    if !matches!(config.domain.scheme.as_str(), "http" | "https") {
        errors.push(ValidationError {
            field: "domain.scheme".to_string(),
            message: format!("unsupported scheme '{}'", config.domain.scheme),
        });
    }

    if config.locale.supported.is_empty() {
        errors.push(ValidationError {
            field: "locale.supported".to_string(),
            message: "at least one supported locale is required".to_string(),
        });
    }

    if !config.locale.supported.contains(&config.locale.default) {
        errors.push(ValidationError {
            field: "locale.default".to_string(),
            message: format!(
                "default locale '{}' is not in the supported list",
                config.locale.default
            ),
        });
    }

    // Wildcards are only meaningful at the end of a pattern.
    for pattern in &config.maintenance.excluded_paths {
        if !pattern.starts_with('/') {
            errors.push(ValidationError {
                field: "maintenance.excluded_paths".to_string(),
                message: format!("pattern '{pattern}' must start with '/'"),
            });
        }
        if pattern.contains('*') && !pattern.ends_with('*') {
            errors.push(ValidationError {
                field: "maintenance.excluded_paths".to_string(),
                message: format!("pattern '{pattern}' may only use a trailing '*'"),
            });
        }
    }

    for prefix in &config.resolver.bypass_prefixes {
        if !prefix.starts_with('/') {
            errors.push(ValidationError {
                field: "resolver.bypass_prefixes".to_string(),
                message: format!("prefix '{prefix}' must start with '/'"),
            });
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError {
            field: "timeouts.request_secs".to_string(),
            message: "must be greater than zero".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
