//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the tenant gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Tenant domain settings (base domain, default tenant).
    pub domain: DomainConfig,

    /// Tenant resolution bypass rules.
    pub resolver: ResolverConfig,

    /// Maintenance mode settings.
    pub maintenance: MaintenanceConfig,

    /// Locale selection settings.
    pub locale: LocaleConfig,

    /// Payment path policy for mobile clients.
    pub payments: PaymentPolicyConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Deployment environment (controls CSP content).
    pub environment: Environment,
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    /// Local development: CSP permits the dev asset server.
    Local,
    /// Production: CSP appends a mixed-content block directive.
    #[default]
    Production,
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

/// Tenant domain configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DomainConfig {
    /// Base platform domain (e.g., "academy.test"). Request hosts are
    /// matched against this to extract the tenant subdomain.
    pub base_domain: String,

    /// Subdomain of the platform's default tenant, used when a request
    /// arrives on the bare base domain.
    pub default_tenant: String,

    /// URL scheme used when building tenant-scoped URLs (login, purchase).
    pub scheme: String,
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            base_domain: "academy.test".to_string(),
            default_tenant: "itqan-academy".to_string(),
            scheme: "https".to_string(),
        }
    }
}

/// Paths and headers that skip tenant resolution entirely.
///
/// Asset uploads, health probes and real-time UI frame requests are not
/// tenant-aware; attempting resolution would break those subsystems.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Path prefixes passed through without resolution.
    pub bypass_prefixes: Vec<String>,

    /// Request header whose presence marks a real-time UI frame request.
    pub bypass_header: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            bypass_prefixes: vec![
                "/uploads".to_string(),
                "/assets".to_string(),
                "/health".to_string(),
            ],
            bypass_header: "x-component-frame".to_string(),
        }
    }
}

/// Maintenance mode configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MaintenanceConfig {
    /// Paths excluded from the maintenance wall. A trailing `*` matches any
    /// suffix; patterns are anchored, not substring-matched.
    pub excluded_paths: Vec<String>,

    /// Path of the maintenance page itself (never walled off).
    pub page_path: String,

    /// Default message shown when the tenant has no custom one.
    pub default_message: String,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            excluded_paths: vec!["/login".to_string(), "/admin/*".to_string()],
            page_path: "/maintenance".to_string(),
            default_message: "We are performing scheduled maintenance. Please check back soon."
                .to_string(),
        }
    }
}

/// Locale selection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LocaleConfig {
    /// Locales the platform supports.
    pub supported: Vec<String>,

    /// Static fallback when no other source yields a supported locale.
    pub default: String,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            supported: vec!["ar".to_string(), "en".to_string()],
            default: "ar".to_string(),
        }
    }
}

/// Payment-initiation path patterns blocked for mobile clients.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PaymentPolicyConfig {
    /// Path prefixes considered payment initiation.
    pub initiation_prefixes: Vec<String>,

    /// Path on the tenant web site where a purchase can be completed.
    pub web_purchase_path: String,
}

impl Default for PaymentPolicyConfig {
    fn default() -> Self {
        Self {
            initiation_prefixes: vec![
                "/payments".to_string(),
                "/checkout".to_string(),
                "/subscriptions/renew".to_string(),
            ],
            web_purchase_path: "/subscriptions".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
