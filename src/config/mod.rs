//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! TOML file
//!     → loader.rs (read, parse)
//!     → validation.rs (semantic checks, all errors collected)
//!     → schema.rs types consumed by the rest of the gateway
//! ```

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    DomainConfig, Environment, GatewayConfig, ListenerConfig, LocaleConfig, MaintenanceConfig,
    ObservabilityConfig, PaymentPolicyConfig, ResolverConfig, TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
