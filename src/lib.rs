//! Multi-tenant academy gateway.
//!
//! The request-scoped tenant/auth decision pipeline of a multi-tenant
//! education platform: every request passes, in order, through subdomain
//! tenant resolution, the maintenance wall, authentication, role
//! authorization, the resource subscription gate and a set of independent
//! platform policy filters.

pub mod access;
pub mod auth;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod policy;
pub mod tenant;

pub use config::GatewayConfig;
pub use http::{AppState, HttpServer};
pub use lifecycle::Shutdown;
