//! Tenant resolution subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request
//!     → resolver.rs (subdomain from host, directory lookup)
//!     → context.rs (TenantContext attached as request extension)
//!     → maintenance.rs (503 wall with bypass rules)
//!     → downstream gates read the context, never re-resolve
//! ```

pub mod academy;
pub mod context;
pub mod directory;
pub mod maintenance;
pub mod resolver;

pub use academy::{Academy, AcademySettings};
pub use context::{current_tenant, TenantContext};
pub use directory::{AcademyDirectory, DirectoryError, InMemoryDirectory};
pub use resolver::{extract_subdomain, tenant_url};
