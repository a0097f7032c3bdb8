//! Per-request tenant context.
//!
//! The resolved academy is carried as a request extension, written once by
//! the resolver and read by every downstream stage. It is never cached
//! beyond the request, so concurrent requests on the same worker can never
//! observe each other's tenant.

use std::sync::Arc;

use axum::http::Request;

use crate::tenant::academy::Academy;

/// Request-scoped handle to the resolved academy.
#[derive(Debug, Clone)]
pub struct TenantContext {
    academy: Arc<Academy>,
}

impl TenantContext {
    pub fn new(academy: Academy) -> Self {
        Self {
            academy: Arc::new(academy),
        }
    }

    pub fn academy(&self) -> &Academy {
        &self.academy
    }
}

/// Read the tenant attached to a request, if resolution produced one.
pub fn current_tenant<B>(req: &Request<B>) -> Option<TenantContext> {
    req.extensions().get::<TenantContext>().cloned()
}
