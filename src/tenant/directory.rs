//! Academy directory: tenant lookup by subdomain.
//!
//! The directory is an external collaborator (a data store in production);
//! the gateway only needs a single synchronous lookup. An in-memory
//! implementation backs tests and local runs.

use dashmap::DashMap;
use thiserror::Error;

use crate::tenant::academy::Academy;

/// Failure talking to the backing store.
#[derive(Debug, Error)]
#[error("academy directory unavailable: {0}")]
pub struct DirectoryError(pub String);

/// Lookup of tenant records by subdomain.
pub trait AcademyDirectory: Send + Sync {
    /// Find an academy by its subdomain. `Ok(None)` means no such tenant;
    /// `Err` means the store itself failed.
    fn find_by_subdomain(&self, subdomain: &str) -> Result<Option<Academy>, DirectoryError>;
}

/// Thread-safe in-memory directory.
#[derive(Default)]
pub struct InMemoryDirectory {
    academies: DashMap<String, Academy>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an academy, keyed by its subdomain.
    pub fn insert(&self, academy: Academy) {
        self.academies.insert(academy.subdomain.clone(), academy);
    }
}

impl AcademyDirectory for InMemoryDirectory {
    fn find_by_subdomain(&self, subdomain: &str) -> Result<Option<Academy>, DirectoryError> {
        Ok(self.academies.get(subdomain).map(|r| r.value().clone()))
    }
}
