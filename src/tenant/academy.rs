//! Academy (tenant) record types.

use serde::{Deserialize, Serialize};

/// An isolated customer organization, identified by subdomain.
///
/// Academies are created and mutated by platform operators; the gateway only
/// reads them during tenant resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Academy {
    pub id: u64,

    /// Unique key used for tenant resolution.
    pub subdomain: String,

    pub name: String,

    /// Inactive academies answer every request with 503.
    pub is_active: bool,

    /// Walled off behind the maintenance gate when true.
    pub maintenance_mode: bool,

    /// Owner of the academy; bypasses maintenance mode.
    pub admin_id: Option<u64>,

    pub settings: AcademySettings,
}

/// Unstructured per-academy configuration the gateway cares about.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AcademySettings {
    /// Custom maintenance message, shown instead of the platform default.
    pub maintenance_message: Option<String>,
}

impl Academy {
    /// Convenience constructor for an active academy with default settings.
    pub fn new(id: u64, subdomain: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            subdomain: subdomain.into(),
            name: name.into(),
            is_active: true,
            maintenance_mode: false,
            admin_id: None,
            settings: AcademySettings::default(),
        }
    }
}
