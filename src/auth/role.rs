//! Principal roles.
//!
//! Roles are a closed enum rather than free-form strings: an unknown role
//! name can never silently grant access, and capability checks are plain
//! lookups on the variant.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// The role of an authenticated principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Admin,
    Supervisor,
    QuranTeacher,
    AcademicTeacher,
    Student,
    Parent,
    Staff,
    EndUser,
}

/// Role name that does not map to any known role.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl Role {
    pub const ALL: [Role; 9] = [
        Role::SuperAdmin,
        Role::Admin,
        Role::Supervisor,
        Role::QuranTeacher,
        Role::AcademicTeacher,
        Role::Student,
        Role::Parent,
        Role::Staff,
        Role::EndUser,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::Admin => "admin",
            Role::Supervisor => "supervisor",
            Role::QuranTeacher => "quran_teacher",
            Role::AcademicTeacher => "academic_teacher",
            Role::Student => "student",
            Role::Parent => "parent",
            Role::Staff => "staff",
            Role::EndUser => "end_user",
        }
    }

    /// Roles allowed through the maintenance wall.
    pub fn bypasses_maintenance(&self) -> bool {
        matches!(self, Role::SuperAdmin | Role::Admin | Role::Supervisor)
    }

    pub fn is_teacher(&self) -> bool {
        matches!(self, Role::QuranTeacher | Role::AcademicTeacher)
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .iter()
            .find(|r| r.as_str() == s)
            .copied()
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a comma-separated role list from route or config declarations.
///
/// Whitespace is trimmed. Unknown names are dropped with a warning; they
/// never grant access.
pub fn parse_role_list(list: &str) -> Vec<Role> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|name| match name.parse::<Role>() {
            Ok(role) => Some(role),
            Err(e) => {
                tracing::warn!(role = %name, error = %e, "Ignoring unknown role in allow-list");
                None
            }
        })
        .collect()
}
