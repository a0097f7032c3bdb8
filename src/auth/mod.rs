//! Authentication and authorization subsystem.
//!
//! # Data Flow
//! ```text
//! Request with bearer token / session cookie
//!     → session.rs (token → session → principal)
//!     → gate.rs require_auth (login wall, forced logout of inactive users)
//!     → gate.rs role_gate (per-route allow-list over the Role enum)
//!     → login.rs (tenant-scoped login URL for redirect-based recovery)
//! ```

pub mod gate;
pub mod login;
pub mod principal;
pub mod role;
pub mod session;

pub use gate::{require_auth, role_gate, RoleGateState};
pub use principal::{current_principal, CurrentPrincipal, Principal};
pub use role::{parse_role_list, Role, UnknownRole};
pub use session::{SessionStore, UserStore, SESSION_COOKIE};
