//! Content access-control subsystem.
//!
//! # Data Flow
//! ```text
//! Content-access route matched
//!     → gate.rs (resource id from route params, principal from extensions)
//!     → resource.rs (owning teacher of the target resource)
//!     → subscription.rs (latest subscription for student + teacher)
//!     → can_access() state check, denial classification
//!     → audit.rs (exactly one row per decision, best-effort write)
//! ```

pub mod audit;
pub mod gate;
pub mod resource;
pub mod subscription;

use thiserror::Error;

/// Failure talking to an external store (subscriptions, resources).
#[derive(Debug, Error)]
#[error("store unavailable: {0}")]
pub struct StoreError(pub String);

pub use audit::{
    AccessLogEntry, AuditAction, AuditError, AuditMetadata, AuditSink, InMemoryAuditLog,
};
pub use gate::{
    classify_denial, subscription_gate, DenyReason, GrantedSubscription, SubscriptionGate,
};
pub use resource::{InMemoryResources, ResourceStore, ResourceType};
pub use subscription::{
    InMemorySubscriptions, PaymentStatus, Subscription, SubscriptionKind, SubscriptionStatus,
    SubscriptionStore,
};
