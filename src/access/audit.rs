//! Access audit log.
//!
//! Every subscription gate decision writes exactly one append-only row.
//! Writes are best-effort side effects: a sink failure is logged for
//! operators and counted, but never alters the gate's outcome.

use std::sync::Mutex;

use serde::Serialize;
use thiserror::Error;

use crate::access::resource::ResourceType;
use crate::access::subscription::SubscriptionKind;
use crate::http::request::Platform;
use crate::observability::metrics;

/// Decision recorded by an audit row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    AccessGranted,
    AccessDenied,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::AccessGranted => "access_granted",
            AuditAction::AccessDenied => "access_denied",
        }
    }
}

/// Free-form request metadata attached to a row.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AuditMetadata {
    pub user_agent: Option<String>,
    pub ip: Option<String>,
    pub reason: Option<String>,
}

/// One access attempt. Write-once, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct AccessLogEntry {
    pub tenant_id: Option<u64>,
    /// `None` when no candidate subscription was found.
    pub subscription_kind: Option<SubscriptionKind>,
    pub subscription_id: Option<u64>,
    pub user_id: Option<u64>,
    pub platform: Platform,
    pub action: AuditAction,
    pub resource_type: ResourceType,
    pub resource_id: Option<u64>,
    pub metadata: AuditMetadata,
}

/// Failure writing to the audit sink.
#[derive(Debug, Error)]
#[error("audit sink failure: {0}")]
pub struct AuditError(pub String);

/// Append-only audit persistence.
pub trait AuditSink: Send + Sync {
    fn record(&self, entry: AccessLogEntry) -> Result<(), AuditError>;
}

/// Best-effort write: the result is consumed here, failures go to the
/// operational log only.
pub fn record_best_effort(sink: &dyn AuditSink, entry: AccessLogEntry) {
    if let Err(e) = sink.record(entry) {
        metrics::record_audit_failure();
        tracing::warn!(error = %e, "Audit log write failed");
    }
}

/// In-memory audit log; tests assert on its contents.
#[derive(Default)]
pub struct InMemoryAuditLog {
    entries: Mutex<Vec<AccessLogEntry>>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded rows.
    pub fn entries(&self) -> Vec<AccessLogEntry> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl AuditSink for InMemoryAuditLog {
    fn record(&self, entry: AccessLogEntry) -> Result<(), AuditError> {
        self.entries
            .lock()
            .map_err(|_| AuditError("audit log poisoned".to_string()))?
            .push(entry);
        Ok(())
    }
}
