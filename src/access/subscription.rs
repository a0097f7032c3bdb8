//! Subscription model and store.
//!
//! A subscription is a student's paid access grant to a teacher's sessions
//! or courses. Three variants exist (Quran, Academic, Course), carried as a
//! tagged kind rather than separate types: the gate treats them uniformly.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::access::StoreError;
use crate::http::request::Platform;

/// Which subscription table a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionKind {
    Quran,
    Academic,
    Course,
}

impl SubscriptionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionKind::Quran => "quran",
            SubscriptionKind::Academic => "academic",
            SubscriptionKind::Course => "course",
        }
    }
}

/// Lifecycle state of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Paused,
    Cancelled,
    Suspended,
    Expired,
    Completed,
}

/// Payment state of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    Pending,
    Overdue,
    Failed,
    Refunded,
}

/// A student's access grant to a teacher's content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: u64,
    pub kind: SubscriptionKind,
    pub student_id: u64,
    pub teacher_id: u64,
    pub status: SubscriptionStatus,
    pub payment_status: PaymentStatus,

    /// Unix timestamp of creation; the gate picks the most recent match.
    pub created_at: u64,

    pub last_accessed_at: Option<u64>,
    pub last_accessed_platform: Option<Platform>,
}

impl Subscription {
    /// Whether the subscription currently grants content access.
    ///
    /// Paid, and neither paused nor cancelled. Other states (expired,
    /// suspended, completed) do not block access on their own; revocation
    /// happens through payment status.
    pub fn can_access(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
            && !matches!(
                self.status,
                SubscriptionStatus::Paused | SubscriptionStatus::Cancelled
            )
    }
}

/// Subscription lookup and last-access bookkeeping.
pub trait SubscriptionStore: Send + Sync {
    /// The most-recently-created subscription of `kind` linking the student
    /// to the teacher. Deliberately no status filter: the state check is the
    /// gate's job, and the reason for a denial depends on seeing the record.
    fn find_latest(
        &self,
        kind: SubscriptionKind,
        student_id: u64,
        teacher_id: u64,
    ) -> Result<Option<Subscription>, StoreError>;

    /// Update last-accessed bookkeeping. Last-write-wins; concurrent
    /// accesses from two devices may race harmlessly.
    fn record_access(
        &self,
        kind: SubscriptionKind,
        id: u64,
        platform: Platform,
        at: u64,
    ) -> Result<(), StoreError>;
}

/// Thread-safe in-memory subscription store.
#[derive(Default)]
pub struct InMemorySubscriptions {
    subscriptions: DashMap<(SubscriptionKind, u64), Subscription>,
}

impl InMemorySubscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, subscription: Subscription) {
        self.subscriptions
            .insert((subscription.kind, subscription.id), subscription);
    }

    pub fn get(&self, kind: SubscriptionKind, id: u64) -> Option<Subscription> {
        self.subscriptions.get(&(kind, id)).map(|r| r.value().clone())
    }
}

impl SubscriptionStore for InMemorySubscriptions {
    fn find_latest(
        &self,
        kind: SubscriptionKind,
        student_id: u64,
        teacher_id: u64,
    ) -> Result<Option<Subscription>, StoreError> {
        let latest = self
            .subscriptions
            .iter()
            .filter(|r| {
                let s = r.value();
                s.kind == kind && s.student_id == student_id && s.teacher_id == teacher_id
            })
            // Tie on created_at falls back to the higher id for determinism.
            .max_by_key(|r| (r.value().created_at, r.value().id))
            .map(|r| r.value().clone());
        Ok(latest)
    }

    fn record_access(
        &self,
        kind: SubscriptionKind,
        id: u64,
        platform: Platform,
        at: u64,
    ) -> Result<(), StoreError> {
        match self.subscriptions.get_mut(&(kind, id)) {
            Some(mut entry) => {
                entry.last_accessed_at = Some(at);
                entry.last_accessed_platform = Some(platform);
                Ok(())
            }
            None => Err(StoreError(format!(
                "subscription {}/{id} not found",
                kind.as_str()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subscription(id: u64, status: SubscriptionStatus, payment: PaymentStatus) -> Subscription {
        Subscription {
            id,
            kind: SubscriptionKind::Quran,
            student_id: 1,
            teacher_id: 2,
            status,
            payment_status: payment,
            created_at: 100 + id,
            last_accessed_at: None,
            last_accessed_platform: None,
        }
    }

    #[test]
    fn access_requires_paid_and_not_paused_or_cancelled() {
        use PaymentStatus::*;
        use SubscriptionStatus::*;

        for payment in [Paid, Pending, Overdue, Failed, Refunded] {
            for status in [Active, Paused, Cancelled, Suspended, Expired, Completed] {
                let sub = subscription(1, status, payment);
                let expected = payment == Paid && !matches!(status, Paused | Cancelled);
                assert_eq!(sub.can_access(), expected, "{payment:?}/{status:?}");
            }
        }
    }

    #[test]
    fn find_latest_picks_most_recent_ignoring_status() {
        let store = InMemorySubscriptions::new();
        store.insert(subscription(1, SubscriptionStatus::Active, PaymentStatus::Paid));
        store.insert(subscription(2, SubscriptionStatus::Cancelled, PaymentStatus::Paid));

        // The cancelled one is newer and must win; the status check is the
        // gate's responsibility.
        let latest = store
            .find_latest(SubscriptionKind::Quran, 1, 2)
            .unwrap()
            .unwrap();
        assert_eq!(latest.id, 2);
    }

    #[test]
    fn find_latest_respects_kind_and_parties() {
        let store = InMemorySubscriptions::new();
        store.insert(subscription(1, SubscriptionStatus::Active, PaymentStatus::Paid));

        assert!(store
            .find_latest(SubscriptionKind::Course, 1, 2)
            .unwrap()
            .is_none());
        assert!(store
            .find_latest(SubscriptionKind::Quran, 1, 99)
            .unwrap()
            .is_none());
    }

    #[test]
    fn record_access_updates_bookkeeping() {
        let store = InMemorySubscriptions::new();
        store.insert(subscription(1, SubscriptionStatus::Active, PaymentStatus::Paid));

        store
            .record_access(SubscriptionKind::Quran, 1, Platform::Mobile, 500)
            .unwrap();
        let sub = store.get(SubscriptionKind::Quran, 1).unwrap();
        assert_eq!(sub.last_accessed_at, Some(500));
        assert_eq!(sub.last_accessed_platform, Some(Platform::Mobile));
    }
}
