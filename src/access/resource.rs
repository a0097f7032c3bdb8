//! Gated resource types and ownership lookup.
//!
//! Resources (sessions, courses, lessons) live outside the gateway; the
//! only fact the gate needs is the owning teacher, to match against a
//! candidate subscription.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::access::subscription::SubscriptionKind;
use crate::access::StoreError;

/// Kind of content a route serves, declared at router construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    QuranSession,
    AcademicSession,
    InteractiveCourse,
    RecordedCourse,
    Course,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::QuranSession => "quran_session",
            ResourceType::AcademicSession => "academic_session",
            ResourceType::InteractiveCourse => "interactive_course",
            ResourceType::RecordedCourse => "recorded_course",
            ResourceType::Course => "course",
        }
    }

    /// Which subscription variant backs this resource type.
    pub fn subscription_kind(&self) -> SubscriptionKind {
        match self {
            ResourceType::QuranSession => SubscriptionKind::Quran,
            ResourceType::AcademicSession => SubscriptionKind::Academic,
            ResourceType::InteractiveCourse
            | ResourceType::RecordedCourse
            | ResourceType::Course => SubscriptionKind::Course,
        }
    }
}

/// Ownership lookup for gated resources.
pub trait ResourceStore: Send + Sync {
    /// Owning teacher of a resource, or `None` if the resource does not
    /// exist.
    fn teacher_of(&self, resource_type: ResourceType, id: u64) -> Result<Option<u64>, StoreError>;
}

/// In-memory resource-to-teacher mapping.
#[derive(Default)]
pub struct InMemoryResources {
    teachers: DashMap<(ResourceType, u64), u64>,
}

impl InMemoryResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, resource_type: ResourceType, id: u64, teacher_id: u64) {
        self.teachers.insert((resource_type, id), teacher_id);
    }
}

impl ResourceStore for InMemoryResources {
    fn teacher_of(&self, resource_type: ResourceType, id: u64) -> Result<Option<u64>, StoreError> {
        Ok(self.teachers.get(&(resource_type, id)).map(|r| *r.value()))
    }
}
