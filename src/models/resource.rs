//! Resource model.
//!
//! Resources are the rooms and instructors a placement uses. They carry
//! no behavior beyond identity; the resource-aware fitness only checks
//! that no resource is used twice at the same meeting time.

use serde::{Deserialize, Serialize};

/// A room or instructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Unique resource identifier (unique within its kind).
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Resource classification.
    pub kind: ResourceKind,
}

/// Resource classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// A physical room.
    Room,
    /// A person teaching the activity.
    Instructor,
}

impl Resource {
    /// Creates a resource with an empty name.
    pub fn new(id: impl Into<String>, kind: ResourceKind) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            kind,
        }
    }

    /// Creates a room.
    pub fn room(id: impl Into<String>) -> Self {
        Self::new(id, ResourceKind::Room)
    }

    /// Creates an instructor.
    pub fn instructor(id: impl Into<String>) -> Self {
        Self::new(id, ResourceKind::Instructor)
    }

    /// Sets the resource name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Name if set, otherwise the ID.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}
