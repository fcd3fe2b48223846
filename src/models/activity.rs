//! Activity (course) model.
//!
//! An activity is the unit the timetable places: a course that must be
//! held a fixed number of times per week, each time as a block of one or
//! more consecutive slots on a single day.
//!
//! # Occurrence Model
//!
//! - **Frequency**: required weekly placements.
//! - **Duration**: consecutive slots per placement (default 1).
//! - **Instructors**: eligible instructors; one is drawn per placement
//!   and only matters for resource-collision scoring.

use serde::{Deserialize, Serialize};

/// An activity (course) to be placed on the timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// Unique activity identifier.
    pub id: String,
    /// Display name used by exports.
    pub name: String,
    /// Required placements per week.
    pub frequency: u32,
    /// Consecutive slots per placement.
    #[serde(default = "default_duration")]
    pub duration: usize,
    /// Eligible instructor IDs. Empty = no instructor is tracked.
    #[serde(default)]
    pub instructors: Vec<String>,
}

fn default_duration() -> usize {
    1
}

impl Activity {
    /// Creates a single-slot activity.
    pub fn new(id: impl Into<String>, name: impl Into<String>, frequency: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            frequency,
            duration: default_duration(),
            instructors: Vec::new(),
        }
    }

    /// Sets the block length in slots.
    pub fn with_duration(mut self, duration: usize) -> Self {
        self.duration = duration;
        self
    }

    /// Adds an eligible instructor.
    pub fn with_instructor(mut self, instructor_id: impl Into<String>) -> Self {
        self.instructors.push(instructor_id.into());
        self
    }

    /// Block length, never less than one slot.
    #[inline]
    pub fn block_len(&self) -> usize {
        self.duration.max(1)
    }

    /// Total slots this activity occupies per week when fully placed.
    pub fn weekly_slots(&self) -> usize {
        self.frequency as usize * self.block_len()
    }
}
