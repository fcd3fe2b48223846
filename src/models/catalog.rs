//! Catalog: the immutable scheduling universe.
//!
//! Bundles activities, tracks, rooms, instructors, and the week calendar.
//! Built once per request, then shared read-only by every individual.
//!
//! Grid coordinates and activity references are plain indices into the
//! catalog's vectors.

use serde::{Deserialize, Serialize};

use super::{Activity, Calendar, Resource, Track};

/// Everything the optimizer needs to know about the problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Activities to place.
    pub activities: Vec<Activity>,
    /// Parallel grid planes.
    pub tracks: Vec<Track>,
    /// Rooms (resource-aware scoring only).
    #[serde(default)]
    pub rooms: Vec<Resource>,
    /// Instructors (resource-aware scoring only).
    #[serde(default)]
    pub instructors: Vec<Resource>,
    /// Day and slot axes.
    pub calendar: Calendar,
}

impl Catalog {
    /// Creates an empty catalog over a calendar.
    pub fn new(calendar: Calendar) -> Self {
        Self {
            activities: Vec::new(),
            tracks: Vec::new(),
            rooms: Vec::new(),
            instructors: Vec::new(),
            calendar,
        }
    }

    /// Adds an activity.
    pub fn with_activity(mut self, activity: Activity) -> Self {
        self.activities.push(activity);
        self
    }

    /// Adds a track.
    pub fn with_track(mut self, track: Track) -> Self {
        self.tracks.push(track);
        self
    }

    /// Adds several tracks.
    pub fn with_tracks(mut self, tracks: impl IntoIterator<Item = Track>) -> Self {
        self.tracks.extend(tracks);
        self
    }

    /// Adds a room.
    pub fn with_room(mut self, room: Resource) -> Self {
        self.rooms.push(room);
        self
    }

    /// Adds an instructor.
    pub fn with_instructor(mut self, instructor: Resource) -> Self {
        self.instructors.push(instructor);
        self
    }

    /// Number of activities.
    #[inline]
    pub fn activity_count(&self) -> usize {
        self.activities.len()
    }

    /// Number of tracks.
    #[inline]
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Number of days.
    #[inline]
    pub fn day_count(&self) -> usize {
        self.calendar.day_count()
    }

    /// Slots per day.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.calendar.slot_count()
    }

    /// Total cells of the grid.
    pub fn cell_count(&self) -> usize {
        self.track_count() * self.day_count() * self.slot_count()
    }

    /// Index of the activity with the given ID.
    pub fn activity_index(&self, id: &str) -> Option<usize> {
        self.activities.iter().position(|a| a.id == id)
    }

    /// Index of the instructor with the given ID.
    pub fn instructor_index(&self, id: &str) -> Option<usize> {
        self.instructors.iter().position(|r| r.id == id)
    }

    /// Total weekly placements requested across all activities.
    pub fn required_placements(&self) -> u32 {
        self.activities.iter().map(|a| a.frequency).sum()
    }
}
