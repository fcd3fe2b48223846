//! Track (panel) model.
//!
//! Each track owns an independent day x slot plane of the timetable.
//! Activities are placed per track; resources are shared across tracks.

use serde::{Deserialize, Serialize};

/// A parallel timetable plane (e.g., a class panel or student group).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
}

impl Track {
    /// Creates a track with an empty name.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
        }
    }

    /// Sets the track name.
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

    /// Creates `count` tracks named `Panel 1`..`Panel n`.
    pub fn numbered(count: usize) -> Vec<Self> {
        (1..=count)
            .map(|i| Self::new(format!("P{i}")).with_name(format!("Panel {i}")))
            .collect()
    }
}
