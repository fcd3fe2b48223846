//! Fixed cells: pre-assigned grid positions immune to the optimizer.
//!
//! Callers describe fixed cells as raw [`FixedAssignment`] entries that
//! reference activities by ID. [`FixedCells::resolve`] checks them against
//! a catalog; malformed entries are reported and skipped, never fatal.

use serde::{Deserialize, Serialize};

use super::Catalog;
use crate::validation::{ValidationError, ValidationErrorKind};

/// What a fixed cell holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixedValue {
    /// The cell holds this activity (by ID).
    Activity(String),
    /// The cell is unavailable (e.g., lunch break).
    Blocked,
}

/// A raw fixed-cell entry as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedAssignment {
    /// Track index.
    pub track: usize,
    /// Day index.
    pub day: usize,
    /// Slot index.
    pub slot: usize,
    /// Cell content.
    pub value: FixedValue,
}

impl FixedAssignment {
    /// Pins an activity to a cell.
    pub fn activity(track: usize, day: usize, slot: usize, activity_id: impl Into<String>) -> Self {
        Self {
            track,
            day,
            slot,
            value: FixedValue::Activity(activity_id.into()),
        }
    }

    /// Blocks a cell.
    pub fn blocked(track: usize, day: usize, slot: usize) -> Self {
        Self {
            track,
            day,
            slot,
            value: FixedValue::Blocked,
        }
    }

    /// Blocks the same (day, slot) on every track, e.g. a shared lunch break.
    pub fn blocked_on_all_tracks(track_count: usize, day: usize, slot: usize) -> Vec<Self> {
        (0..track_count)
            .map(|t| Self::blocked(t, day, slot))
            .collect()
    }
}

/// Resolved content of a fixed cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixedCell {
    /// Activity index into the catalog.
    Activity(usize),
    /// Unavailable cell.
    Blocked,
}

/// A resolved fixed cell with its coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedEntry {
    /// Track index.
    pub track: usize,
    /// Day index.
    pub day: usize,
    /// Slot index.
    pub slot: usize,
    /// Cell content.
    pub cell: FixedCell,
}

/// The validated set of fixed cells for one catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedCells {
    entries: Vec<FixedEntry>,
}

impl FixedCells {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves raw entries against a catalog.
    ///
    /// Out-of-range coordinates, unknown activity IDs, and repeated
    /// coordinates are returned as warnings and skipped. The first entry
    /// for a coordinate wins.
    pub fn resolve(
        catalog: &Catalog,
        assignments: &[FixedAssignment],
    ) -> (Self, Vec<ValidationError>) {
        let mut entries: Vec<FixedEntry> = Vec::with_capacity(assignments.len());
        let mut warnings = Vec::new();

        for fa in assignments {
            if fa.track >= catalog.track_count()
                || fa.day >= catalog.day_count()
                || fa.slot >= catalog.slot_count()
            {
                warnings.push(ValidationError::new(
                    ValidationErrorKind::InvalidFixedCell,
                    format!(
                        "Fixed cell ({}, {}, {}) is outside the {}x{}x{} grid",
                        fa.track,
                        fa.day,
                        fa.slot,
                        catalog.track_count(),
                        catalog.day_count(),
                        catalog.slot_count()
                    ),
                ));
                continue;
            }

            let cell = match &fa.value {
                FixedValue::Blocked => FixedCell::Blocked,
                FixedValue::Activity(id) => match catalog.activity_index(id) {
                    Some(idx) => FixedCell::Activity(idx),
                    None => {
                        warnings.push(ValidationError::new(
                            ValidationErrorKind::UnknownActivity,
                            format!(
                                "Fixed cell ({}, {}, {}) references unknown activity '{}'",
                                fa.track, fa.day, fa.slot, id
                            ),
                        ));
                        continue;
                    }
                },
            };

            if entries
                .iter()
                .any(|e| e.track == fa.track && e.day == fa.day && e.slot == fa.slot)
            {
                warnings.push(ValidationError::new(
                    ValidationErrorKind::DuplicateFixedCell,
                    format!(
                        "Fixed cell ({}, {}, {}) is already assigned; later entry ignored",
                        fa.track, fa.day, fa.slot
                    ),
                ));
                continue;
            }

            entries.push(FixedEntry {
                track: fa.track,
                day: fa.day,
                slot: fa.slot,
                cell,
            });
        }

        for w in &warnings {
            log::warn!("{}", w.message);
        }

        (Self { entries }, warnings)
    }

    /// Resolved entries in input order.
    pub fn entries(&self) -> &[FixedEntry] {
        &self.entries
    }

    /// Content of the fixed cell at a coordinate, if any.
    pub fn get(&self, track: usize, day: usize, slot: usize) -> Option<FixedCell> {
        self.entries
            .iter()
            .find(|e| e.track == track && e.day == day && e.slot == slot)
            .map(|e| e.cell)
    }

    /// Number of fixed cells.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no cell is fixed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Activity, Calendar, Track};

    fn sample_catalog() -> Catalog {
        Catalog::new(Calendar::uniform(6, 4))
            .with_activity(Activity::new("C1", "Algebra", 2))
            .with_tracks(Track::numbered(2))
    }

    #[test]
    fn test_resolve_valid() {
        let catalog = sample_catalog();
        let raw = vec![
            FixedAssignment::blocked(0, 5, 0),
            FixedAssignment::activity(1, 0, 3, "C1"),
        ];
        let (fixed, warnings) = FixedCells::resolve(&catalog, &raw);
        assert!(warnings.is_empty());
        assert_eq!(fixed.len(), 2);
        assert_eq!(fixed.get(0, 5, 0), Some(FixedCell::Blocked));
        assert_eq!(fixed.get(1, 0, 3), Some(FixedCell::Activity(0)));
        assert_eq!(fixed.get(0, 0, 0), None);
    }

    #[test]
    fn test_resolve_skips_out_of_range() {
        let catalog = sample_catalog();
        let raw = vec![
            FixedAssignment::blocked(2, 0, 0),
            FixedAssignment::blocked(0, 6, 0),
            FixedAssignment::blocked(0, 0, 4),
            FixedAssignment::blocked(0, 0, 0),
        ];
        let (fixed, warnings) = FixedCells::resolve(&catalog, &raw);
        assert_eq!(fixed.len(), 1);
        assert_eq!(warnings.len(), 3);
        assert!(warnings
            .iter()
            .all(|w| w.kind == ValidationErrorKind::InvalidFixedCell));
    }

    #[test]
    fn test_resolve_skips_unknown_activity() {
        let catalog = sample_catalog();
        let raw = vec![FixedAssignment::activity(0, 0, 0, "NOPE")];
        let (fixed, warnings) = FixedCells::resolve(&catalog, &raw);
        assert!(fixed.is_empty());
        assert_eq!(warnings[0].kind, ValidationErrorKind::UnknownActivity);
    }

    #[test]
    fn test_resolve_first_entry_wins() {
        let catalog = sample_catalog();
        let raw = vec![
            FixedAssignment::blocked(0, 1, 1),
            FixedAssignment::activity(0, 1, 1, "C1"),
        ];
        let (fixed, warnings) = FixedCells::resolve(&catalog, &raw);
        assert_eq!(fixed.get(0, 1, 1), Some(FixedCell::Blocked));
        assert_eq!(warnings[0].kind, ValidationErrorKind::DuplicateFixedCell);
    }

    #[test]
    fn test_blocked_on_all_tracks() {
        let lunch = FixedAssignment::blocked_on_all_tracks(3, 5, 0);
        assert_eq!(lunch.len(), 3);
        assert!(lunch.iter().all(|f| f.value == FixedValue::Blocked && f.day == 5));
    }

    #[test]
    fn test_fixed_value_json() {
        let raw: Vec<FixedAssignment> = serde_json::from_str(
            r#"[{"track":0,"day":5,"slot":0,"value":"blocked"},
                {"track":0,"day":1,"slot":2,"value":{"activity":"C1"}}]"#,
        )
        .unwrap();
        assert_eq!(raw[0].value, FixedValue::Blocked);
        assert_eq!(raw[1].value, FixedValue::Activity("C1".into()));
    }
}
