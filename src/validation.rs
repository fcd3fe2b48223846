//! Input validation for timetabling problems.
//!
//! Checks structural integrity of a catalog before optimization.
//! Detects:
//! - Duplicate IDs
//! - Missing instructor references
//! - Zero frequencies and unusable durations
//! - Empty axes (no tracks, activities, days, or slots)
//! - Demand exceeding grid capacity
//!
//! Fixed-cell problems use the same error type; see
//! [`FixedCells::resolve`](crate::models::FixedCells::resolve).
//!
//! Validation is advisory: the optimizer always returns a timetable, and
//! problems found here only explain why it may be a poor one.

use crate::models::Catalog;
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// An activity references an instructor that doesn't exist.
    InvalidResourceReference,
    /// An activity has a required frequency of zero.
    InvalidFrequency,
    /// An activity's duration is zero or longer than a day.
    InvalidDuration,
    /// The catalog has no tracks, activities, days, or slots.
    EmptyCatalog,
    /// Requested slots exceed the free cells of the grid.
    CapacityExceeded,
    /// A fixed cell lies outside the grid.
    InvalidFixedCell,
    /// A fixed cell references an activity that doesn't exist.
    UnknownActivity,
    /// Two fixed entries target the same cell.
    DuplicateFixedCell,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.message)
    }
}

/// Validates a catalog.
///
/// Checks:
/// 1. At least one track, activity, day, and slot
/// 2. No duplicate activity, track, room, or instructor IDs
/// 3. Every activity has frequency >= 1
/// 4. Every activity's duration is in `1..=slots_per_day`
/// 5. Every instructor reference points to an existing instructor
/// 6. Total requested slots fit in the grid
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_catalog(catalog: &Catalog) -> ValidationResult {
    let mut errors = Vec::new();

    for (what, count) in [
        ("tracks", catalog.track_count()),
        ("activities", catalog.activity_count()),
        ("days", catalog.day_count()),
        ("slots", catalog.slot_count()),
    ] {
        if count == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyCatalog,
                format!("Catalog has no {what}"),
            ));
        }
    }

    check_unique(
        "activity",
        catalog.activities.iter().map(|a| a.id.as_str()),
        &mut errors,
    );
    check_unique(
        "track",
        catalog.tracks.iter().map(|t| t.id.as_str()),
        &mut errors,
    );
    check_unique(
        "room",
        catalog.rooms.iter().map(|r| r.id.as_str()),
        &mut errors,
    );
    check_unique(
        "instructor",
        catalog.instructors.iter().map(|r| r.id.as_str()),
        &mut errors,
    );

    let instructor_ids: HashSet<&str> = catalog.instructors.iter().map(|r| r.id.as_str()).collect();
    let slots_per_day = catalog.slot_count();

    for act in &catalog.activities {
        if act.frequency == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidFrequency,
                format!("Activity '{}' has frequency 0", act.id),
            ));
        }
        if act.duration == 0 || act.duration > slots_per_day {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDuration,
                format!(
                    "Activity '{}' has duration {} (slots per day: {})",
                    act.id, act.duration, slots_per_day
                ),
            ));
        }
        for inst in &act.instructors {
            if !instructor_ids.contains(inst.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidResourceReference,
                    format!(
                        "Activity '{}' references unknown instructor '{}'",
                        act.id, inst
                    ),
                ));
            }
        }
    }

    let demand: usize = catalog.activities.iter().map(|a| a.weekly_slots()).sum();
    if demand > catalog.cell_count() {
        errors.push(ValidationError::new(
            ValidationErrorKind::CapacityExceeded,
            format!(
                "Activities need {} slots but the grid has {} cells",
                demand,
                catalog.cell_count()
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_unique<'a>(
    what: &str,
    ids: impl Iterator<Item = &'a str>,
    errors: &mut Vec<ValidationError>,
) {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate {what} ID: {id}"),
            ));
        }
    }
}
