//! Fitness evaluation.
//!
//! # Conflict Count
//!
//! - **Same-day repeats**: within one (track, day), every maximal run of an
//!   activity after its first adds one conflict. A duration block (or any
//!   contiguous stretch) is one run, so contiguous slots are not penalized.
//! - **Frequency deviation**: `|placed - frequency|` per activity; under-
//!   and over-scheduling weigh the same.
//!
//! Stacking single-slot occurrences side by side is therefore free on the
//! repeat term: a frequency-3 activity in slots 0-2 of one day forms one
//! run and scores zero same-day conflicts. Its placement counter still
//! reads 3, so only the frequency term sees it.
//!
//! # Modes
//!
//! | Mode | Value | Maximum |
//! |------|-------|---------|
//! | `Conflicts` | `-conflicts` | 0.0 |
//! | `ResourceAware` | `placements / (resources * days)`, 0.0 on any clash | 1.0 |
//!
//! A clash is one instructor or room used by two placements at the same
//! (day, slot). Detection stops at the first clash.
//!
//! Higher values are better in both modes.

use serde::{Deserialize, Serialize};

use super::timetable::{Cell, Timetable};
use crate::models::{Catalog, ResourceKind};

const MAX_EPS: f64 = 1e-9;

/// Which objective the evaluator reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessMode {
    /// Negated conflict count.
    #[default]
    Conflicts,
    /// Normalized placement density, zeroed by resource clashes.
    ResourceAware,
}

impl FitnessMode {
    /// Best attainable value.
    pub fn max_value(self) -> f64 {
        match self {
            FitnessMode::Conflicts => 0.0,
            FitnessMode::ResourceAware => 1.0,
        }
    }
}

/// Evaluated quality of a timetable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Fitness {
    /// Scalar score (higher = better).
    pub value: f64,
    /// Same-day repeats plus frequency deviation.
    pub conflicts: u32,
    /// Whether a resource clash was found (resource-aware mode only).
    pub clash: bool,
    /// Mode the value was computed in.
    pub mode: FitnessMode,
}

impl Fitness {
    /// Placeholder for individuals not yet evaluated.
    pub fn unevaluated(mode: FitnessMode) -> Self {
        Self {
            value: f64::NEG_INFINITY,
            conflicts: u32::MAX,
            clash: false,
            mode,
        }
    }

    /// Whether the value reached the mode's maximum.
    pub fn is_max(&self) -> bool {
        self.value >= self.mode.max_value() - MAX_EPS
    }
}

/// A resource used twice at one meeting time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clash {
    /// Room or instructor.
    pub kind: ResourceKind,
    /// Resource index into the catalog.
    pub resource: usize,
    /// Day index.
    pub day: usize,
    /// Slot index.
    pub slot: usize,
}

/// Same-day repeats plus frequency deviation.
pub fn conflict_count(tt: &Timetable) -> u32 {
    let mut conflicts = 0u32;
    let mut seen = vec![false; tt.activity_count()];
    let mut touched = Vec::new();

    for track in 0..tt.track_count() {
        for day in 0..tt.day_count() {
            tt.for_each_run(track, day, |activity, _| {
                if seen[activity] {
                    conflicts += 1;
                } else {
                    seen[activity] = true;
                    touched.push(activity);
                }
            });
            for a in touched.drain(..) {
                seen[a] = false;
            }
        }
    }

    for activity in 0..tt.activity_count() {
        conflicts += tt.placement_count(activity).abs_diff(tt.frequency(activity));
    }

    conflicts
}

/// First resource clash in (day, slot, track) order, if any.
pub fn find_resource_clash(tt: &Timetable) -> Option<Clash> {
    let mut instructors: Vec<usize> = Vec::with_capacity(tt.track_count());
    let mut rooms: Vec<usize> = Vec::with_capacity(tt.track_count());

    for day in 0..tt.day_count() {
        for slot in 0..tt.slot_count() {
            instructors.clear();
            rooms.clear();
            for track in 0..tt.track_count() {
                let Cell::Placed(p) = tt.cell(track, day, slot) else {
                    continue;
                };
                if let Some(i) = p.instructor {
                    if instructors.contains(&i) {
                        return Some(Clash {
                            kind: ResourceKind::Instructor,
                            resource: i,
                            day,
                            slot,
                        });
                    }
                    instructors.push(i);
                }
                if let Some(r) = p.room {
                    if rooms.contains(&r) {
                        return Some(Clash {
                            kind: ResourceKind::Room,
                            resource: r,
                            day,
                            slot,
                        });
                    }
                    rooms.push(r);
                }
            }
        }
    }
    None
}

/// Scores timetables of one catalog.
#[derive(Debug, Clone)]
pub struct FitnessEvaluator {
    mode: FitnessMode,
    resource_count: usize,
    day_count: usize,
}

impl FitnessEvaluator {
    /// Creates an evaluator for a catalog.
    ///
    /// The resource-aware denominator uses the room count, or the track
    /// count when the catalog has no rooms.
    pub fn new(catalog: &Catalog, mode: FitnessMode) -> Self {
        let resource_count = if catalog.rooms.is_empty() {
            catalog.track_count()
        } else {
            catalog.rooms.len()
        };
        Self {
            mode,
            resource_count,
            day_count: catalog.day_count(),
        }
    }

    /// Evaluation mode.
    pub fn mode(&self) -> FitnessMode {
        self.mode
    }

    /// Scores a timetable. Pure; safe to call from many threads.
    pub fn evaluate(&self, tt: &Timetable) -> Fitness {
        let conflicts = conflict_count(tt);
        match self.mode {
            FitnessMode::Conflicts => Fitness {
                value: -(conflicts as f64),
                conflicts,
                clash: false,
                mode: self.mode,
            },
            FitnessMode::ResourceAware => {
                if let Some(clash) = find_resource_clash(tt) {
                    log::trace!(
                        "{:?} {} double-booked at day {} slot {}",
                        clash.kind,
                        clash.resource,
                        clash.day,
                        clash.slot
                    );
                    return Fitness {
                        value: 0.0,
                        conflicts,
                        clash: true,
                        mode: self.mode,
                    };
                }
                let capacity = self.resource_count * self.day_count;
                let value = if capacity == 0 {
                    0.0
                } else {
                    (tt.total_placements() as f64 / capacity as f64).clamp(0.0, 1.0)
                };
                Fitness {
                    value,
                    conflicts,
                    clash: false,
                    mode: self.mode,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Activity, Calendar, FixedAssignment, FixedCells, Resource, Track};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn grid_catalog() -> Catalog {
        Catalog::new(Calendar::uniform(3, 4))
            .with_activity(Activity::new("C1", "Algebra", 2))
            .with_activity(Activity::new("C2", "Lab", 1).with_duration(2))
            .with_track(Track::new("P1"))
    }

    #[test]
    fn test_perfect_timetable_scores_max() {
        let catalog = grid_catalog();
        let evaluator = FitnessEvaluator::new(&catalog, FitnessMode::Conflicts);
        let mut tt = Timetable::new(&catalog, &FixedCells::new());
        let mut rng = SmallRng::seed_from_u64(42);

        assert!(tt.place_at(&catalog, 0, 0, 0, 0, &mut rng));
        assert!(tt.place_at(&catalog, 0, 0, 1, 0, &mut rng));
        assert!(tt.place_at(&catalog, 1, 0, 2, 1, &mut rng));

        let f = evaluator.evaluate(&tt);
        assert_eq!(f.conflicts, 0);
        assert_eq!(f.value, 0.0);
        assert!(f.is_max());
    }

    #[test]
    fn test_duration_block_is_one_occurrence() {
        let catalog = grid_catalog();
        let mut tt = Timetable::new(&catalog, &FixedCells::new());
        let mut rng = SmallRng::seed_from_u64(42);

        assert!(tt.place_at(&catalog, 1, 0, 0, 0, &mut rng));
        // C1 missing twice, C2 exact, no repeats.
        assert_eq!(conflict_count(&tt), 2);
    }

    #[test]
    fn test_same_day_repeat_penalized() {
        let catalog = grid_catalog();
        let mut tt = Timetable::new(&catalog, &FixedCells::new());
        let mut rng = SmallRng::seed_from_u64(42);

        assert!(tt.place_at(&catalog, 0, 0, 0, 0, &mut rng));
        assert!(tt.place_at(&catalog, 0, 0, 0, 2, &mut rng));
        assert!(tt.place_at(&catalog, 1, 0, 1, 0, &mut rng));
        // Two separate runs of C1 on day 0: one repeat. Frequencies exact.
        assert_eq!(tt.score(), 1);
    }

    #[test]
    fn test_contiguous_stack_is_one_run() {
        let catalog = Catalog::new(Calendar::uniform(3, 4))
            .with_activity(Activity::new("C1", "Algebra", 3))
            .with_track(Track::new("P1"));
        let mut tt = Timetable::new(&catalog, &FixedCells::new());
        let mut rng = SmallRng::seed_from_u64(42);

        for slot in 0..3 {
            assert!(tt.place_at(&catalog, 0, 0, 0, slot, &mut rng));
        }
        assert_eq!(tt.placement_count(0), 3);
        assert_eq!(conflict_count(&tt), 0);
    }

    #[test]
    fn test_over_scheduling_penalized() {
        let catalog = grid_catalog();
        let mut tt = Timetable::new(&catalog, &FixedCells::new());
        let mut rng = SmallRng::seed_from_u64(42);

        for day in 0..3 {
            assert!(tt.place_at(&catalog, 0, 0, day, 3, &mut rng));
        }
        assert!(tt.place_at(&catalog, 1, 0, 0, 0, &mut rng));
        // C1 placed 3 times, required 2.
        assert_eq!(tt.score(), 1);
    }

    #[test]
    fn test_fixed_activity_counts() {
        let catalog = grid_catalog();
        let fixed = FixedCells::resolve(&catalog, &[FixedAssignment::activity(0, 0, 0, "C1")]).0;
        let tt = Timetable::new(&catalog, &fixed);
        // C1: 1 of 2, C2: 0 of 1.
        assert_eq!(tt.score(), 2);
    }

    fn resource_catalog() -> Catalog {
        Catalog::new(Calendar::uniform(1, 2))
            .with_activity(Activity::new("C1", "Algebra", 1).with_instructor("I1"))
            .with_activity(Activity::new("C2", "Physics", 1).with_instructor("I1"))
            .with_tracks(Track::numbered(2))
            .with_room(Resource::room("R1"))
            .with_room(Resource::room("R2"))
            .with_instructor(Resource::instructor("I1"))
    }

    #[test]
    fn test_shared_instructor_same_time_zeroes_fitness() {
        let catalog = resource_catalog();
        let evaluator = FitnessEvaluator::new(&catalog, FitnessMode::ResourceAware);
        let mut tt = Timetable::new(&catalog, &FixedCells::new());
        let mut rng = SmallRng::seed_from_u64(42);

        assert!(tt.place_at(&catalog, 0, 0, 0, 0, &mut rng));
        assert!(tt.place_at(&catalog, 1, 1, 0, 0, &mut rng));

        let clash = find_resource_clash(&tt).unwrap();
        assert_eq!(clash.kind, ResourceKind::Instructor);
        assert_eq!((clash.day, clash.slot), (0, 0));

        let f = evaluator.evaluate(&tt);
        assert!(f.clash);
        assert_eq!(f.value, 0.0);
        assert!(!f.is_max());
    }

    #[test]
    fn test_shared_instructor_different_time_is_fine() {
        let catalog = resource_catalog();
        let evaluator = FitnessEvaluator::new(&catalog, FitnessMode::ResourceAware);
        let mut tt = Timetable::new(&catalog, &FixedCells::new());
        let mut rng = SmallRng::seed_from_u64(42);

        assert!(tt.place_at(&catalog, 0, 0, 0, 0, &mut rng));
        assert!(tt.place_at(&catalog, 1, 1, 0, 1, &mut rng));

        assert_eq!(find_resource_clash(&tt), None);
        let f = evaluator.evaluate(&tt);
        assert!(!f.clash);
        // 2 placements / (2 rooms * 1 day)
        assert!((f.value - 1.0).abs() < 1e-10);
        assert!(f.is_max());
    }

    #[test]
    fn test_room_clash() {
        let catalog = Catalog::new(Calendar::uniform(1, 1))
            .with_activity(Activity::new("C1", "Algebra", 1))
            .with_activity(Activity::new("C2", "Physics", 1))
            .with_tracks(Track::numbered(2))
            .with_room(Resource::room("R1"));
        let mut tt = Timetable::new(&catalog, &FixedCells::new());
        let mut rng = SmallRng::seed_from_u64(42);

        assert!(tt.place_at(&catalog, 0, 0, 0, 0, &mut rng));
        assert!(tt.place_at(&catalog, 1, 1, 0, 0, &mut rng));
        assert_eq!(find_resource_clash(&tt).unwrap().kind, ResourceKind::Room);
    }

    #[test]
    fn test_resource_aware_partial_density() {
        let catalog = resource_catalog();
        let evaluator = FitnessEvaluator::new(&catalog, FitnessMode::ResourceAware);
        let mut tt = Timetable::new(&catalog, &FixedCells::new());
        let mut rng = SmallRng::seed_from_u64(42);

        assert!(tt.place_at(&catalog, 0, 0, 0, 0, &mut rng));
        let f = evaluator.evaluate(&tt);
        assert!((f.value - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_unevaluated() {
        let f = Fitness::unevaluated(FitnessMode::Conflicts);
        assert!(!f.is_max());
        assert_eq!(f.value, f64::NEG_INFINITY);
    }
}
