//! Dense grid chromosome.
//!
//! # Encoding
//!
//! A timetable is a flat `tracks x days x slots` array of [`Cell`]s,
//! indexed as `(track * days + day) * slots + slot`. A placed activity
//! occupies `duration` consecutive cells of one (track, day); each cell
//! of the block carries the same [`Placement`].
//!
//! A parallel mask marks fixed cells. Fixed cells count as occupied for
//! every feasibility check and are never written after construction.
//!
//! # Occurrences
//!
//! The per-activity placement counter always equals the chunk count of
//! the grid: each maximal run of one activity within a (track, day) is
//! split into chunks of `duration` cells and every chunk (a trailing
//! partial one included) counts as one placement. Block writes update the
//! counter for the day they touch; [`Timetable::recount`] rebuilds it
//! after cell-level copies.

use std::sync::Arc;

use rand::Rng;

use crate::models::{Catalog, FixedCell, FixedCells};

/// One scheduled item: an activity with its drawn resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    /// Activity index into the catalog.
    pub activity: usize,
    /// Instructor index into the catalog, if the activity has one.
    pub instructor: Option<usize>,
    /// Room index into the catalog, if the catalog has rooms.
    pub room: Option<usize>,
}

impl Placement {
    /// A placement without resources (used for fixed activity cells).
    pub fn bare(activity: usize) -> Self {
        Self {
            activity,
            instructor: None,
            room: None,
        }
    }
}

/// Content of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    /// Free.
    #[default]
    Empty,
    /// Unavailable (fixed).
    Blocked,
    /// Holds a placement.
    Placed(Placement),
}

impl Cell {
    /// Activity index held by this cell, if any.
    #[inline]
    pub fn activity(&self) -> Option<usize> {
        match self {
            Cell::Placed(p) => Some(p.activity),
            _ => None,
        }
    }

    /// Whether the cell is free.
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Shape {
    block_len: usize,
    frequency: u32,
}

/// A candidate timetable (one GA individual).
#[derive(Debug, Clone, PartialEq)]
pub struct Timetable {
    tracks: usize,
    days: usize,
    slots: usize,
    cells: Vec<Cell>,
    fixed: Vec<bool>,
    placements: Vec<u32>,
    shapes: Arc<[Shape]>,
}

impl Timetable {
    /// Creates an empty timetable seeded with the fixed cells.
    ///
    /// Fixed activity cells count toward their activity's placements.
    pub fn new(catalog: &Catalog, fixed: &FixedCells) -> Self {
        let shapes: Arc<[Shape]> = catalog
            .activities
            .iter()
            .map(|a| Shape {
                block_len: a.block_len(),
                frequency: a.frequency,
            })
            .collect();
        Self::with_shapes(catalog, fixed, shapes)
    }

    fn with_shapes(catalog: &Catalog, fixed: &FixedCells, shapes: Arc<[Shape]>) -> Self {
        let (tracks, days, slots) = (
            catalog.track_count(),
            catalog.day_count(),
            catalog.slot_count(),
        );
        let size = tracks * days * slots;
        let mut tt = Self {
            tracks,
            days,
            slots,
            cells: vec![Cell::Empty; size],
            fixed: vec![false; size],
            placements: vec![0; shapes.len()],
            shapes,
        };

        for e in fixed.entries() {
            if e.track >= tracks || e.day >= days || e.slot >= slots {
                continue;
            }
            let idx = tt.index(e.track, e.day, e.slot);
            tt.cells[idx] = match e.cell {
                FixedCell::Blocked => Cell::Blocked,
                FixedCell::Activity(a) if a < tt.shapes.len() => Cell::Placed(Placement::bare(a)),
                FixedCell::Activity(_) => continue,
            };
            tt.fixed[idx] = true;
        }
        tt.recount();
        tt
    }

    /// A timetable with the same shape and fixed cells but every free
    /// cell empty. Shares the activity table with `self`.
    pub fn blank_like(&self) -> Self {
        let cells = self
            .cells
            .iter()
            .zip(&self.fixed)
            .map(|(c, &f)| if f { *c } else { Cell::Empty })
            .collect();
        let mut tt = Self {
            tracks: self.tracks,
            days: self.days,
            slots: self.slots,
            cells,
            fixed: self.fixed.clone(),
            placements: vec![0; self.shapes.len()],
            shapes: Arc::clone(&self.shapes),
        };
        tt.recount();
        tt
    }

    /// Number of tracks.
    #[inline]
    pub fn track_count(&self) -> usize {
        self.tracks
    }

    /// Number of days.
    #[inline]
    pub fn day_count(&self) -> usize {
        self.days
    }

    /// Slots per day.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots
    }

    /// Number of activities known to this timetable.
    #[inline]
    pub fn activity_count(&self) -> usize {
        self.shapes.len()
    }

    /// Required weekly placements of an activity.
    #[inline]
    pub fn frequency(&self, activity: usize) -> u32 {
        self.shapes[activity].frequency
    }

    /// Block length of an activity.
    #[inline]
    pub fn block_len(&self, activity: usize) -> usize {
        self.shapes[activity].block_len
    }

    #[inline]
    pub(crate) fn index(&self, track: usize, day: usize, slot: usize) -> usize {
        (track * self.days + day) * self.slots + slot
    }

    /// Cell at a coordinate. Panics when out of range.
    #[inline]
    pub fn cell(&self, track: usize, day: usize, slot: usize) -> Cell {
        self.cells[self.index(track, day, slot)]
    }

    /// All cells in `(track, day, slot)` order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The slots of one (track, day).
    pub fn day_cells(&self, track: usize, day: usize) -> &[Cell] {
        let start = self.index(track, day, 0);
        &self.cells[start..start + self.slots]
    }

    /// Whether a coordinate is a fixed cell.
    #[inline]
    pub fn is_fixed(&self, track: usize, day: usize, slot: usize) -> bool {
        self.fixed[self.index(track, day, slot)]
    }

    pub(crate) fn fixed_mask(&self) -> &[bool] {
        &self.fixed
    }

    /// Placements counted for an activity.
    #[inline]
    pub fn placement_count(&self, activity: usize) -> u32 {
        self.placements[activity]
    }

    /// Placement counter for every activity.
    pub fn placements(&self) -> &[u32] {
        &self.placements
    }

    /// Total placements across all activities.
    pub fn total_placements(&self) -> u32 {
        self.placements.iter().sum()
    }

    /// Whether `activity` fits as a block starting at `start_slot`.
    ///
    /// True iff every slot of `[start_slot, start_slot + duration)` is
    /// within the day and empty. Fixed cells are never empty-and-free.
    pub fn is_feasible(&self, activity: usize, track: usize, day: usize, start_slot: usize) -> bool {
        if activity >= self.shapes.len() || track >= self.tracks || day >= self.days {
            return false;
        }
        let end = start_slot + self.shapes[activity].block_len;
        if end > self.slots {
            return false;
        }
        let base = self.index(track, day, 0);
        (start_slot..end).all(|s| !self.fixed[base + s] && self.cells[base + s].is_empty())
    }

    /// Places one block of `activity` on (track, day).
    ///
    /// Tries start slots `0, d, 2d, ...` (d = duration) and takes the first
    /// feasible one. Returns `false` when no aligned position fits; the
    /// caller retries on another (track, day).
    pub fn place<R: Rng>(
        &mut self,
        catalog: &Catalog,
        activity: usize,
        track: usize,
        day: usize,
        rng: &mut R,
    ) -> bool {
        if activity >= self.shapes.len() {
            return false;
        }
        let step = self.shapes[activity].block_len;
        let mut start = 0;
        while start + step <= self.slots {
            if self.is_feasible(activity, track, day, start) {
                let placement = draw_placement(catalog, activity, rng);
                self.write_block(placement, track, day, start);
                return true;
            }
            start += step;
        }
        false
    }

    /// Places one block of `activity` starting exactly at `start_slot`.
    ///
    /// Returns `false` and leaves the grid untouched when infeasible.
    pub fn place_at<R: Rng>(
        &mut self,
        catalog: &Catalog,
        activity: usize,
        track: usize,
        day: usize,
        start_slot: usize,
        rng: &mut R,
    ) -> bool {
        if !self.is_feasible(activity, track, day, start_slot) {
            return false;
        }
        let placement = draw_placement(catalog, activity, rng);
        self.write_block(placement, track, day, start_slot);
        true
    }

    fn write_block(&mut self, placement: Placement, track: usize, day: usize, start: usize) {
        let before = self.day_chunks(track, day);
        let base = self.index(track, day, start);
        let len = self.shapes[placement.activity].block_len;
        for cell in &mut self.cells[base..base + len] {
            *cell = Cell::Placed(placement);
        }
        // A block next to a partial run can merge chunks, so re-count the day.
        for (activity, n) in self.day_chunks(track, day) {
            self.placements[activity] += n;
        }
        for (activity, n) in before {
            self.placements[activity] = self.placements[activity].saturating_sub(n);
        }
    }

    /// `(activity, chunks)` for every run of one (track, day).
    fn day_chunks(&self, track: usize, day: usize) -> Vec<(usize, u32)> {
        let mut out = Vec::new();
        self.for_each_run(track, day, |activity, len| {
            out.push((activity, len.div_ceil(self.shapes[activity].block_len) as u32));
        });
        out
    }

    /// Copies a cell from a donor of the same shape. Fixed cells are
    /// left alone. Call [`Timetable::recount`] when done.
    #[inline]
    pub(crate) fn copy_cell_from(&mut self, donor: &Timetable, idx: usize) {
        if !self.fixed[idx] {
            self.cells[idx] = donor.cells[idx];
        }
    }

    /// Rebuilds the placement counter from the grid.
    pub fn recount(&mut self) {
        let mut counts = vec![0u32; self.shapes.len()];
        for track in 0..self.tracks {
            for day in 0..self.days {
                for (activity, n) in self.day_chunks(track, day) {
                    counts[activity] += n;
                }
            }
        }
        self.placements = counts;
    }

    /// Calls `f(activity, run_len)` for every maximal run of one activity
    /// within (track, day), in slot order.
    pub(crate) fn for_each_run(&self, track: usize, day: usize, mut f: impl FnMut(usize, usize)) {
        let mut current: Option<(usize, usize)> = None;
        for cell in self.day_cells(track, day) {
            match (cell.activity(), current) {
                (Some(a), Some((cur, len))) if a == cur => current = Some((cur, len + 1)),
                (next, prev) => {
                    if let Some((cur, len)) = prev {
                        f(cur, len);
                    }
                    current = next.map(|a| (a, 1));
                }
            }
        }
        if let Some((cur, len)) = current {
            f(cur, len);
        }
    }

    /// Whether every fixed cell still holds its fixed value.
    pub fn fixed_cells_intact(&self, fixed: &FixedCells) -> bool {
        fixed.entries().iter().all(|e| {
            if e.track >= self.tracks || e.day >= self.days || e.slot >= self.slots {
                return true;
            }
            match (e.cell, self.cell(e.track, e.day, e.slot)) {
                (FixedCell::Blocked, Cell::Blocked) => true,
                (FixedCell::Activity(a), Cell::Placed(p)) => p.activity == a,
                _ => false,
            }
        })
    }

    /// Conflict count: same-day repeats plus frequency deviation.
    ///
    /// See [`conflict_count`](super::fitness::conflict_count).
    pub fn score(&self) -> u32 {
        super::fitness::conflict_count(self)
    }
}

/// Draws the resources for a new placement of `activity`.
fn draw_placement<R: Rng>(catalog: &Catalog, activity: usize, rng: &mut R) -> Placement {
    let instructor = catalog.activities.get(activity).and_then(|a| {
        if a.instructors.is_empty() {
            None
        } else {
            let pick = &a.instructors[rng.random_range(0..a.instructors.len())];
            catalog.instructor_index(pick)
        }
    });
    let room = if catalog.rooms.is_empty() {
        None
    } else {
        Some(rng.random_range(0..catalog.rooms.len()))
    };
    Placement {
        activity,
        instructor,
        room,
    }
}
