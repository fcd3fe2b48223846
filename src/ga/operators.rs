//! Configurable genetic operators for timetables.
//!
//! Provides runtime-selectable crossover via [`GeneticOperators`], plus
//! tournament selection, elitism and cell mutation.
//!
//! # Usage
//!
//! ```
//! use u_timetable::ga::operators::{CrossoverType, GeneticOperators};
//!
//! let ops = GeneticOperators::default();
//! assert_eq!(ops.crossover_type, CrossoverType::Uniform);
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::config::GaConfig;
use super::population::{Individual, Population};
use super::timetable::Timetable;
use crate::models::Catalog;

/// Crossover strategy for timetables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossoverType {
    /// Each free cell comes from either parent with probability 0.5.
    #[default]
    Uniform,
    /// First half of the flattened grid from parent A, the rest from B.
    SplitPoint,
}

/// Runtime-selectable genetic operators.
///
/// # Example
///
/// ```
/// use u_timetable::ga::operators::{CrossoverType, GeneticOperators};
///
/// let ops = GeneticOperators {
///     crossover_type: CrossoverType::SplitPoint,
///     mutation_rate: 0.1,
/// };
/// ```
#[derive(Debug, Clone)]
pub struct GeneticOperators {
    /// Crossover strategy.
    pub crossover_type: CrossoverType,
    /// Per-cell mutation probability.
    pub mutation_rate: f64,
}

impl Default for GeneticOperators {
    fn default() -> Self {
        Self {
            crossover_type: CrossoverType::Uniform,
            mutation_rate: 0.05,
        }
    }
}

impl GeneticOperators {
    /// Operators as configured.
    pub fn from_config(config: &GaConfig) -> Self {
        Self {
            crossover_type: config.crossover,
            mutation_rate: config.mutation_rate,
        }
    }

    /// Performs crossover using the configured strategy.
    pub fn crossover<R: Rng>(&self, a: &Timetable, b: &Timetable, rng: &mut R) -> Timetable {
        match self.crossover_type {
            CrossoverType::Uniform => uniform_crossover(a, b, rng),
            CrossoverType::SplitPoint => split_point_crossover(a, b),
        }
    }

    /// Performs mutation at the configured rate.
    pub fn mutate<R: Rng>(&self, tt: &mut Timetable, catalog: &Catalog, rng: &mut R) -> usize {
        mutate(tt, catalog, self.mutation_rate, rng)
    }
}

/// Tournament selection over a fitness-sorted slice.
///
/// Draws `k` indices (at least one) and returns the fittest; ties go to
/// the lower index. Panics on an empty slice.
pub fn tournament_select<R: Rng>(population: &[Individual], k: usize, rng: &mut R) -> usize {
    let n = population.len();
    let mut best = rng.random_range(0..n);
    for _ in 1..k.max(1) {
        let idx = rng.random_range(0..n);
        let (cand, cur) = (population[idx].fitness.value, population[best].fitness.value);
        if cand > cur || (cand == cur && idx < best) {
            best = idx;
        }
    }
    best
}

/// Clones the first `count` individuals of a sorted population.
pub fn select_elites(population: &Population, count: usize) -> Vec<Individual> {
    population
        .individuals()
        .iter()
        .take(count)
        .cloned()
        .collect()
}

/// Uniform crossover.
///
/// Every free cell is taken from `a` or `b` with equal probability. The
/// child is a fresh grid with fixed cells intact and a rebuilt counter.
pub fn uniform_crossover<R: Rng>(a: &Timetable, b: &Timetable, rng: &mut R) -> Timetable {
    let mut child = a.blank_like();
    for idx in 0..a.cells().len() {
        if a.fixed_mask()[idx] {
            continue;
        }
        let donor = if rng.random_bool(0.5) { a } else { b };
        child.copy_cell_from(donor, idx);
    }
    child.recount();
    child
}

/// Split-point crossover.
///
/// The grid is flattened in (track, day, slot) order; cells before the
/// midpoint come from `a`, the rest from `b`. Blocks cut at the midpoint
/// are kept as partial runs and the result is not repaired.
pub fn split_point_crossover(a: &Timetable, b: &Timetable) -> Timetable {
    let len = a.cells().len();
    let mid = len / 2;
    let mut child = a.blank_like();
    for idx in 0..len {
        let donor = if idx < mid { a } else { b };
        child.copy_cell_from(donor, idx);
    }
    child.recount();
    child
}

/// Cell mutation.
///
/// Visits every free cell; with probability `rate` draws a random activity
/// and tries to start a block there. Infeasible attempts are skipped.
/// Returns the number of blocks placed.
pub fn mutate<R: Rng>(tt: &mut Timetable, catalog: &Catalog, rate: f64, rng: &mut R) -> usize {
    let activities = tt.activity_count();
    let (days, slots) = (tt.day_count(), tt.slot_count());
    if activities == 0 || rate <= 0.0 || slots == 0 || days == 0 {
        return 0;
    }
    let rate = rate.min(1.0);

    let mut placed = 0;
    for idx in 0..tt.cells().len() {
        if tt.fixed_mask()[idx] || !rng.random_bool(rate) {
            continue;
        }
        let activity = rng.random_range(0..activities);
        let slot = idx % slots;
        let day = (idx / slots) % days;
        let track = idx / (slots * days);
        if tt.place_at(catalog, activity, track, day, slot, rng) {
            placed += 1;
        }
    }
    placed
}
