//! Evolution controller.
//!
//! [`Evolution`] is the generation state machine:
//!
//! ```text
//! Init -> Evaluate -> CheckTermination -> Terminal
//!                          |
//!                          v
//!         Select / Crossover / Mutate -> Replace -> Evaluate -> ...
//! ```
//!
//! [`GaRunner`] and [`solve`] wrap it with catalog validation, config
//! clamping and a cancellation handle.
//!
//! # Determinism
//!
//! One `SmallRng`, seeded from [`GaConfig::seed`], drives every random
//! decision on the calling thread. Parallel evaluation consumes no
//! randomness, so a seeded run gives the same timetable with or without
//! rayon.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::SeedableRng;

use super::config::GaConfig;
use super::fitness::{find_resource_clash, Fitness, FitnessEvaluator};
use super::operators::{select_elites, tournament_select, GeneticOperators};
use super::population::{create_initial_population, Individual, Population};
use super::timetable::Timetable;
use crate::models::{Catalog, FixedCells, ResourceKind};
use crate::validation::validate_catalog;

/// Why the run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// `generation_limit` generations were produced.
    GenerationLimit,
    /// Every individual reached maximum fitness.
    MaxFitness,
    /// The wall-clock budget ran out.
    TimeLimit,
    /// The cancel handle was raised.
    Cancelled,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Termination::GenerationLimit => "generation limit reached",
            Termination::MaxFitness => "maximum fitness reached",
            Termination::TimeLimit => "time limit reached",
            Termination::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Snapshot passed to the progress callback after each generation.
#[derive(Debug, Clone)]
pub struct GaProgress<'a> {
    /// Generation number (0 = initial population).
    pub generation: usize,
    /// Best fitness value in the population.
    pub best_fitness: f64,
    /// Mean fitness value.
    pub avg_fitness: f64,
    /// Time since the run started.
    pub elapsed: Duration,
    /// Current best timetable.
    pub best: &'a Timetable,
}

/// Outcome of a run.
#[derive(Debug, Clone)]
pub struct SolveResult {
    /// Best timetable of the final population.
    pub best: Timetable,
    /// Its fitness.
    pub fitness: Fitness,
    /// Generations produced after the initial population.
    pub generations: usize,
    /// Best fitness value per generation, initial population first.
    pub history: Vec<f64>,
    /// Wall-clock duration.
    pub elapsed: Duration,
    /// Why the run stopped.
    pub termination: Termination,
}

/// Generation state machine over one catalog.
pub struct Evolution<'a> {
    catalog: &'a Catalog,
    config: GaConfig,
    evaluator: FitnessEvaluator,
    operators: GeneticOperators,
    population: Population,
    blank: Timetable,
    generation: usize,
    history: Vec<f64>,
    rng: SmallRng,
    start: Instant,
    cancel: Option<Arc<AtomicBool>>,
    termination: Option<Termination>,
}

impl<'a> Evolution<'a> {
    /// Builds and evaluates the initial population.
    ///
    /// An invalid configuration is clamped into range with a warning.
    pub fn new(catalog: &'a Catalog, fixed: &FixedCells, config: &GaConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config.clone(),
            Err(e) => {
                log::warn!("Invalid GA configuration ({}); clamping into range", e);
                config.clamped()
            }
        };

        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        let start = Instant::now();

        let timetables = create_initial_population(
            config.population_size,
            catalog,
            fixed,
            &config,
            &mut rng,
        );
        let evaluator = FitnessEvaluator::new(catalog, config.fitness_mode);
        let mut population = Population::new(timetables, config.fitness_mode);
        population.evaluate(&evaluator, config.parallel);
        population.sort_by_fitness();

        let mut evolution = Self {
            catalog,
            operators: GeneticOperators::from_config(&config),
            evaluator,
            population,
            blank: Timetable::new(catalog, fixed),
            generation: 0,
            history: Vec::new(),
            rng,
            start,
            cancel: None,
            termination: None,
            config,
        };
        evolution.record();
        evolution.check_termination();
        evolution
    }

    /// Attaches a cancel flag, checked at generation boundaries.
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Current population, sorted best first.
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Generations produced so far.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Effective configuration (after clamping).
    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// Whether a termination condition holds.
    pub fn is_finished(&self) -> bool {
        self.termination.is_some()
    }

    /// Termination cause, once finished.
    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }

    /// Produces one generation. Returns `false` if already finished.
    pub fn step(&mut self) -> bool {
        if self.termination.is_some() || self.check_termination() {
            return false;
        }

        let size = self.config.population_size;
        let mode = self.config.fitness_mode;
        let mut next = select_elites(&self.population, self.config.elite_count);

        let parents = self.population.individuals();
        while next.len() < size {
            let a = tournament_select(parents, self.config.tournament_size, &mut self.rng);
            let b = tournament_select(parents, self.config.tournament_size, &mut self.rng);
            let mut child = self.operators.crossover(
                &parents[a].timetable,
                &parents[b].timetable,
                &mut self.rng,
            );
            self.operators.mutate(&mut child, self.catalog, &mut self.rng);
            next.push(Individual::new(child, mode));
        }

        let mut population = Population::from_individuals(next);
        population.evaluate(&self.evaluator, self.config.parallel);
        population.sort_by_fitness();
        self.population = population;
        self.generation += 1;

        self.record();
        self.check_termination();
        true
    }

    /// Runs until a termination condition holds.
    pub fn run(&mut self) -> Termination {
        self.run_with_progress(|_| {})
    }

    /// Runs until a termination condition holds, reporting every
    /// generation (the initial one included) to `progress`.
    pub fn run_with_progress<F>(&mut self, mut progress: F) -> Termination
    where
        F: FnMut(&GaProgress<'_>),
    {
        self.report(&mut progress);
        while self.step() {
            self.report(&mut progress);
        }
        let termination = self.termination.unwrap_or(Termination::GenerationLimit);
        log::info!(
            "GA finished after {} generations ({}), best fitness {:.4}",
            self.generation,
            termination,
            self.history.last().copied().unwrap_or(f64::NEG_INFINITY)
        );
        termination
    }

    /// Consumes the controller and returns the best timetable.
    pub fn into_result(self) -> SolveResult {
        let termination = self.termination.unwrap_or(Termination::GenerationLimit);
        let elapsed = self.start.elapsed();
        let (best, fitness) = match self.population.into_individuals().into_iter().next() {
            Some(ind) => (ind.timetable, ind.fitness),
            None => {
                let fitness = self.evaluator.evaluate(&self.blank);
                (self.blank, fitness)
            }
        };
        SolveResult {
            best,
            fitness,
            generations: self.generation,
            history: self.history,
            elapsed,
            termination,
        }
    }

    fn record(&mut self) {
        let best = self
            .population
            .best()
            .map_or(f64::NEG_INFINITY, |b| b.fitness.value);
        self.history.push(best);
        log::debug!(
            "Generation {}: best {:.4}, avg {:.4}",
            self.generation,
            best,
            self.population.average_fitness()
        );
        if let Some(b) = self.population.best() {
            log::trace!(
                "Generation {} best: {} conflicts, {} placements",
                self.generation,
                b.fitness.conflicts,
                b.timetable.total_placements()
            );
        }
    }

    fn report<F: FnMut(&GaProgress<'_>)>(&self, progress: &mut F) {
        if let Some(best) = self.population.best() {
            progress(&GaProgress {
                generation: self.generation,
                best_fitness: best.fitness.value,
                avg_fitness: self.population.average_fitness(),
                elapsed: self.start.elapsed(),
                best: &best.timetable,
            });
        }
    }

    /// Sets the termination cause if one holds and returns whether it does.
    fn check_termination(&mut self) -> bool {
        if self.termination.is_some() {
            return true;
        }
        let cause = if self
            .cancel
            .as_ref()
            .is_some_and(|c| c.load(Ordering::Relaxed))
        {
            Some(Termination::Cancelled)
        } else if self.config.stop_on_max && self.population.all_at_max() {
            Some(Termination::MaxFitness)
        } else if self.generation >= self.config.generation_limit {
            Some(Termination::GenerationLimit)
        } else if self
            .config
            .time_limit
            .is_some_and(|limit| self.start.elapsed() >= limit)
        {
            Some(Termination::TimeLimit)
        } else {
            None
        };
        self.termination = cause;
        cause.is_some()
    }
}

/// Reusable GA driver with a cancellation handle.
///
/// # Example
///
/// ```
/// use u_timetable::ga::{GaConfig, GaRunner};
/// use u_timetable::models::{Activity, Calendar, Catalog, FixedCells, Track};
///
/// let catalog = Catalog::new(Calendar::uniform(5, 6))
///     .with_activity(Activity::new("C1", "Algebra", 3))
///     .with_track(Track::new("P1"));
/// let runner = GaRunner::new(GaConfig::default().with_seed(42));
/// let result = runner.run(&catalog, &FixedCells::new());
/// assert_eq!(result.best.placement_count(0), 3);
/// ```
#[derive(Debug, Clone)]
pub struct GaRunner {
    config: GaConfig,
    cancelled: Arc<AtomicBool>,
}

impl GaRunner {
    /// Creates a runner.
    pub fn new(config: GaConfig) -> Self {
        Self {
            config,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns a handle to cancel a running solve from another thread.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// Configuration as given.
    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// Runs the GA to completion.
    pub fn run(&self, catalog: &Catalog, fixed: &FixedCells) -> SolveResult {
        self.run_with_progress(catalog, fixed, |_| {})
    }

    /// Runs the GA, reporting every generation to `progress`.
    pub fn run_with_progress<F>(
        &self,
        catalog: &Catalog,
        fixed: &FixedCells,
        progress: F,
    ) -> SolveResult
    where
        F: FnMut(&GaProgress<'_>),
    {
        if let Err(errors) = validate_catalog(catalog) {
            for e in &errors {
                log::warn!("{}", e);
            }
        }
        log::info!(
            "Solving {} activities ({} placements) on {} tracks x {} days x {} slots ({} fixed cells, population {})",
            catalog.activity_count(),
            catalog.required_placements(),
            catalog.track_count(),
            catalog.day_count(),
            catalog.slot_count(),
            fixed.len(),
            self.config.population_size
        );

        let mut evolution =
            Evolution::new(catalog, fixed, &self.config).with_cancel(self.cancel_handle());
        evolution.run_with_progress(progress);
        let result = evolution.into_result();
        if result.fitness.clash {
            warn_clash(catalog, &result.best);
        }
        result
    }
}

fn warn_clash(catalog: &Catalog, best: &Timetable) {
    let Some(clash) = find_resource_clash(best) else {
        return;
    };
    let resource = match clash.kind {
        ResourceKind::Room => catalog.rooms.get(clash.resource),
        ResourceKind::Instructor => catalog.instructors.get(clash.resource),
    };
    let resource = resource.map_or("?", |r| r.id.as_str());
    match catalog.calendar.meeting_slot(clash.day, clash.slot) {
        Some(mt) => log::warn!(
            "Best timetable double-books {:?} {} at {} ({} {})",
            clash.kind,
            resource,
            mt.id,
            mt.day_name,
            mt.label
        ),
        None => log::warn!(
            "Best timetable double-books {:?} {} at day {} slot {}",
            clash.kind,
            resource,
            clash.day,
            clash.slot
        ),
    }
}

/// Optimizes a timetable for `catalog` around the `fixed` cells.
///
/// Never fails: catalog problems are logged and an invalid configuration
/// is clamped. The result is the best individual of the final population.
pub fn solve(catalog: &Catalog, fixed: &FixedCells, config: &GaConfig) -> SolveResult {
    GaRunner::new(config.clone()).run(catalog, fixed)
}

/// [`solve`] with a per-generation progress callback.
pub fn solve_with_progress<F>(
    catalog: &Catalog,
    fixed: &FixedCells,
    config: &GaConfig,
    progress: F,
) -> SolveResult
where
    F: FnMut(&GaProgress<'_>),
{
    GaRunner::new(config.clone()).run_with_progress(catalog, fixed, progress)
}
