//! GA-based timetable optimization.
//!
//! A generational genetic algorithm over dense grid chromosomes.
//!
//! # Encoding
//!
//! Each individual is a [`Timetable`]: a `tracks x days x slots` grid of
//! cells, each empty, blocked, or holding a placed activity with its drawn
//! instructor and room. Fixed cells are masked and never written by the
//! operators.
//!
//! # Submodules
//!
//! - [`timetable`]: the chromosome, feasibility and placement
//! - [`fitness`]: conflict count and resource-aware scoring
//! - [`population`]: randomized constructive initialization
//! - [`operators`]: selection, runtime-selectable crossover, mutation
//! - [`config`]: [`GaConfig`]
//! - [`runner`]: the evolution controller and [`solve`]
//!
//! # Example
//!
//! ```
//! use u_timetable::ga::{solve, GaConfig};
//! use u_timetable::models::{Activity, Calendar, Catalog, FixedCells, Track};
//!
//! let catalog = Catalog::new(Calendar::uniform(1, 4))
//!     .with_activity(Activity::new("C1", "Algebra", 2))
//!     .with_track(Track::new("P1"));
//! let result = solve(&catalog, &FixedCells::new(), &GaConfig::default().with_seed(1));
//! assert!(result.fitness.is_max());
//! ```

pub mod config;
pub mod fitness;
pub mod operators;
pub mod population;
pub mod runner;
pub mod timetable;

pub use config::{ConfigError, GaConfig};
pub use fitness::{conflict_count, find_resource_clash, Clash, Fitness, FitnessEvaluator, FitnessMode};
pub use operators::{CrossoverType, GeneticOperators};
pub use population::{create_initial_population, Individual, Population};
pub use runner::{
    solve, solve_with_progress, Evolution, GaProgress, GaRunner, SolveResult, Termination,
};
pub use timetable::{Cell, Placement, Timetable};
