//! Timetable scheduling with a genetic algorithm.
//!
//! Assigns recurring activities (courses, sessions) to a grid of tracks
//! (class sections, panels) x days x slots, honouring pre-fixed cells,
//! and minimizes conflicts with a generational GA.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Activity`, `Track`, `Resource`,
//!   `Calendar`, `Catalog`, `FixedAssignment`
//! - **`validation`**: Input integrity checks (duplicate IDs, frequencies,
//!   durations, instructor refs, capacity)
//! - **`ga`**: Grid chromosome, fitness, operators, evolution controller
//! - **`export`**: Per-track tables and CSV rendering
//! - **`request`**: JSON request bundling catalog, fixed cells and options
//!
//! # Example
//!
//! ```
//! use u_timetable::ga::GaConfig;
//! use u_timetable::models::{Activity, Calendar, Catalog, FixedAssignment, FixedCells, Track};
//!
//! let catalog = Catalog::new(Calendar::uniform(6, 4))
//!     .with_activity(Activity::new("C1", "Algebra", 3))
//!     .with_activity(Activity::new("C2", "Chemistry Lab", 1).with_duration(2))
//!     .with_tracks(Track::numbered(2));
//! let lunch = FixedAssignment::blocked_on_all_tracks(2, 5, 0);
//! let (fixed, warnings) = FixedCells::resolve(&catalog, &lunch);
//! assert!(warnings.is_empty());
//!
//! let result = u_timetable::solve(&catalog, &fixed, &GaConfig::default().with_seed(42));
//! assert!(result.best.fixed_cells_intact(&fixed));
//! ```
//!
//! # References
//!
//! - Burke & Petrovic (2002), "Recent research directions in automated
//!   timetabling"
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization and
//!   Machine Learning"

pub mod export;
pub mod ga;
pub mod models;
pub mod request;
pub mod validation;

pub use ga::{solve, GaConfig, SolveResult};
