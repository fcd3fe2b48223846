//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the evolutionary loop.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::fitness::FitnessMode;
use super::operators::CrossoverType;

/// Configuration for the timetabling GA.
///
/// # Defaults
///
/// ```
/// use u_timetable::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 50);
/// assert_eq!(config.generation_limit, 100);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_timetable::ga::{CrossoverType, GaConfig};
///
/// let config = GaConfig::default()
///     .with_population_size(20)
///     .with_crossover(CrossoverType::SplitPoint)
///     .with_mutation_rate(0.1)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaConfig {
    /// Number of individuals in the population.
    pub population_size: usize,

    /// Maximum number of generations before termination.
    pub generation_limit: usize,

    /// Individuals copied unchanged into the next generation.
    pub elite_count: usize,

    /// Candidates drawn per tournament.
    pub tournament_size: usize,

    /// Per-cell probability of a mutation attempt, within [0, 1].
    pub mutation_rate: f64,

    /// Crossover strategy.
    pub crossover: CrossoverType,

    /// Objective reported by the evaluator.
    pub fitness_mode: FitnessMode,

    /// Attempts per required placement during initialization.
    ///
    /// An activity of frequency `f` gets `f * placement_attempts` tries
    /// at random (track, day) positions.
    pub placement_attempts: usize,

    /// Stop as soon as every individual is at maximum fitness.
    pub stop_on_max: bool,

    /// Wall-clock budget, checked at generation boundaries.
    #[serde(with = "duration_ms")]
    pub time_limit: Option<Duration>,

    /// Whether to evaluate individuals in parallel using rayon.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generation_limit: 100,
            elite_count: 1,
            tournament_size: 3,
            mutation_rate: 0.05,
            crossover: CrossoverType::Uniform,
            fitness_mode: FitnessMode::Conflicts,
            placement_attempts: 100,
            stop_on_max: true,
            time_limit: None,
            parallel: true,
            seed: None,
        }
    }
}

/// Invalid configuration parameter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Fewer than two individuals.
    #[error("population_size must be at least 2 (got {0})")]
    PopulationTooSmall(usize),
    /// Zero generations.
    #[error("generation_limit must be at least 1")]
    NoGenerations,
    /// Elites would fill the whole population.
    #[error("elite_count {elite} must be below population_size {population}")]
    TooManyElites {
        /// Requested elites.
        elite: usize,
        /// Population size.
        population: usize,
    },
    /// Empty tournament.
    #[error("tournament_size must be at least 1")]
    EmptyTournament,
    /// Rate outside `[0, 1]` or not a number.
    #[error("mutation_rate must be within [0, 1] (got {0})")]
    InvalidMutationRate(f64),
    /// Zero placement attempts.
    #[error("placement_attempts must be at least 1")]
    NoPlacementAttempts,
}

impl GaConfig {
    /// Small resource-aware preset: population 9, one elite, tournament 3,
    /// mutation 0.1.
    pub fn compact() -> Self {
        Self {
            population_size: 9,
            elite_count: 1,
            tournament_size: 3,
            mutation_rate: 0.1,
            fitness_mode: FitnessMode::ResourceAware,
            ..Self::default()
        }
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the generation limit.
    pub fn with_generation_limit(mut self, n: usize) -> Self {
        self.generation_limit = n;
        self
    }

    /// Sets the elite count.
    pub fn with_elite_count(mut self, n: usize) -> Self {
        self.elite_count = n;
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.tournament_size = k;
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the crossover strategy.
    pub fn with_crossover(mut self, crossover: CrossoverType) -> Self {
        self.crossover = crossover;
        self
    }

    /// Sets the fitness mode.
    pub fn with_fitness_mode(mut self, mode: FitnessMode) -> Self {
        self.fitness_mode = mode;
        self
    }

    /// Sets the placement attempts per required placement.
    pub fn with_placement_attempts(mut self, n: usize) -> Self {
        self.placement_attempts = n;
        self
    }

    /// Enables or disables stopping at maximum fitness.
    pub fn with_stop_on_max(mut self, stop: bool) -> Self {
        self.stop_on_max = stop;
        self
    }

    /// Sets the wall-clock budget.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// Returns the first invalid parameter found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size < 2 {
            return Err(ConfigError::PopulationTooSmall(self.population_size));
        }
        if self.generation_limit == 0 {
            return Err(ConfigError::NoGenerations);
        }
        if self.elite_count >= self.population_size {
            return Err(ConfigError::TooManyElites {
                elite: self.elite_count,
                population: self.population_size,
            });
        }
        if self.tournament_size == 0 {
            return Err(ConfigError::EmptyTournament);
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::InvalidMutationRate(self.mutation_rate));
        }
        if self.placement_attempts == 0 {
            return Err(ConfigError::NoPlacementAttempts);
        }
        Ok(())
    }

    /// Returns a copy with every parameter forced into range.
    ///
    /// A valid configuration is returned unchanged.
    pub fn clamped(&self) -> Self {
        let population_size = self.population_size.max(2);
        let mutation_rate = if self.mutation_rate.is_nan() {
            0.0
        } else {
            self.mutation_rate.clamp(0.0, 1.0)
        };
        Self {
            population_size,
            generation_limit: self.generation_limit.max(1),
            elite_count: self.elite_count.min(population_size - 1),
            tournament_size: self.tournament_size.max(1),
            mutation_rate,
            placement_attempts: self.placement_attempts.max(1),
            ..self.clone()
        }
    }
}

/// Serializes `Option<Duration>` as optional milliseconds.
mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_some(&(d.as_millis() as u64)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_millis))
    }
}
