//! Initial population and fitness-ordered collections of individuals.

use rand::seq::SliceRandom;
use rand::Rng;
use rayon::prelude::*;

use super::config::GaConfig;
use super::fitness::{Fitness, FitnessEvaluator, FitnessMode};
use super::timetable::Timetable;
use crate::models::{Catalog, FixedCells};

/// A timetable with its evaluated fitness.
#[derive(Debug, Clone)]
pub struct Individual {
    /// The candidate.
    pub timetable: Timetable,
    /// Fitness as of the last evaluation.
    pub fitness: Fitness,
}

impl Individual {
    /// Wraps an unevaluated timetable.
    pub fn new(timetable: Timetable, mode: FitnessMode) -> Self {
        Self {
            timetable,
            fitness: Fitness::unevaluated(mode),
        }
    }
}

/// Builds `size` random timetables.
///
/// Each starts from the fixed cells. Activities are visited in a shuffled
/// order; each one is placed at uniformly drawn (track, day) positions until
/// it reaches its frequency (fixed occurrences included) or runs out of
/// `frequency * placement_attempts` tries. A shortfall is left for the
/// evaluator to penalize.
pub fn create_initial_population<R: Rng>(
    size: usize,
    catalog: &Catalog,
    fixed: &FixedCells,
    config: &GaConfig,
    rng: &mut R,
) -> Vec<Timetable> {
    let template = Timetable::new(catalog, fixed);
    let mut order: Vec<usize> = (0..catalog.activity_count()).collect();

    (0..size)
        .map(|_| {
            let mut tt = template.clone();
            order.shuffle(rng);
            for &activity in &order {
                fill_activity(&mut tt, catalog, activity, config.placement_attempts, rng);
            }
            tt
        })
        .collect()
}

fn fill_activity<R: Rng>(
    tt: &mut Timetable,
    catalog: &Catalog,
    activity: usize,
    placement_attempts: usize,
    rng: &mut R,
) {
    let (tracks, days) = (tt.track_count(), tt.day_count());
    if tracks == 0 || days == 0 {
        return;
    }
    let frequency = tt.frequency(activity);
    let needed = frequency.saturating_sub(tt.placement_count(activity));
    let budget = frequency as usize * placement_attempts;

    let mut placed = 0;
    let mut attempts = 0;
    while placed < needed && attempts < budget {
        let track = rng.random_range(0..tracks);
        let day = rng.random_range(0..days);
        if tt.place(catalog, activity, track, day, rng) {
            placed += 1;
        }
        attempts += 1;
    }

    if placed < needed {
        log::debug!(
            "Activity '{}' placed {} of {} after {} attempts",
            catalog.activities[activity].id,
            placed,
            needed,
            attempts
        );
    }
}

/// Individuals of one generation.
#[derive(Debug, Clone)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    /// Wraps unevaluated timetables.
    pub fn new(timetables: Vec<Timetable>, mode: FitnessMode) -> Self {
        Self {
            individuals: timetables
                .into_iter()
                .map(|tt| Individual::new(tt, mode))
                .collect(),
        }
    }

    /// Wraps individuals as they are.
    pub fn from_individuals(individuals: Vec<Individual>) -> Self {
        Self { individuals }
    }

    /// Scores every individual, across the rayon pool when `parallel`.
    pub fn evaluate(&mut self, evaluator: &FitnessEvaluator, parallel: bool) {
        if parallel {
            self.individuals.par_iter_mut().for_each(|ind| {
                ind.fitness = evaluator.evaluate(&ind.timetable);
            });
        } else {
            for ind in &mut self.individuals {
                ind.fitness = evaluator.evaluate(&ind.timetable);
            }
        }
    }

    /// Sorts by fitness, best first. Stable: equal fitness keeps order.
    pub fn sort_by_fitness(&mut self) {
        self.individuals
            .sort_by(|a, b| b.fitness.value.total_cmp(&a.fitness.value));
    }

    /// First individual (the best once sorted).
    pub fn best(&self) -> Option<&Individual> {
        self.individuals.first()
    }

    /// Number of individuals.
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    /// Whether the population is empty.
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// All individuals in current order.
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// Consumes the population.
    pub fn into_individuals(self) -> Vec<Individual> {
        self.individuals
    }

    /// Mean fitness value; 0.0 when empty.
    pub fn average_fitness(&self) -> f64 {
        if self.individuals.is_empty() {
            return 0.0;
        }
        self.individuals.iter().map(|i| i.fitness.value).sum::<f64>()
            / self.individuals.len() as f64
    }

    /// Whether every individual is at maximum fitness.
    pub fn all_at_max(&self) -> bool {
        !self.individuals.is_empty() && self.individuals.iter().all(|i| i.fitness.is_max())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Activity, Calendar, FixedAssignment, Track};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn sample_catalog() -> Catalog {
        Catalog::new(Calendar::uniform(5, 6))
            .with_activity(Activity::new("C1", "Algebra", 3))
            .with_activity(Activity::new("C2", "Lab", 2).with_duration(2))
            .with_activity(Activity::new("C3", "History", 1))
            .with_tracks(Track::numbered(3))
    }

    #[test]
    fn test_initial_population_size_and_frequency() {
        let catalog = sample_catalog();
        let mut rng = SmallRng::seed_from_u64(42);
        let pop = create_initial_population(
            10,
            &catalog,
            &FixedCells::new(),
            &GaConfig::default(),
            &mut rng,
        );

        assert_eq!(pop.len(), 10);
        for tt in &pop {
            // Plenty of room: every activity reaches its frequency.
            assert_eq!(tt.placements(), &[3, 2, 1]);
        }
    }

    #[test]
    fn test_initial_population_keeps_fixed() {
        let catalog = sample_catalog();
        let fixed = FixedCells::resolve(
            &catalog,
            &[
                FixedAssignment::blocked(0, 4, 0),
                FixedAssignment::activity(1, 0, 0, "C1"),
            ],
        )
        .0;
        let mut rng = SmallRng::seed_from_u64(42);
        let pop = create_initial_population(5, &catalog, &fixed, &GaConfig::default(), &mut rng);

        for tt in &pop {
            assert!(tt.fixed_cells_intact(&fixed));
            // The fixed C1 occurrence counts toward its frequency.
            assert_eq!(tt.placement_count(0), 3);
        }
    }

    #[test]
    fn test_initial_population_shortfall() {
        let catalog = Catalog::new(Calendar::uniform(1, 2))
            .with_activity(Activity::new("C1", "Algebra", 5))
            .with_track(Track::new("P1"));
        let mut rng = SmallRng::seed_from_u64(42);
        let config = GaConfig::default().with_placement_attempts(3);
        let pop = create_initial_population(2, &catalog, &FixedCells::new(), &config, &mut rng);

        for tt in &pop {
            assert_eq!(tt.placement_count(0), 2);
        }
    }

    #[test]
    fn test_sort_by_fitness_stable_descending() {
        let catalog = sample_catalog();
        let base = Timetable::new(&catalog, &FixedCells::new());
        let mut individuals: Vec<Individual> = [-3.0, -1.0, -3.0, 0.0]
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let mut ind = Individual::new(base.clone(), FitnessMode::Conflicts);
                ind.fitness.value = v;
                ind.fitness.conflicts = i as u32;
                ind
            })
            .collect();
        individuals[0].fitness.conflicts = 100;

        let mut pop = Population::from_individuals(individuals);
        pop.sort_by_fitness();

        let values: Vec<f64> = pop.individuals().iter().map(|i| i.fitness.value).collect();
        assert_eq!(values, vec![0.0, -1.0, -3.0, -3.0]);
        // Equal values keep their original order.
        assert_eq!(pop.individuals()[2].fitness.conflicts, 100);
        assert_eq!(pop.individuals()[3].fitness.conflicts, 2);
        assert_eq!(pop.best().unwrap().fitness.value, 0.0);
    }

    #[test]
    fn test_parallel_and_sequential_evaluation_agree() {
        let catalog = sample_catalog();
        let mut rng = SmallRng::seed_from_u64(7);
        let timetables = create_initial_population(
            8,
            &catalog,
            &FixedCells::new(),
            &GaConfig::default(),
            &mut rng,
        );
        let evaluator = FitnessEvaluator::new(&catalog, FitnessMode::Conflicts);

        let mut seq = Population::new(timetables.clone(), FitnessMode::Conflicts);
        seq.evaluate(&evaluator, false);
        let mut par = Population::new(timetables, FitnessMode::Conflicts);
        par.evaluate(&evaluator, true);

        for (a, b) in seq.individuals().iter().zip(par.individuals()) {
            assert_eq!(a.fitness, b.fitness);
        }
    }

    #[test]
    fn test_average_and_all_at_max() {
        let catalog = sample_catalog();
        let base = Timetable::new(&catalog, &FixedCells::new());
        let mut a = Individual::new(base.clone(), FitnessMode::Conflicts);
        a.fitness.value = 0.0;
        let mut b = Individual::new(base, FitnessMode::Conflicts);
        b.fitness.value = -2.0;

        let pop = Population::from_individuals(vec![a.clone(), b]);
        assert!((pop.average_fitness() + 1.0).abs() < 1e-10);
        assert!(!pop.all_at_max());
        assert!(Population::from_individuals(vec![a]).all_at_max());
        assert!(!Population::from_individuals(Vec::new()).all_at_max());
    }
}
