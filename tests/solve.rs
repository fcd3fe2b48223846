use rand::rngs::SmallRng;
use rand::SeedableRng;

use u_timetable::export::{ExportCell, TimetableExport};
use u_timetable::ga::{
    solve, Cell, CrossoverType, Evolution, FitnessEvaluator, FitnessMode, GaConfig, Timetable,
};
use u_timetable::models::{
    Activity, Calendar, Catalog, FixedAssignment, FixedCells, Resource, Track,
};
use u_timetable::request::ScheduleRequest;

fn university_catalog() -> Catalog {
    Catalog::new(Calendar::uniform(6, 6))
        .with_activity(Activity::new("C1", "Algebra", 3))
        .with_activity(Activity::new("C2", "Physics", 2))
        .with_activity(Activity::new("C3", "Chemistry Lab", 1).with_duration(2))
        .with_activity(Activity::new("C4", "History", 2))
        .with_tracks(Track::numbered(3))
}

#[test]
fn test_single_activity_scenario() {
    let catalog = Catalog::new(Calendar::uniform(1, 4))
        .with_activity(Activity::new("C1", "Algebra", 2))
        .with_track(Track::new("P1"));
    let config = GaConfig::default()
        .with_population_size(4)
        .with_generation_limit(50)
        .with_seed(42);

    let result = solve(&catalog, &FixedCells::new(), &config);

    assert!(result.generations <= 50);
    assert!(result.fitness.is_max());
    let used: Vec<usize> = (0..4)
        .filter(|&s| result.best.cell(0, 0, s).activity() == Some(0))
        .collect();
    assert_eq!(used.len(), 2);
}

#[test]
fn test_population_size_constant() {
    let catalog = university_catalog();
    let config = GaConfig::default()
        .with_population_size(12)
        .with_elite_count(2)
        .with_generation_limit(10)
        .with_stop_on_max(false)
        .with_seed(1);
    let mut evo = Evolution::new(&catalog, &FixedCells::new(), &config);

    assert_eq!(evo.population().len(), 12);
    while evo.step() {
        assert_eq!(evo.population().len(), 12);
    }
    assert_eq!(evo.generation(), 10);
}

#[test]
fn test_blocked_cell_stays_blocked() {
    let catalog = university_catalog();
    let fixed = FixedCells::resolve(&catalog, &[FixedAssignment::blocked(0, 5, 0)]).0;

    for crossover in [CrossoverType::Uniform, CrossoverType::SplitPoint] {
        let config = GaConfig::default()
            .with_population_size(10)
            .with_generation_limit(30)
            .with_stop_on_max(false)
            .with_mutation_rate(0.2)
            .with_crossover(crossover)
            .with_seed(7);
        let mut evo = Evolution::new(&catalog, &fixed, &config);
        loop {
            for ind in evo.population().individuals() {
                assert_eq!(ind.timetable.cell(0, 5, 0), Cell::Blocked);
            }
            if !evo.step() {
                break;
            }
        }
    }
}

#[test]
fn test_fixed_activity_and_lunch_break() {
    let catalog = university_catalog();
    let mut raw = FixedAssignment::blocked_on_all_tracks(3, 5, 0);
    raw.push(FixedAssignment::activity(2, 0, 0, "C1"));
    let (fixed, warnings) = FixedCells::resolve(&catalog, &raw);
    assert!(warnings.is_empty());

    let result = solve(&catalog, &fixed, &GaConfig::default().with_seed(11));

    assert!(result.best.fixed_cells_intact(&fixed));
    assert_eq!(result.best.cell(2, 0, 0).activity(), Some(0));
}

#[test]
fn test_shared_instructor_clash_scores_zero() {
    let catalog = Catalog::new(Calendar::uniform(5, 4))
        .with_activity(Activity::new("C1", "Algebra", 1).with_instructor("I1"))
        .with_activity(Activity::new("C2", "Physics", 1).with_instructor("I1"))
        .with_tracks(Track::numbered(2))
        .with_room(Resource::room("R1"))
        .with_room(Resource::room("R2"))
        .with_instructor(Resource::instructor("I1"));
    let evaluator = FitnessEvaluator::new(&catalog, FitnessMode::ResourceAware);
    let mut tt = Timetable::new(&catalog, &FixedCells::new());
    let mut rng = SmallRng::seed_from_u64(42);

    assert!(tt.place_at(&catalog, 0, 0, 2, 1, &mut rng));
    assert!(tt.place_at(&catalog, 1, 1, 2, 1, &mut rng));

    let fitness = evaluator.evaluate(&tt);
    assert!(fitness.clash);
    assert_eq!(fitness.value, 0.0);
}

#[test]
fn test_seeded_runs_reproducible() {
    let catalog = university_catalog();
    let config = GaConfig::default()
        .with_population_size(16)
        .with_generation_limit(25)
        .with_stop_on_max(false)
        .with_parallel(true)
        .with_seed(2024);

    let a = solve(&catalog, &FixedCells::new(), &config);
    let b = solve(&catalog, &FixedCells::new(), &config);
    let c = solve(&catalog, &FixedCells::new(), &config.clone().with_parallel(false));

    assert_eq!(a.best, b.best);
    assert_eq!(a.history, b.history);
    assert_eq!(a.best, c.best);
    assert_eq!(a.history, c.history);
}

#[test]
fn test_university_calendar_slots() {
    let calendar = Calendar::university();
    assert_eq!(calendar.day_count(), 5);
    assert_eq!(calendar.slot_count(), 10);

    let labels = calendar.slots.labels();
    assert_eq!(labels.first().map(String::as_str), Some("08:30"));
    assert!(!labels.iter().any(|l| l == "12:45" || l == "13:00"));
}

#[test]
fn test_export_best_timetable() {
    let catalog = university_catalog();
    let fixed = FixedCells::resolve(&catalog, &FixedAssignment::blocked_on_all_tracks(3, 5, 0)).0;
    let result = solve(&catalog, &fixed, &GaConfig::default().with_seed(5));
    let export = TimetableExport::from_timetable(&catalog, &result.best);

    assert_eq!(export.tracks.len(), 3);
    for table in &export.tracks {
        assert_eq!(table.cells[5][0], ExportCell::Blocked);
        let csv = table.to_csv();
        assert_eq!(csv.lines().count(), 7);
        assert!(csv.starts_with("Day,S1,S2,S3,S4,S5,S6\n"));
    }
}

#[test]
fn test_request_end_to_end() {
    let json = r#"{
        "catalog": {
            "activities": [
                {"id": "C1", "name": "Algebra", "frequency": 2},
                {"id": "C2", "name": "Physics", "frequency": 1}
            ],
            "tracks": [{"id": "P1"}, {"id": "P2"}],
            "calendar": {
                "days": ["Monday", "Tuesday"],
                "slots": [{"label": "09:00"}, {"label": "10:00"}]
            }
        },
        "fixed": [{"track": 1, "day": 1, "slot": 1, "value": {"activity": "C2"}}],
        "config": {"population_size": 8, "seed": 17}
    }"#;
    let response = ScheduleRequest::from_json(json).unwrap().run();

    assert!(response.warnings.is_empty());
    assert_eq!(
        response.export.tracks[1].cells[1][1],
        ExportCell::Activity("Physics".into())
    );
}
