//! JSON scheduling requests.
//!
//! A [`ScheduleRequest`] bundles a catalog, raw fixed assignments and GA
//! options:
//!
//! ```json
//! {
//!   "catalog": {
//!     "activities": [{"id": "C1", "name": "Algebra", "frequency": 3}],
//!     "tracks": [{"id": "P1"}],
//!     "calendar": {"days": ["Monday", "Tuesday"], "slots": [{"label": "09:00"}]}
//!   },
//!   "fixed": [{"track": 0, "day": 1, "slot": 0, "value": "blocked"}],
//!   "config": {"population_size": 20, "seed": 7}
//! }
//! ```
//!
//! `fixed` and `config` may be omitted.

use serde::{Deserialize, Serialize};

use crate::export::TimetableExport;
use crate::ga::{solve, GaConfig, SolveResult};
use crate::models::{Catalog, FixedAssignment, FixedCells};
use crate::validation::ValidationError;

/// A complete scheduling request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRequest {
    /// The problem.
    pub catalog: Catalog,
    /// Pre-assigned cells.
    #[serde(default)]
    pub fixed: Vec<FixedAssignment>,
    /// GA options.
    #[serde(default)]
    pub config: GaConfig,
}

/// Result of [`ScheduleRequest::run`].
#[derive(Debug, Clone)]
pub struct ScheduleResponse {
    /// Optimizer outcome.
    pub result: SolveResult,
    /// Per-track tables of the best timetable.
    pub export: TimetableExport,
    /// Fixed entries that were skipped.
    pub warnings: Vec<ValidationError>,
}

impl ScheduleRequest {
    /// A request with no fixed cells and default options.
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            fixed: Vec::new(),
            config: GaConfig::default(),
        }
    }

    /// Adds fixed assignments.
    pub fn with_fixed(mut self, fixed: impl IntoIterator<Item = FixedAssignment>) -> Self {
        self.fixed.extend(fixed);
        self
    }

    /// Replaces the GA options.
    pub fn with_config(mut self, config: GaConfig) -> Self {
        self.config = config;
        self
    }

    /// Parses a request from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes the request as pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Resolves the fixed cells and solves.
    pub fn run(&self) -> ScheduleResponse {
        let (fixed, warnings) = FixedCells::resolve(&self.catalog, &self.fixed);
        let result = solve(&self.catalog, &fixed, &self.config);
        let export = TimetableExport::from_timetable(&self.catalog, &result.best);
        ScheduleResponse {
            result,
            export,
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::ExportCell;
    use crate::models::{Activity, Calendar, Track};
    use crate::validation::ValidationErrorKind;

    const REQUEST: &str = r#"{
        "catalog": {
            "activities": [
                {"id": "C1", "name": "Algebra", "frequency": 2},
                {"id": "C2", "name": "Lab", "frequency": 1, "duration": 2}
            ],
            "tracks": [{"id": "P1", "name": "Panel 1"}],
            "calendar": {
                "days": ["Monday", "Tuesday", "Wednesday"],
                "slots": [{"label": "09:00"}, {"label": "10:00"}, {"label": "11:00"}]
            }
        },
        "fixed": [
            {"track": 0, "day": 2, "slot": 0, "value": "blocked"},
            {"track": 0, "day": 9, "slot": 0, "value": "blocked"}
        ],
        "config": {"population_size": 10, "seed": 3, "parallel": false}
    }"#;

    #[test]
    fn test_from_json() {
        let req = ScheduleRequest::from_json(REQUEST).unwrap();
        assert_eq!(req.catalog.activity_count(), 2);
        assert_eq!(req.catalog.activities[1].duration, 2);
        assert_eq!(req.catalog.slot_count(), 3);
        assert_eq!(req.fixed.len(), 2);
        assert_eq!(req.config.population_size, 10);
        assert_eq!(req.config.generation_limit, 100);
        assert_eq!(req.config.seed, Some(3));
    }

    #[test]
    fn test_defaults_when_omitted() {
        let req = ScheduleRequest::from_json(
            r#"{"catalog": {"activities": [], "tracks": [],
                "calendar": {"days": [], "slots": []}}}"#,
        )
        .unwrap();
        assert!(req.fixed.is_empty());
        assert_eq!(req.config, GaConfig::default());
    }

    #[test]
    fn test_json_round_trip() {
        let req = ScheduleRequest::new(
            Catalog::new(Calendar::uniform(2, 2))
                .with_activity(Activity::new("C1", "Algebra", 1))
                .with_track(Track::new("P1")),
        )
        .with_fixed([FixedAssignment::activity(0, 1, 1, "C1")])
        .with_config(GaConfig::default().with_seed(5));

        let back = ScheduleRequest::from_json(&req.to_json().unwrap()).unwrap();
        assert_eq!(back.fixed, req.fixed);
        assert_eq!(back.config, req.config);
        assert_eq!(back.catalog.activities, req.catalog.activities);
    }

    #[test]
    fn test_run() {
        let req = ScheduleRequest::from_json(REQUEST).unwrap();
        let resp = req.run();

        assert_eq!(resp.warnings.len(), 1);
        assert_eq!(resp.warnings[0].kind, ValidationErrorKind::InvalidFixedCell);
        assert!(resp.result.fitness.is_max());
        let table = &resp.export.tracks[0];
        assert_eq!(table.slots, vec!["09:00", "10:00", "11:00"]);
        assert_eq!(table.cells[2][0], ExportCell::Blocked);
    }
}
