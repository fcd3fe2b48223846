//! Tabular views of a timetable.
//!
//! [`TimetableExport`] turns a grid into one `days x slots` table per
//! track, with names resolved from the catalog. [`TrackTable::to_csv`]
//! renders a table with a header row of slot labels and one row per day.

use std::fmt;

use serde::Serialize;

use crate::ga::{Cell, Timetable};
use crate::models::Catalog;

/// One rendered cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportCell {
    /// Free.
    Empty,
    /// Activity name.
    Activity(String),
    /// Unavailable.
    Blocked,
}

impl fmt::Display for ExportCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportCell::Empty => Ok(()),
            ExportCell::Activity(name) => f.write_str(name),
            ExportCell::Blocked => f.write_str("blocked"),
        }
    }
}

/// The week of one track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackTable {
    /// Track display name.
    pub track: String,
    /// Day labels (rows).
    pub days: Vec<String>,
    /// Slot labels (columns).
    pub slots: Vec<String>,
    /// `cells[day][slot]`.
    pub cells: Vec<Vec<ExportCell>>,
}

impl TrackTable {
    /// Renders the table as CSV.
    ///
    /// The header row is `Day` followed by the slot labels; each following
    /// row starts with the day label.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        push_row(
            &mut out,
            std::iter::once("Day".to_string()).chain(self.slots.iter().cloned()),
        );
        for (day, row) in self.days.iter().zip(&self.cells) {
            push_row(
                &mut out,
                std::iter::once(day.clone()).chain(row.iter().map(|c| c.to_string())),
            );
        }
        out
    }
}

/// Per-track tables for a whole timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimetableExport {
    /// One table per track, in catalog order.
    pub tracks: Vec<TrackTable>,
}

impl TimetableExport {
    /// Builds the tables. Labels come from the catalog; a grid larger than
    /// the catalog falls back to numbered labels.
    pub fn from_timetable(catalog: &Catalog, tt: &Timetable) -> Self {
        let days: Vec<String> = (0..tt.day_count())
            .map(|d| {
                catalog
                    .calendar
                    .days
                    .get(d)
                    .cloned()
                    .unwrap_or_else(|| format!("Day {}", d + 1))
            })
            .collect();
        let slot_labels = catalog.calendar.slots.labels();
        let slots: Vec<String> = (0..tt.slot_count())
            .map(|s| {
                slot_labels
                    .get(s)
                    .cloned()
                    .unwrap_or_else(|| format!("S{}", s + 1))
            })
            .collect();

        let tracks = (0..tt.track_count())
            .map(|t| {
                let track = catalog
                    .tracks
                    .get(t)
                    .map(|tr| tr.display_name().to_string())
                    .unwrap_or_else(|| format!("Track {}", t + 1));
                let cells = (0..tt.day_count())
                    .map(|d| {
                        tt.day_cells(t, d)
                            .iter()
                            .map(|c| export_cell(catalog, c))
                            .collect()
                    })
                    .collect();
                TrackTable {
                    track,
                    days: days.clone(),
                    slots: slots.clone(),
                    cells,
                }
            })
            .collect();

        Self { tracks }
    }

    /// All tables as CSV blocks, each preceded by its track name and
    /// separated by a blank line.
    pub fn to_csv(&self) -> String {
        self.tracks
            .iter()
            .map(|t| format!("# {}\n{}", t.track, t.to_csv()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn export_cell(catalog: &Catalog, cell: &Cell) -> ExportCell {
    match cell {
        Cell::Empty => ExportCell::Empty,
        Cell::Blocked => ExportCell::Blocked,
        Cell::Placed(p) => match catalog.activities.get(p.activity) {
            Some(a) => ExportCell::Activity(a.name.clone()),
            None => ExportCell::Activity(format!("#{}", p.activity)),
        },
    }
}

fn push_row(out: &mut String, fields: impl Iterator<Item = String>) {
    for (i, field) in fields.enumerate() {
        if i > 0 {
            out.push(',');
        }
        if field.contains([',', '"', '\n', '\r']) {
            out.push('"');
            out.push_str(&field.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(&field);
        }
    }
    out.push('\n');
}
