//! Timetabling domain models.
//!
//! Plain data types describing the scheduling universe (the catalog) and
//! the cells pinned before optimization starts.
//!
//! # Domain Mappings
//!
//! | u-timetable | University | School | Clinic |
//! |-------------|-----------|--------|--------|
//! | Activity | Course | Subject | Session type |
//! | Track | Panel / Section | Class | Ward |
//! | Resource | Room / Lecturer | Room / Teacher | Room / Doctor |
//! | Fixed cell | Lunch break | Assembly | Staff meeting |

mod activity;
mod calendar;
mod catalog;
mod fixed;
mod resource;
mod track;

pub use activity::Activity;
pub use calendar::{
    clock_ms, format_clock, Calendar, MeetingSlot, SlotAxis, SlotDef, TimeWindow, HOUR_MS,
    MINUTE_MS, SIX_DAY_WEEK, WEEKDAYS,
};
pub use catalog::Catalog;
pub use fixed::{FixedAssignment, FixedCell, FixedCells, FixedEntry, FixedValue};
pub use resource::{Resource, ResourceKind};
pub use track::Track;
