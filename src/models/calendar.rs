//! Week calendar: day axis, slot axis, and meeting slots.
//!
//! The timetable grid is `days x slots`. The slot axis is either a plain
//! count of equal-width slots or is carved from a working-hours window
//! minus a lunch break.
//!
//! # Time Model
//! Clock times are milliseconds since midnight. `TimeWindow` is
//! half-open: it includes its start and excludes its end.
//!
//! # Slot Generation
//! Starting at the window start and stepping by the slot length while the
//! start is before the window end, a slot is kept iff its start lies
//! outside the lunch window. Only the start is tested, so a slot that
//! begins before lunch is kept even when it runs into it.

use serde::{Deserialize, Serialize};

/// Milliseconds per minute.
pub const MINUTE_MS: i64 = 60_000;
/// Milliseconds per hour.
pub const HOUR_MS: i64 = 60 * MINUTE_MS;

/// Monday through Friday.
pub const WEEKDAYS: [&str; 5] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];

/// Monday through Saturday.
pub const SIX_DAY_WEEK: [&str; 6] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Milliseconds since midnight for a wall-clock time.
#[inline]
pub fn clock_ms(hour: i64, minute: i64) -> i64 {
    hour * HOUR_MS + minute * MINUTE_MS
}

/// Formats milliseconds since midnight as `HH:MM`.
pub fn format_clock(ms: i64) -> String {
    let minutes = ms.div_euclid(MINUTE_MS);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// A time interval [start, end).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeWindow {
    /// Interval start (ms, inclusive).
    pub start_ms: i64,
    /// Interval end (ms, exclusive).
    pub end_ms: i64,
}

impl TimeWindow {
    /// Creates a new time window.
    pub fn new(start_ms: i64, end_ms: i64) -> Self {
        Self { start_ms, end_ms }
    }

    /// Creates a window from wall-clock `(hour, minute)` pairs.
    pub fn clock(start: (i64, i64), end: (i64, i64)) -> Self {
        Self::new(clock_ms(start.0, start.1), clock_ms(end.0, end.1))
    }

    /// Whether a timestamp falls within this window.
    #[inline]
    pub fn contains(&self, time_ms: i64) -> bool {
        time_ms >= self.start_ms && time_ms < self.end_ms
    }
}

/// One position on the slot axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotDef {
    /// Column label used by exports.
    pub label: String,
    /// Clock start, when the axis was generated from working hours.
    #[serde(default)]
    pub start_ms: Option<i64>,
}

/// The slot axis of every day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotAxis {
    slots: Vec<SlotDef>,
}

impl SlotAxis {
    /// `count` equal-width slots labelled `S1`..`Sn`.
    pub fn uniform(count: usize) -> Self {
        Self::labelled((1..=count).map(|i| format!("S{i}")))
    }

    /// One slot per caller-supplied label.
    pub fn labelled<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            slots: labels
                .into_iter()
                .map(|l| SlotDef {
                    label: l.into(),
                    start_ms: None,
                })
                .collect(),
        }
    }

    /// Slots carved from `hours` in steps of `slot_ms`, skipping starts
    /// inside `lunch`.
    pub fn working_hours(hours: TimeWindow, lunch: Option<TimeWindow>, slot_ms: i64) -> Self {
        let mut slots = Vec::new();
        if slot_ms <= 0 {
            return Self { slots };
        }
        let mut current = hours.start_ms;
        while current < hours.end_ms {
            if !lunch.is_some_and(|l| l.contains(current)) {
                slots.push(SlotDef {
                    label: format_clock(current),
                    start_ms: Some(current),
                });
            }
            current += slot_ms;
        }
        Self { slots }
    }

    /// 08:30-17:45 in one-hour slots with lunch 12:45-13:30.
    pub fn university() -> Self {
        Self::working_hours(
            TimeWindow::clock((8, 30), (17, 45)),
            Some(TimeWindow::clock((12, 45), (13, 30))),
            HOUR_MS,
        )
    }

    /// Number of slots per day.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the axis has no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot definitions in axis order.
    pub fn slots(&self) -> &[SlotDef] {
        &self.slots
    }

    /// Column labels in axis order.
    pub fn labels(&self) -> Vec<String> {
        self.slots.iter().map(|s| s.label.clone()).collect()
    }
}

/// A concrete (day, slot) meeting time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingSlot {
    /// Identifier, numbered across the week (`MT1`, `MT2`, ...).
    pub id: String,
    /// Day index.
    pub day: usize,
    /// Slot index within the day.
    pub slot: usize,
    /// Day name.
    pub day_name: String,
    /// Slot label (`HH:MM` for generated axes).
    pub label: String,
    /// Clock start, if known.
    pub start_ms: Option<i64>,
}

/// Day axis plus slot axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    /// Day names in grid order.
    pub days: Vec<String>,
    /// Slot axis shared by every day.
    pub slots: SlotAxis,
}

impl Calendar {
    /// Creates a calendar.
    pub fn new<I, S>(days: I, slots: SlotAxis) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            days: days.into_iter().map(Into::into).collect(),
            slots,
        }
    }

    /// `day_count` days with `slot_count` uniform slots. Days take weekday
    /// names up to Saturday and `Day n` beyond six.
    pub fn uniform(day_count: usize, slot_count: usize) -> Self {
        let days = if day_count <= SIX_DAY_WEEK.len() {
            SIX_DAY_WEEK[..day_count].iter().map(|d| d.to_string()).collect()
        } else {
            (1..=day_count).map(|i| format!("Day {i}")).collect()
        };
        Self {
            days,
            slots: SlotAxis::uniform(slot_count),
        }
    }

    /// Monday-Friday with [`SlotAxis::university`] slots.
    pub fn university() -> Self {
        Self::new(WEEKDAYS, SlotAxis::university())
    }

    /// Number of days.
    #[inline]
    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    /// Number of slots per day.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// The meeting time at `(day, slot)`, or `None` off the grid.
    pub fn meeting_slot(&self, day: usize, slot: usize) -> Option<MeetingSlot> {
        let day_name = self.days.get(day)?;
        let def = self.slots.slots().get(slot)?;
        Some(MeetingSlot {
            id: format!("MT{}", day * self.slot_count() + slot + 1),
            day,
            slot,
            day_name: day_name.clone(),
            label: def.label.clone(),
            start_ms: def.start_ms,
        })
    }
}
