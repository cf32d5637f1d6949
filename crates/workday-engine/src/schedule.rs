//! Compiled calendar data: intervals, day schedules, and the immutable
//! calendar snapshot the engine runs on.

use std::collections::{HashMap, HashSet};

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike, Weekday};
use chrono_tz::Tz;

use crate::config::RawConfig;

/// The last representable instant of a day. `24:00` compiles to this value so
/// that a range ending at midnight stays inside its own date.
pub const END_OF_DAY: NaiveTime = match NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999) {
    Some(t) => t,
    None => NaiveTime::MIN,
};

/// A half-open `[start, end)` range of wall-clock time within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkingInterval {
    start: NaiveTime,
    end: NaiveTime,
}

impl WorkingInterval {
    pub(crate) fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// Start as whole seconds since midnight.
    pub fn start_seconds(&self) -> u32 {
        self.start.num_seconds_from_midnight()
    }

    /// End as whole seconds since midnight; a `24:00` end reports `86400`.
    pub fn end_seconds(&self) -> u32 {
        if self.end == END_OF_DAY {
            86_400
        } else {
            self.end.num_seconds_from_midnight()
        }
    }

    /// Forward membership: `start <= time < end`.
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.start <= time && time < self.end
    }

    /// Backward membership: `start < time <= end`.
    pub fn contains_backward(&self, time: NaiveTime) -> bool {
        self.start < time && time <= self.end
    }
}

/// Sorted, non-overlapping, non-empty list of intervals for one day.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DaySchedule {
    intervals: Vec<WorkingInterval>,
}

impl DaySchedule {
    /// Callers must pass intervals already sorted and disjoint; the compiler
    /// is the only producer.
    pub(crate) fn new(intervals: Vec<WorkingInterval>) -> Self {
        Self { intervals }
    }

    pub fn intervals(&self) -> &[WorkingInterval] {
        &self.intervals
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        self.intervals.iter().any(|i| i.contains(time))
    }
}

/// Immutable, query-ready working calendar.
///
/// Built by [`compile`](crate::compiler::compile); any change to the
/// configuration produces a new value. Cheap to share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct CompiledCalendar {
    pub(crate) weekly: HashMap<Weekday, DaySchedule>,
    pub(crate) holidays: HashSet<NaiveDate>,
    pub(crate) overrides: HashMap<NaiveDate, DaySchedule>,
    pub(crate) tz: Tz,
    pub(crate) source: RawConfig,
    pub(crate) scan_limit_days: u32,
}

impl CompiledCalendar {
    pub fn time_zone(&self) -> Tz {
        self.tz
    }

    /// The configuration this calendar was compiled from.
    pub fn source(&self) -> &RawConfig {
        &self.source
    }

    pub fn weekly_schedule(&self, weekday: Weekday) -> Option<&DaySchedule> {
        self.weekly.get(&weekday)
    }

    pub fn holidays(&self) -> &HashSet<NaiveDate> {
        &self.holidays
    }

    pub fn holiday_hours(&self, date: NaiveDate) -> Option<&DaySchedule> {
        self.overrides.get(&date)
    }

    /// Effective schedule for a date: its override if any, nothing on a
    /// holiday, otherwise the weekday's schedule.
    pub fn schedule_for(&self, date: NaiveDate) -> Option<&DaySchedule> {
        if let Some(schedule) = self.overrides.get(&date) {
            return Some(schedule);
        }
        if self.holidays.contains(&date) {
            return None;
        }
        self.weekly.get(&date.weekday())
    }

    /// How many consecutive days a roll may visit before giving up.
    pub fn scan_limit_days(&self) -> u32 {
        self.scan_limit_days
    }
}
