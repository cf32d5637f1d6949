//! Unit-tagged working durations.
//!
//! A [`WorkingDuration`] is "N working units". Days count working days and
//! keep the time of day; the other units count working seconds.
//!
//! ```
//! use workday_engine::{RawConfig, WorkingDuration};
//! use chrono::NaiveDate;
//!
//! let calendar = RawConfig::default().compile().unwrap();
//! let friday = NaiveDate::from_ymd_opt(1991, 11, 15).unwrap();
//! let tuesday = WorkingDuration::days(2).since(&calendar, &friday).unwrap();
//! assert_eq!(tuesday, NaiveDate::from_ymd_opt(1991, 11, 19).unwrap());
//! ```

use std::fmt;
use std::ops::Neg;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WorkingHoursError};
use crate::instant::CalendarInput;
use crate::schedule::CompiledCalendar;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    fn label(&self, value: i64) -> &'static str {
        let singular = value.abs() == 1;
        match (self, singular) {
            (TimeUnit::Seconds, true) => "second",
            (TimeUnit::Seconds, false) => "seconds",
            (TimeUnit::Minutes, true) => "minute",
            (TimeUnit::Minutes, false) => "minutes",
            (TimeUnit::Hours, true) => "hour",
            (TimeUnit::Hours, false) => "hours",
            (TimeUnit::Days, true) => "day",
            (TimeUnit::Days, false) => "days",
        }
    }
}

/// A signed amount of working time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkingDuration {
    value: i64,
    unit: TimeUnit,
}

impl WorkingDuration {
    pub const fn new(value: i64, unit: TimeUnit) -> Self {
        Self { value, unit }
    }

    pub const fn seconds(value: i64) -> Self {
        Self::new(value, TimeUnit::Seconds)
    }

    pub const fn minutes(value: i64) -> Self {
        Self::new(value, TimeUnit::Minutes)
    }

    pub const fn hours(value: i64) -> Self {
        Self::new(value, TimeUnit::Hours)
    }

    pub const fn days(value: i64) -> Self {
        Self::new(value, TimeUnit::Days)
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Working seconds for sub-day units; `None` for days, whose length
    /// depends on the calendar.
    pub fn as_seconds(&self) -> Option<i64> {
        match self.unit {
            TimeUnit::Seconds => Some(self.value),
            TimeUnit::Minutes => self.value.checked_mul(60),
            TimeUnit::Hours => self.value.checked_mul(3600),
            TimeUnit::Days => None,
        }
    }

    /// `time` moved forward by this duration (backward if negative).
    pub fn since<I: CalendarInput>(
        &self,
        calendar: &CompiledCalendar,
        time: &I,
    ) -> Result<I::Output> {
        calendar.add(time, *self)
    }

    /// `time` moved backward by this duration (forward if negative).
    pub fn until<I: CalendarInput>(
        &self,
        calendar: &CompiledCalendar,
        time: &I,
    ) -> Result<I::Output> {
        let negated = self.value.checked_neg().ok_or_else(|| {
            WorkingHoursError::OutOfRange(format!("{self} cannot be reversed"))
        })?;
        calendar.add(time, Self::new(negated, self.unit))
    }
}

impl Neg for WorkingDuration {
    type Output = WorkingDuration;

    fn neg(self) -> Self::Output {
        Self::new(-self.value, self.unit)
    }
}

impl fmt::Display for WorkingDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} working {}", self.value, self.unit.label(self.value))
    }
}
