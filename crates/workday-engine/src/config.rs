//! Human-authored working-hours configuration.
//!
//! [`RawConfig`] is the mutable, caller-owned input to the compiler. Every
//! field is kept in the shape a person writes it (weekday keys like `"mon"`,
//! times like `"09:00"`, dates like `"2014-05-01"`); nothing here is
//! validated. Validation happens all at once in
//! [`compile`](crate::compiler::compile), which either produces a
//! [`CompiledCalendar`](crate::schedule::CompiledCalendar) or rejects the
//! whole configuration.
//!
//! # JSON shape
//!
//! ```json
//! {
//!   "working_hours": { "mon": [["09:00", "17:00"]] },
//!   "holidays": ["2014-05-01"],
//!   "holiday_hours": { "2019-12-27": [["10:00", "18:00"]] },
//!   "time_zone": "UTC"
//! }
//! ```

use std::collections::BTreeMap;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::compiler::{compile, compile_with, TimezoneResolver};
use crate::error::{ConfigErrorKind, ConfigurationError};
use crate::schedule::CompiledCalendar;

/// A `(start, end)` pair of wall-clock strings, e.g. `("09:00", "17:00")`.
pub type RawRange = (String, String);

/// The open ranges of one day, in any order.
pub type RawDaySchedule = Vec<RawRange>;

/// Unvalidated working-hours configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// Weekday key (`"sun"`..`"sat"`) → open ranges.
    pub working_hours: BTreeMap<String, RawDaySchedule>,
    /// Dates (`YYYY-MM-DD`) that are closed all day.
    pub holidays: Vec<String>,
    /// Dates (`YYYY-MM-DD`) with their own ranges, replacing the weekly
    /// schedule and any holiday on that date.
    pub holiday_hours: BTreeMap<String, RawDaySchedule>,
    /// Timezone identifier handed to the resolver.
    pub time_zone: String,
}

impl Default for RawConfig {
    /// Monday to Friday, 09:00 to 17:00, UTC, no holidays.
    fn default() -> Self {
        let office_day = vec![range("09:00", "17:00")];
        let working_hours = ["mon", "tue", "wed", "thu", "fri"]
            .into_iter()
            .map(|day| (day.to_string(), office_day.clone()))
            .collect();
        Self {
            working_hours,
            holidays: Vec::new(),
            holiday_hours: BTreeMap::new(),
            time_zone: "UTC".to_string(),
        }
    }
}

fn range(start: &str, end: &str) -> RawRange {
    (start.to_string(), end.to_string())
}

fn day_schedule<I, S, E>(ranges: I) -> RawDaySchedule
where
    I: IntoIterator<Item = (S, E)>,
    S: Into<String>,
    E: Into<String>,
{
    ranges
        .into_iter()
        .map(|(start, end)| (start.into(), end.into()))
        .collect()
}

impl RawConfig {
    /// An empty configuration: no working days, no holidays, UTC.
    ///
    /// Compiling it as-is fails with `EmptyWeek`; add days first.
    pub fn empty() -> Self {
        Self {
            working_hours: BTreeMap::new(),
            time_zone: "UTC".to_string(),
            ..Self::default()
        }
    }

    /// Load a configuration from JSON. Values of the wrong type are reported
    /// as [`ConfigErrorKind::InvalidType`].
    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        serde_json::from_str(json)
            .map_err(|e| ConfigurationError::new(ConfigErrorKind::InvalidType, e.to_string()))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    // ── builder ─────────────────────────────────────────────────────────

    /// Set the ranges for one weekday, replacing any previous ranges.
    pub fn with_day<I, S, E>(mut self, day: &str, ranges: I) -> Self
    where
        I: IntoIterator<Item = (S, E)>,
        S: Into<String>,
        E: Into<String>,
    {
        self.working_hours
            .insert(day.to_string(), day_schedule(ranges));
        self
    }

    pub fn with_holiday(mut self, date: impl ToString) -> Self {
        self.holidays.push(date.to_string());
        self
    }

    pub fn with_holiday_hours<I, S, E>(mut self, date: impl ToString, ranges: I) -> Self
    where
        I: IntoIterator<Item = (S, E)>,
        S: Into<String>,
        E: Into<String>,
    {
        self.holiday_hours
            .insert(date.to_string(), day_schedule(ranges));
        self
    }

    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = time_zone.into();
        self
    }

    // ── setters ─────────────────────────────────────────────────────────

    /// Replace the whole weekly schedule.
    pub fn set_working_hours(&mut self, working_hours: BTreeMap<String, RawDaySchedule>) {
        self.working_hours = working_hours;
    }

    pub fn set_holidays<I, D>(&mut self, holidays: I)
    where
        I: IntoIterator<Item = D>,
        D: ToString,
    {
        self.holidays = holidays.into_iter().map(|d| d.to_string()).collect();
    }

    pub fn set_holiday_hours(&mut self, holiday_hours: BTreeMap<String, RawDaySchedule>) {
        self.holiday_hours = holiday_hours;
    }

    pub fn set_time_zone(&mut self, time_zone: impl Into<String>) {
        self.time_zone = time_zone.into();
    }

    /// Use an already-resolved timezone.
    pub fn set_time_zone_handle(&mut self, tz: Tz) {
        self.time_zone = tz.name().to_string();
    }

    // ── compilation ─────────────────────────────────────────────────────

    /// Validate and compile with the default IANA resolver.
    pub fn compile(&self) -> Result<CompiledCalendar, ConfigurationError> {
        compile(self)
    }

    /// Validate and compile, resolving the timezone through `resolver`.
    pub fn compile_with(
        &self,
        resolver: &dyn TimezoneResolver,
    ) -> Result<CompiledCalendar, ConfigurationError> {
        compile_with(self, resolver)
    }
}
