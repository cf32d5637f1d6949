//! Calendar compiler: validates a [`RawConfig`] and builds a
//! [`CompiledCalendar`].
//!
//! Validation is all-or-nothing. The first violation found rejects the whole
//! configuration with a [`ConfigurationError`] naming the offending value;
//! nothing partial is ever produced.
//!
//! Order of checks: weekly schedule non-empty, weekday keys, each day's
//! ranges, holidays, holiday overrides, timezone.

use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, NaiveTime, Weekday};
use chrono_tz::Tz;

use crate::config::{RawConfig, RawDaySchedule};
use crate::error::{ConfigErrorKind, ConfigurationError};
use crate::schedule::{CompiledCalendar, DaySchedule, WorkingInterval, END_OF_DAY};

/// Resolves a timezone identifier to a `chrono_tz` zone.
pub trait TimezoneResolver {
    fn resolve(&self, name: &str) -> Option<Tz>;
}

/// Resolves IANA names (`"America/New_York"`, `"UTC"`) with `chrono-tz`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IanaResolver;

impl TimezoneResolver for IanaResolver {
    fn resolve(&self, name: &str) -> Option<Tz> {
        name.trim().parse::<Tz>().ok()
    }
}

/// Looks names up in a caller-supplied alias table first, then falls back to
/// IANA names. Useful for friendly names such as `"Tokyo"`.
#[derive(Debug, Clone, Default)]
pub struct AliasResolver {
    aliases: HashMap<String, Tz>,
}

impl AliasResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alias(mut self, alias: impl Into<String>, tz: Tz) -> Self {
        self.aliases.insert(alias.into(), tz);
        self
    }
}

impl TimezoneResolver for AliasResolver {
    fn resolve(&self, name: &str) -> Option<Tz> {
        self.aliases
            .get(name)
            .copied()
            .or_else(|| IanaResolver.resolve(name))
    }
}

/// Compile with the default [`IanaResolver`].
pub fn compile(raw: &RawConfig) -> Result<CompiledCalendar, ConfigurationError> {
    compile_with(raw, &IanaResolver)
}

/// Validate `raw` and build an immutable calendar.
///
/// # Errors
///
/// Returns a [`ConfigurationError`] whose `kind` identifies the rule that
/// failed and whose `value` is the offending literal.
pub fn compile_with(
    raw: &RawConfig,
    resolver: &dyn TimezoneResolver,
) -> Result<CompiledCalendar, ConfigurationError> {
    if raw.working_hours.is_empty() {
        return Err(ConfigurationError::new(ConfigErrorKind::EmptyWeek, ""));
    }

    let invalid_keys: Vec<&str> = raw
        .working_hours
        .keys()
        .filter(|key| parse_weekday_key(key).is_none())
        .map(String::as_str)
        .collect();
    if !invalid_keys.is_empty() {
        return Err(ConfigurationError::new(
            ConfigErrorKind::InvalidDayKeys,
            invalid_keys.join(", "),
        ));
    }

    let mut weekly = HashMap::new();
    for (key, ranges) in &raw.working_hours {
        let weekday = parse_weekday_key(key)
            .ok_or_else(|| ConfigurationError::new(ConfigErrorKind::InvalidDayKeys, key.clone()))?;
        // "Mon" and "mon" would otherwise silently shadow each other.
        if weekly.contains_key(&weekday) {
            return Err(ConfigurationError::new(
                ConfigErrorKind::InvalidDayKeys,
                key.clone(),
            ));
        }
        weekly.insert(weekday, compile_day(key, ranges)?);
    }

    let holidays = raw
        .holidays
        .iter()
        .map(|entry| parse_date(entry))
        .collect::<Result<HashSet<_>, _>>()?;

    let mut overrides = HashMap::new();
    for (key, ranges) in &raw.holiday_hours {
        let date = parse_date(key)?;
        overrides.insert(date, compile_day(key, ranges)?);
    }

    let tz = resolver.resolve(&raw.time_zone).ok_or_else(|| {
        ConfigurationError::new(ConfigErrorKind::UnknownTimezone, raw.time_zone.clone())
    })?;

    // The weekly schedule has at least one working weekday, and each holiday
    // can cancel at most one occurrence of it, so no closed stretch is longer
    // than 7 * (holidays + 1) days.
    let scan_limit_days = 7 * (holidays.len() as u32 + 1) + 1;

    tracing::debug!(
        working_weekdays = weekly.len(),
        holidays = holidays.len(),
        holiday_hours = overrides.len(),
        time_zone = %tz,
        "compiled working calendar"
    );

    Ok(CompiledCalendar {
        weekly,
        holidays,
        overrides,
        tz,
        source: raw.clone(),
        scan_limit_days,
    })
}

/// Parse a three-letter weekday key, case-insensitively.
pub fn parse_weekday_key(key: &str) -> Option<Weekday> {
    match key.to_ascii_lowercase().as_str() {
        "sun" => Some(Weekday::Sun),
        "mon" => Some(Weekday::Mon),
        "tue" => Some(Weekday::Tue),
        "wed" => Some(Weekday::Wed),
        "thu" => Some(Weekday::Thu),
        "fri" => Some(Weekday::Fri),
        "sat" => Some(Weekday::Sat),
        _ => None,
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, ConfigurationError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| ConfigurationError::new(ConfigErrorKind::InvalidHoliday, s))
}

/// Parse `HH:MM` or `HH:MM:SS`. `24:00` and `24:00:00` become [`END_OF_DAY`].
pub fn parse_time_of_day(s: &str) -> Result<NaiveTime, ConfigurationError> {
    let invalid = || ConfigurationError::new(ConfigErrorKind::InvalidTime, s);

    let parts: Vec<&str> = s.split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        return Err(invalid());
    }

    let mut fields = [0u32; 3];
    for (field, part) in fields.iter_mut().zip(&parts) {
        if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        *field = part.parse().map_err(|_| invalid())?;
    }

    match fields {
        [24, 0, 0] => Ok(END_OF_DAY),
        [h, m, sec] if h < 24 && m < 60 && sec < 60 => {
            NaiveTime::from_hms_opt(h, m, sec).ok_or_else(invalid)
        }
        _ => Err(invalid()),
    }
}

fn compile_day(label: &str, ranges: &RawDaySchedule) -> Result<DaySchedule, ConfigurationError> {
    if ranges.is_empty() {
        return Err(ConfigurationError::new(ConfigErrorKind::EmptyDay, label));
    }

    let mut parsed = Vec::with_capacity(ranges.len());
    for (start, end) in ranges {
        let from = parse_time_of_day(start)?;
        let to = parse_time_of_day(end)?;
        parsed.push((from, to, format!("{start} => {end}")));
    }
    parsed.sort_by_key(|(from, _, _)| *from);

    let mut intervals: Vec<WorkingInterval> = Vec::with_capacity(parsed.len());
    for (from, to, literal) in parsed {
        if from >= to {
            return Err(ConfigurationError::new(
                ConfigErrorKind::InvalidRange,
                literal,
            ));
        }
        if let Some(previous) = intervals.last() {
            if from < previous.end() {
                return Err(ConfigurationError::new(
                    ConfigErrorKind::OverlappingRange,
                    literal,
                ));
            }
        }
        intervals.push(WorkingInterval::new(from, to));
    }

    Ok(DaySchedule::new(intervals))
}
