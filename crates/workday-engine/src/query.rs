//! Query and arithmetic surface of [`CompiledCalendar`].
//!
//! Each method normalises its input through [`CalendarInput`], runs the
//! matching [`engine`](crate::engine) function on local wall-clock time, and
//! converts the result back to the input's shape: dates stay dates, date-times
//! come back as `DateTime<Tz>` in the calendar's zone.
//!
//! Predicates and day counts look at the exact instant. Rolling and
//! arithmetic start from the instant rounded to the nearest second.
//!
//! Every method fails with [`WorkingHoursError::UnsupportedInput`] when a
//! `NaiveDateTime` input names a wall-clock time the calendar's zone skips.

use chrono::NaiveDateTime;

use crate::duration::{TimeUnit, WorkingDuration};
use crate::engine;
use crate::error::{Result, WorkingHoursError};
use crate::instant::CalendarInput;
use crate::schedule::CompiledCalendar;

impl CompiledCalendar {
    // ── predicates ──────────────────────────────────────────────────────

    /// Whether the date of `time`, in the calendar's zone, has working hours
    /// after holidays and holiday hours are applied.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use workday_engine::RawConfig;
    ///
    /// let calendar = RawConfig::default().with_holiday("2014-05-01").compile().unwrap();
    /// let labour_day = NaiveDate::from_ymd_opt(2014, 5, 1).unwrap();
    /// assert!(!calendar.is_working_day(&labour_day).unwrap());
    /// ```
    pub fn is_working_day<I: CalendarInput>(&self, time: &I) -> Result<bool> {
        let instant = time.to_instant(self.tz)?;
        Ok(engine::is_working_day(self, instant.local().date()))
    }

    /// Whether `time` falls in a `[start, end)` interval of its day.
    pub fn is_within_working_hours<I: CalendarInput>(&self, time: &I) -> Result<bool> {
        let instant = time.to_instant(self.tz)?;
        Ok(engine::is_within_working_hours(self, instant.local()))
    }

    // ── rolling ─────────────────────────────────────────────────────────

    /// `time` itself if it is within working hours, otherwise the next
    /// opening instant.
    ///
    /// # Errors
    ///
    /// [`WorkingHoursError::NoWorkingDay`] if no opening is found within
    /// [`scan_limit_days`](CompiledCalendar::scan_limit_days), and
    /// [`WorkingHoursError::OutOfRange`] if the scan runs off the calendar.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use workday_engine::RawConfig;
    ///
    /// let calendar = RawConfig::default().compile().unwrap();
    /// let friday_evening = Utc.with_ymd_and_hms(2014, 4, 11, 18, 0, 0).unwrap();
    /// let monday = calendar.advance_to_next_open(&friday_evening).unwrap();
    /// assert_eq!(monday, Utc.with_ymd_and_hms(2014, 4, 14, 9, 0, 0).unwrap());
    /// ```
    pub fn advance_to_next_open<I: CalendarInput>(&self, time: &I) -> Result<I::Output> {
        self.map_local(time, engine::advance_to_next_open)
    }

    /// Closing instant of the interval containing `time`, or of the next
    /// interval when `time` is outside working hours. Fails like
    /// [`advance_to_next_open`](Self::advance_to_next_open).
    pub fn advance_to_closing_instant<I: CalendarInput>(&self, time: &I) -> Result<I::Output> {
        self.map_local(time, engine::advance_to_closing_instant)
    }

    /// The next opening strictly after `time`. Fails like
    /// [`advance_to_next_open`](Self::advance_to_next_open).
    pub fn next_interval_start<I: CalendarInput>(&self, time: &I) -> Result<I::Output> {
        self.map_local(time, engine::next_interval_start)
    }

    /// `time` itself if it is within `(start, end]` of an interval, otherwise
    /// the latest closing instant before it.
    ///
    /// # Errors
    ///
    /// [`WorkingHoursError::NoWorkingDay`] or [`WorkingHoursError::OutOfRange`]
    /// as for [`advance_to_next_open`](Self::advance_to_next_open), scanning
    /// backward.
    pub fn rewind_to_open<I: CalendarInput>(&self, time: &I) -> Result<I::Output> {
        self.map_local(time, engine::rewind_to_open)
    }

    // ── arithmetic ──────────────────────────────────────────────────────

    /// Move `days` working days forward, or backward when negative. The time
    /// of day is kept.
    ///
    /// # Errors
    ///
    /// [`WorkingHoursError::OutOfRange`] if the move leaves the representable
    /// date range, [`WorkingHoursError::NoWorkingDay`] if a closed stretch
    /// exceeds the scan limit.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use workday_engine::RawConfig;
    ///
    /// let calendar = RawConfig::default().compile().unwrap();
    /// let friday = NaiveDate::from_ymd_opt(1991, 11, 15).unwrap();
    /// let tuesday = calendar.add_business_days(&friday, 2).unwrap();
    /// assert_eq!(tuesday, NaiveDate::from_ymd_opt(1991, 11, 19).unwrap());
    /// ```
    pub fn add_business_days<I: CalendarInput>(&self, time: &I, days: i64) -> Result<I::Output> {
        self.map_local(time, |cal, local| engine::add_business_days(cal, local, days))
    }

    /// Add `seconds` of working time, or subtract when negative. The result
    /// is always inside working hours or on an interval boundary.
    ///
    /// # Errors
    ///
    /// [`WorkingHoursError::OutOfRange`] if `seconds` or the result leaves
    /// the representable range, [`WorkingHoursError::NoWorkingDay`] if a
    /// closed stretch exceeds the scan limit.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use workday_engine::RawConfig;
    ///
    /// let calendar = RawConfig::default().compile().unwrap();
    /// let friday = Utc.with_ymd_and_hms(1991, 11, 15, 16, 59, 42).unwrap();
    /// let monday = calendar.add_working_duration(&friday, 120).unwrap();
    /// assert_eq!(monday, Utc.with_ymd_and_hms(1991, 11, 18, 9, 1, 42).unwrap());
    /// ```
    pub fn add_working_duration<I: CalendarInput>(
        &self,
        time: &I,
        seconds: i64,
    ) -> Result<I::Output> {
        self.map_local(time, |cal, local| engine::add_working_duration(cal, local, seconds))
    }

    /// Apply a unit-tagged duration: days count working days, every other
    /// unit counts working seconds.
    ///
    /// # Errors
    ///
    /// As [`add_business_days`](Self::add_business_days) or
    /// [`add_working_duration`](Self::add_working_duration), plus
    /// [`WorkingHoursError::OutOfRange`] when the duration does not fit in
    /// seconds.
    pub fn add<I: CalendarInput>(&self, time: &I, duration: WorkingDuration) -> Result<I::Output> {
        match duration.unit() {
            TimeUnit::Days => self.add_business_days(time, duration.value()),
            TimeUnit::Hours | TimeUnit::Minutes | TimeUnit::Seconds => {
                let seconds = duration.as_seconds().ok_or_else(|| {
                    WorkingHoursError::OutOfRange(format!("{duration} overflows seconds"))
                })?;
                self.add_working_duration(time, seconds)
            }
        }
    }

    // ── distances ───────────────────────────────────────────────────────

    /// Signed count of working days from `from` to `to`: working dates after
    /// `from`'s date up to and including `to`'s date. Same date gives 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use workday_engine::RawConfig;
    ///
    /// let calendar = RawConfig::default().compile().unwrap();
    /// let sunday = NaiveDate::from_ymd_opt(2014, 4, 6).unwrap();
    /// let monday = NaiveDate::from_ymd_opt(2014, 4, 7).unwrap();
    /// assert_eq!(calendar.working_days_between(&sunday, &monday).unwrap(), 1);
    /// assert_eq!(calendar.working_days_between(&monday, &sunday).unwrap(), -1);
    /// ```
    pub fn working_days_between<A, B>(&self, from: &A, to: &B) -> Result<i64>
    where
        A: CalendarInput,
        B: CalendarInput,
    {
        let from = from.to_instant(self.tz)?;
        let to = to.to_instant(self.tz)?;
        Ok(engine::working_days_between(self, from.local(), to.local()))
    }

    /// Signed working time from `from` to `to`, rounded to whole seconds.
    ///
    /// # Errors
    ///
    /// [`WorkingHoursError::NoWorkingDay`] or [`WorkingHoursError::OutOfRange`]
    /// if rolling between intervals fails.
    pub fn working_duration_between<A, B>(&self, from: &A, to: &B) -> Result<i64>
    where
        A: CalendarInput,
        B: CalendarInput,
    {
        let from = from.to_instant(self.tz)?;
        let to = to.to_instant(self.tz)?;
        engine::working_duration_between(self, from.local(), to.local())
    }

    fn map_local<I, F>(&self, time: &I, f: F) -> Result<I::Output>
    where
        I: CalendarInput,
        F: FnOnce(&CompiledCalendar, NaiveDateTime) -> Result<NaiveDateTime>,
    {
        let instant = time.to_instant(self.tz)?;
        let local = f(self, instant.rounded())?;
        I::from_calendar_local(local, &instant, self.tz)
    }
}
