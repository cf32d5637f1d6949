//! Computation engine: the interval-walking algorithms.
//!
//! Every function here is pure in `(calendar, local time, ...)`. Times are
//! wall-clock [`NaiveDateTime`]s in the calendar's own zone; converting from
//! and to the caller's values is the job of [`crate::instant`].
//!
//! # Membership
//!
//! Rolling forward treats an interval as `[start, end)`: the opening instant
//! is inside, the closing instant is not. Rolling backward mirrors this as
//! `(start, end]`, so rewinding from an opening instant lands on the previous
//! closing instant. Forward scans visit intervals in ascending order,
//! backward scans in descending order.
//!
//! # Termination
//!
//! Rolls that cross days count the days they visit and fail with
//! [`WorkingHoursError::NoWorkingDay`] once they exceed the calendar's
//! [`scan_limit_days`](CompiledCalendar::scan_limit_days).

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::error::{Result, WorkingHoursError};
use crate::schedule::{CompiledCalendar, DaySchedule, END_OF_DAY};

// ── predicates ──────────────────────────────────────────────────────────────

/// Whether `date` has any working interval after holidays and overrides.
pub fn is_working_day(cal: &CompiledCalendar, date: NaiveDate) -> bool {
    cal.schedule_for(date).is_some()
}

/// Whether `time` falls inside a `[start, end)` interval of its day.
pub fn is_within_working_hours(cal: &CompiledCalendar, time: NaiveDateTime) -> bool {
    cal.schedule_for(time.date())
        .is_some_and(|schedule| schedule.contains(time.time()))
}

// ── rolling ─────────────────────────────────────────────────────────────────

/// Return `time` if it is within working hours, otherwise the next opening
/// instant.
pub fn advance_to_next_open(cal: &CompiledCalendar, time: NaiveDateTime) -> Result<NaiveDateTime> {
    roll_forward(cal, time, |date, tod, schedule| {
        for interval in schedule.intervals() {
            if interval.contains(tod) {
                return Some(date.and_time(tod));
            }
            if interval.start() >= tod {
                return Some(date.and_time(interval.start()));
            }
        }
        None
    })
}

/// The closing instant of the interval containing `time`, or of the next
/// interval if `time` is outside working hours.
///
/// A range ending at `24:00` closes at [`END_OF_DAY`].
pub fn advance_to_closing_instant(
    cal: &CompiledCalendar,
    time: NaiveDateTime,
) -> Result<NaiveDateTime> {
    roll_forward(cal, time, |date, tod, schedule| {
        schedule
            .intervals()
            .iter()
            .find(|interval| tod < interval.end())
            .map(|interval| date.and_time(interval.end()))
    })
}

/// The next opening instant strictly after `time`, skipping the rest of the
/// interval `time` is in.
pub fn next_interval_start(cal: &CompiledCalendar, time: NaiveDateTime) -> Result<NaiveDateTime> {
    let time = if is_within_working_hours(cal, time) {
        advance_to_closing_instant(cal, time)?
    } else {
        time
    };
    advance_to_next_open(cal, time)
}

/// Return `time` if it is within `(start, end]` of an interval, otherwise
/// the latest closing instant before it.
pub fn rewind_to_open(cal: &CompiledCalendar, time: NaiveDateTime) -> Result<NaiveDateTime> {
    let mut current = time;
    for _ in 0..=cal.scan_limit_days() {
        let date = current.date();
        let tod = current.time();
        if let Some(schedule) = cal.schedule_for(date) {
            for interval in schedule.intervals().iter().rev() {
                if tod > interval.end() {
                    return Ok(date.and_time(interval.end()));
                }
                if tod > interval.start() {
                    return Ok(current);
                }
            }
        }
        current = previous_day_end(date)?;
    }
    Err(scan_exhausted(cal, time, "backward"))
}

// ── arithmetic ──────────────────────────────────────────────────────────────

/// Add (or with a negative value, subtract) `seconds` of working time.
///
/// The result is rounded to the nearest whole second.
pub fn add_working_duration(
    cal: &CompiledCalendar,
    time: NaiveDateTime,
    seconds: i64,
) -> Result<NaiveDateTime> {
    let mut remaining = seconds
        .checked_abs()
        .filter(|s| *s <= calendar_span_days().saturating_mul(86_400))
        .and_then(Duration::try_seconds)
        .ok_or_else(|| {
            WorkingHoursError::OutOfRange(format!("{seconds} working seconds from {time}"))
        })?;
    let mut current = time;

    if seconds > 0 {
        while remaining > Duration::zero() {
            current = advance_to_next_open(cal, current)?;
            let tod = current.time();
            let interval = cal
                .schedule_for(current.date())
                .and_then(|s| s.intervals().iter().find(|i| i.contains(tod)).copied())
                .ok_or_else(|| lost_interval(current))?;
            let take = (interval.end() - tod).min(remaining);
            current += take;
            remaining -= take;
        }
    } else {
        while remaining > Duration::zero() {
            current = rewind_to_open(cal, current)?;
            let tod = current.time();
            let interval = cal
                .schedule_for(current.date())
                .and_then(|s| {
                    s.intervals()
                        .iter()
                        .rev()
                        .find(|i| i.contains_backward(tod))
                        .copied()
                })
                .ok_or_else(|| lost_interval(current))?;
            let take = (tod - interval.start()).min(remaining);
            current -= take;
            remaining -= take;
        }
    }

    Ok(round_to_second(current))
}

/// Move `days` working days forward (or backward when negative), keeping the
/// time of day.
pub fn add_business_days(
    cal: &CompiledCalendar,
    time: NaiveDateTime,
    days: i64,
) -> Result<NaiveDateTime> {
    let step = if days >= 0 { 1 } else { -1 };
    let mut remaining = days.unsigned_abs();
    if remaining > calendar_span_days().unsigned_abs() {
        return Err(WorkingHoursError::OutOfRange(format!("{days} working days from {time}")));
    }
    let mut current = time;
    let mut closed_streak = 0u32;

    while remaining > 0 {
        current = current
            .checked_add_signed(Duration::days(step))
            .ok_or_else(|| out_of_range(current))?;
        if is_working_day(cal, current.date()) {
            remaining -= 1;
            closed_streak = 0;
        } else {
            closed_streak += 1;
            if closed_streak > cal.scan_limit_days() {
                return Err(scan_exhausted(cal, time, "by day"));
            }
        }
    }
    Ok(current)
}

// ── distances ───────────────────────────────────────────────────────────────

/// Working days landed on when stepping from `from`'s date to `to`'s date,
/// counting `to`'s date but not `from`'s. Negative when `to < from`.
pub fn working_days_between(
    cal: &CompiledCalendar,
    from: NaiveDateTime,
    to: NaiveDateTime,
) -> i64 {
    if to < from {
        return -working_days_between(cal, to, from);
    }
    let target = to.date();
    let mut days = 0;
    let mut date = from.date();
    while date < target {
        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
        if is_working_day(cal, date) {
            days += 1;
        }
    }
    days
}

/// Working time between two instants, in whole seconds. Negative when
/// `to < from`.
pub fn working_duration_between(
    cal: &CompiledCalendar,
    from: NaiveDateTime,
    to: NaiveDateTime,
) -> Result<i64> {
    if to < from {
        return working_duration_between(cal, to, from).map(|d| -d);
    }

    let mut distance = Duration::zero();
    let mut current = advance_to_next_open(cal, from)?;
    while current < to {
        let date = current.date();
        let tod = current.time();
        let interval = cal
            .schedule_for(date)
            .and_then(|s| s.intervals().iter().find(|i| i.contains(tod)).copied())
            .ok_or_else(|| lost_interval(current))?;
        let left_in_interval = interval.end() - tod;
        if to - current > left_in_interval {
            distance += left_in_interval;
            current = date.and_time(interval.end());
        } else {
            distance += to - current;
            current = to;
        }
        current = advance_to_next_open(cal, current)?;
    }

    Ok(round_seconds(distance))
}

// ── helpers ─────────────────────────────────────────────────────────────────

/// Scan forward day by day, handing each working day's schedule and the
/// time of day to `pick`. The first day is scanned from `time`, later days
/// from midnight.
fn roll_forward<F>(cal: &CompiledCalendar, time: NaiveDateTime, pick: F) -> Result<NaiveDateTime>
where
    F: Fn(NaiveDate, NaiveTime, &DaySchedule) -> Option<NaiveDateTime>,
{
    let mut current = time;
    for _ in 0..=cal.scan_limit_days() {
        let date = current.date();
        if let Some(schedule) = cal.schedule_for(date) {
            if let Some(found) = pick(date, current.time(), schedule) {
                return Ok(found);
            }
        }
        current = next_day_start(date)?;
    }
    Err(scan_exhausted(cal, time, "forward"))
}

fn next_day_start(date: NaiveDate) -> Result<NaiveDateTime> {
    date.succ_opt()
        .map(|next| next.and_time(NaiveTime::MIN))
        .ok_or_else(|| WorkingHoursError::OutOfRange(format!("no day after {date}")))
}

fn previous_day_end(date: NaiveDate) -> Result<NaiveDateTime> {
    date.pred_opt()
        .map(|prev| prev.and_time(END_OF_DAY))
        .ok_or_else(|| WorkingHoursError::OutOfRange(format!("no day before {date}")))
}

fn scan_exhausted(
    cal: &CompiledCalendar,
    time: NaiveDateTime,
    direction: &str,
) -> WorkingHoursError {
    tracing::warn!(
        %time,
        scan_limit_days = cal.scan_limit_days(),
        direction,
        "no working day found within scan limit"
    );
    WorkingHoursError::NoWorkingDay(format!(
        "scanned {} days {direction} from {time} without finding working time",
        cal.scan_limit_days()
    ))
}

/// Days between the first and the last representable date.
fn calendar_span_days() -> i64 {
    NaiveDate::MAX.signed_duration_since(NaiveDate::MIN).num_days()
}

fn out_of_range(time: NaiveDateTime) -> WorkingHoursError {
    WorkingHoursError::OutOfRange(format!("calendar overflow stepping from {time}"))
}

// Rolling guarantees the time is inside an interval; reaching this means the
// calendar and the roll disagree.
fn lost_interval(time: NaiveDateTime) -> WorkingHoursError {
    WorkingHoursError::NoWorkingDay(format!("no open interval at {time} after rolling"))
}

/// Round to the nearest whole second, halves up.
pub(crate) fn round_to_second(time: NaiveDateTime) -> NaiveDateTime {
    let nanos = time.nanosecond() as i64;
    let floor = time - Duration::nanoseconds(nanos);
    if nanos >= 500_000_000 {
        floor + Duration::seconds(1)
    } else {
        floor
    }
}

fn round_seconds(delta: Duration) -> i64 {
    let whole = delta.num_seconds();
    let sub = (delta - Duration::seconds(whole)).num_nanoseconds().unwrap_or(0);
    if sub >= 500_000_000 {
        whole + 1
    } else if sub <= -500_000_000 {
        whole - 1
    } else {
        whole
    }
}
