//! Instant adapter: caller values in, caller-shaped values out.
//!
//! The engine works on local wall-clock time in the calendar's zone. This
//! module turns a caller's date or date-time into that form, remembers
//! whether it started as a pure date, and turns engine results back into the
//! same shape.

use chrono::{
    DateTime, Duration, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    TimeZone,
};
use chrono_tz::Tz;

use crate::engine::round_to_second;
use crate::error::{Result, WorkingHoursError};

/// Whether a value arrived as a calendar date or as a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstantShape {
    Date,
    DateTime,
}

/// A caller value normalised into the calendar's zone.
///
/// Keeps the exact wall-clock time and, for zoned inputs, the UTC offset the
/// caller was at. The offset picks the right side of a repeated wall-clock
/// hour when results are mapped back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instant {
    local: NaiveDateTime,
    offset: Option<FixedOffset>,
    shape: InstantShape,
}

impl Instant {
    pub fn new(local: NaiveDateTime, shape: InstantShape) -> Self {
        Self {
            local,
            offset: None,
            shape,
        }
    }

    pub fn with_offset(local: NaiveDateTime, offset: FixedOffset, shape: InstantShape) -> Self {
        Self {
            local,
            offset: Some(offset),
            shape,
        }
    }

    /// Exact local wall-clock time in the calendar's zone.
    pub fn local(&self) -> NaiveDateTime {
        self.local
    }

    /// Local wall-clock time rounded to the nearest whole second.
    pub fn rounded(&self) -> NaiveDateTime {
        round_to_second(self.local)
    }

    /// The caller's UTC offset, if the input carried one.
    pub fn offset(&self) -> Option<FixedOffset> {
        self.offset
    }

    pub fn shape(&self) -> InstantShape {
        self.shape
    }
}

/// A value the calendar can take as input and hand back in the same shape.
///
/// Implemented for [`NaiveDate`] (date in, date out), [`NaiveDateTime`]
/// (wall-clock time in the calendar's zone) and any [`DateTime`]; date-time
/// results come back as `DateTime<Tz>` in the calendar's zone.
pub trait CalendarInput {
    type Output;

    fn to_instant(&self, tz: Tz) -> Result<Instant>;

    /// Rebuild a result computed on local wall-clock time. `origin` is the
    /// instant the computation started from.
    fn from_calendar_local(local: NaiveDateTime, origin: &Instant, tz: Tz) -> Result<Self::Output>;
}

impl CalendarInput for NaiveDate {
    type Output = NaiveDate;

    fn to_instant(&self, _tz: Tz) -> Result<Instant> {
        Ok(Instant::new(self.and_time(NaiveTime::MIN), InstantShape::Date))
    }

    fn from_calendar_local(local: NaiveDateTime, _origin: &Instant, _tz: Tz) -> Result<NaiveDate> {
        Ok(local.date())
    }
}

impl CalendarInput for NaiveDateTime {
    type Output = DateTime<Tz>;

    fn to_instant(&self, tz: Tz) -> Result<Instant> {
        match tz.from_local_datetime(self) {
            LocalResult::None => Err(WorkingHoursError::UnsupportedInput(format!(
                "'{self}' does not exist in time zone {}",
                tz.name()
            ))),
            _ => Ok(Instant::new(*self, InstantShape::DateTime)),
        }
    }

    fn from_calendar_local(
        local: NaiveDateTime,
        origin: &Instant,
        tz: Tz,
    ) -> Result<DateTime<Tz>> {
        localize(tz, local, origin.offset())
    }
}

impl<T: TimeZone> CalendarInput for DateTime<T> {
    type Output = DateTime<Tz>;

    fn to_instant(&self, tz: Tz) -> Result<Instant> {
        let zoned = self.with_timezone(&tz);
        Ok(Instant::with_offset(
            zoned.naive_local(),
            zoned.offset().fix(),
            InstantShape::DateTime,
        ))
    }

    fn from_calendar_local(
        local: NaiveDateTime,
        origin: &Instant,
        tz: Tz,
    ) -> Result<DateTime<Tz>> {
        localize(tz, local, origin.offset())
    }
}

/// Attach `tz` to a wall-clock time.
///
/// A time that happens twice (DST fall-back) takes `preferred` when it is one
/// of the two offsets, otherwise the earlier one. A time skipped by a forward
/// transition is read with the offset in force before the transition, which
/// lands as far past the transition as it was into the gap.
pub fn localize(
    tz: Tz,
    local: NaiveDateTime,
    preferred: Option<FixedOffset>,
) -> Result<DateTime<Tz>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(zoned) => Ok(zoned),
        LocalResult::Ambiguous(earlier, later) => {
            if preferred == Some(later.offset().fix()) {
                Ok(later)
            } else {
                Ok(earlier)
            }
        }
        LocalResult::None => skip_gap(tz, local),
    }
}

fn skip_gap(tz: Tz, local: NaiveDateTime) -> Result<DateTime<Tz>> {
    let out_of_range = || {
        WorkingHoursError::OutOfRange(format!(
            "cannot place '{local}' in time zone {}",
            tz.name()
        ))
    };
    let before = local
        .checked_sub_signed(Duration::days(1))
        .and_then(|day_before| tz.from_local_datetime(&day_before).earliest())
        .ok_or_else(out_of_range)?;
    let offset = Duration::seconds(i64::from(before.offset().fix().local_minus_utc()));
    let utc = local.checked_sub_signed(offset).ok_or_else(out_of_range)?;
    Ok(tz.from_utc_datetime(&utc))
}
