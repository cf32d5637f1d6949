//! # workday-engine
//!
//! Working-hours calendar arithmetic.
//!
//! A calendar is a weekly schedule of open ranges, a set of holidays, dated
//! overrides, and a timezone. Given one, the engine answers whether an instant
//! is inside working hours, rolls instants to the next opening or back to the
//! previous closing, adds or subtracts working time and working days, and
//! measures working time and working days between two instants.
//!
//! ```
//! use workday_engine::RawConfig;
//! use chrono::{TimeZone, Utc};
//!
//! let calendar = RawConfig::default().compile().unwrap();
//! let saturday = Utc.with_ymd_and_hms(2014, 4, 12, 10, 0, 0).unwrap();
//! let monday = calendar.advance_to_next_open(&saturday).unwrap();
//! assert_eq!(monday, Utc.with_ymd_and_hms(2014, 4, 14, 9, 0, 0).unwrap());
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Human-authored configuration (`RawConfig`), JSON loading
//! - [`compiler`] - Validation and compilation into a `CompiledCalendar`, timezone resolvers
//! - [`schedule`] - Compiled calendar data: intervals, day schedules, holidays, overrides
//! - [`engine`] - Pure rolling and arithmetic on local wall-clock time
//! - [`instant`] - Date and date-time adapter, shape preservation
//! - [`duration`] - Unit-tagged working durations
//! - [`handle`] - Shared, atomically swappable calendar
//! - [`error`] - Error types

pub mod compiler;
pub mod config;
pub mod duration;
pub mod engine;
pub mod error;
pub mod handle;
pub mod instant;
mod query;
pub mod schedule;

pub use compiler::{compile, compile_with, AliasResolver, IanaResolver, TimezoneResolver};
pub use config::{RawConfig, RawDaySchedule, RawRange};
pub use duration::{TimeUnit, WorkingDuration};
pub use error::{ConfigErrorKind, ConfigurationError, WorkingHoursError};
pub use handle::CalendarHandle;
pub use instant::{CalendarInput, Instant, InstantShape};
pub use schedule::{CompiledCalendar, DaySchedule, WorkingInterval, END_OF_DAY};
