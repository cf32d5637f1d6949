//! Error types for workday-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkingHoursError {
    #[error("Invalid configuration: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    #[error("No working day reachable: {0}")]
    NoWorkingDay(String),

    #[error("Out of range: {0}")]
    OutOfRange(String),
}

/// Machine-checkable reason attached to a [`ConfigurationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigErrorKind {
    /// The weekly schedule has no working day at all.
    EmptyWeek,
    /// One or more weekday keys are not `sun`..`sat`.
    InvalidDayKeys,
    /// A day (weekday or override date) was given an empty interval list.
    EmptyDay,
    /// A time literal is not `HH:MM` or `HH:MM:SS`.
    InvalidTime,
    /// A range ends at or before its start.
    InvalidRange,
    /// A range starts before the previous range on the same day ends.
    OverlappingRange,
    /// A holiday or override key is not a `YYYY-MM-DD` date.
    InvalidHoliday,
    /// The timezone resolver does not know the identifier.
    UnknownTimezone,
    /// A configuration value has the wrong type.
    InvalidType,
}

fn describe(kind: &ConfigErrorKind, value: &str) -> String {
    match kind {
        ConfigErrorKind::EmptyWeek => "No working hours given".to_string(),
        ConfigErrorKind::InvalidDayKeys => {
            format!("Invalid day identifier(s): {value} - must be 3 letter symbols")
        }
        ConfigErrorKind::EmptyDay => format!("No working hours given for day {value}"),
        ConfigErrorKind::InvalidTime => {
            format!("Invalid time: {value} - must be 'HH:MM(:SS)'")
        }
        ConfigErrorKind::InvalidRange => {
            format!("Invalid range: {value} - ends before it starts")
        }
        ConfigErrorKind::OverlappingRange => {
            format!("Invalid range: {value} - overlaps previous range")
        }
        ConfigErrorKind::InvalidHoliday => {
            format!("Invalid holiday: {value} - must be a date (YYYY-MM-DD)")
        }
        ConfigErrorKind::UnknownTimezone => format!("Unknown time zone: {value}"),
        ConfigErrorKind::InvalidType => format!("Invalid type: {value}"),
    }
}

/// A rejected configuration update. Carries the reason and the offending value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", describe(.kind, .value))]
pub struct ConfigurationError {
    pub kind: ConfigErrorKind,
    pub value: String,
}

impl ConfigurationError {
    pub fn new(kind: ConfigErrorKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, WorkingHoursError>;
