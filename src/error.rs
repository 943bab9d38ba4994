//! Errors for invalid engine arguments.
//!
//! Bad row data (unparseable dates, duplicate anchors, ...) is never an
//! `EngineError`; it is reported inside a [`SchedulingResult`](crate::SchedulingResult).
//! These variants cover arguments a caller should have validated first.

use chrono::{NaiveDate, Weekday};
use thiserror::Error;

use crate::occupancy::Platform;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("date range is empty")]
    EmptyRange,

    #[error("range dates must be strictly ascending ({previous} is followed by {next})")]
    UnsortedRange { previous: NaiveDate, next: NaiveDate },

    #[error("start date {start} must be on or before end date {end}")]
    StartAfterEnd { start: NaiveDate, end: NaiveDate },

    #[error("posts per week must be between 3 and 7 (got {0})")]
    InvalidPostsPerWeek(u8),

    #[error("plan must cover between 1 and 52 weeks (got {0})")]
    InvalidWeeks(u32),

    #[error("date range spans {days} days; at most 366 are allowed")]
    RangeTooLong { days: i64 },

    #[error("{days} days after {start} is past the last supported date")]
    DateOverflow { start: NaiveDate, days: u64 },

    #[error("weekday index must be between 0 and 6 (got {0})")]
    InvalidWeekdayIndex(u32),

    #[error("no time window configured for {platform} on {weekday}")]
    NoTimeWindow { platform: Platform, weekday: Weekday },

    #[error("invalid time window: {0}")]
    InvalidTimeWindow(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
