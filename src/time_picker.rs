use chrono::{NaiveTime, Timelike, Weekday};
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::calendar::weekday_from_index;
use crate::error::{EngineError, EngineResult};
use crate::occupancy::Platform;
use crate::time_windows::{SLOT_MINUTES, TimeWindowTable};

/// Time of day a post goes out, shown as `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PublishTime(NaiveTime);

impl PublishTime {
    pub fn from_minute_of_day(minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(minute / 60, minute % 60, 0).map(Self)
    }

    pub fn time(&self) -> NaiveTime {
        self.0
    }

    pub fn minute_of_day(&self) -> u32 {
        self.0.hour() * 60 + self.0.minute()
    }
}

impl fmt::Display for PublishTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl FromStr for PublishTime {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s.trim(), "%H:%M").map(Self)
    }
}

impl Serialize for PublishTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PublishTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Draws publish times from a [`TimeWindowTable`].
///
/// Randomness comes from the caller so tests can pass a seeded generator.
pub struct TimePicker<'a> {
    table: &'a TimeWindowTable,
}

impl<'a> TimePicker<'a> {
    pub fn new(table: &'a TimeWindowTable) -> Self {
        Self { table }
    }

    /// Choose one of the pair's windows uniformly, then one of the 5-minute
    /// marks lying strictly inside it, also uniformly.
    pub fn pick<R: Rng>(
        &self,
        platform: Platform,
        weekday: Weekday,
        rng: &mut R,
    ) -> EngineResult<PublishTime> {
        let windows = self.table.windows(platform, weekday);
        if windows.is_empty() {
            return Err(EngineError::NoTimeWindow { platform, weekday });
        }

        let window = windows[rng.random_range(0..windows.len())];
        let (first, last) = window.interior_marks().ok_or_else(|| {
            EngineError::InvalidTimeWindow(format!(
                "{platform} window {}-{} on {weekday} has no {SLOT_MINUTES}-minute slot",
                window.start, window.end
            ))
        })?;

        let minute = rng.random_range(first / SLOT_MINUTES..=last / SLOT_MINUTES) * SLOT_MINUTES;

        PublishTime::from_minute_of_day(minute).ok_or_else(|| {
            EngineError::InvalidTimeWindow(format!("minute {minute} is outside the day"))
        })
    }

    /// Same as [`pick`](Self::pick) with a 0 = Sunday weekday index.
    pub fn pick_for_index<R: Rng>(
        &self,
        platform: Platform,
        weekday_index: u32,
        rng: &mut R,
    ) -> EngineResult<PublishTime> {
        self.pick(platform, weekday_from_index(weekday_index)?, rng)
    }
}

/// Pick a time from the curated table using the thread-local generator.
pub fn pick_time(platform: Platform, weekday: Weekday) -> EngineResult<PublishTime> {
    TimePicker::new(TimeWindowTable::curated()).pick(platform, weekday, &mut rand::rng())
}
