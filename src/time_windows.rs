//! Curated publish-time windows per platform and weekday.
//!
//! Windows are fractional hours (`11.5` is 11:30). The curated table keeps
//! the two platforms apart on the same weekday: Facebook leans to mornings,
//! Instagram to midday and evenings.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::calendar::WEEKDAYS;
use crate::error::{EngineError, EngineResult};
use crate::occupancy::Platform;

/// Granularity of generated publish times.
pub const SLOT_MINUTES: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: f64,
    pub end: f64,
}

impl TimeWindow {
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn start_minute(&self) -> u32 {
        (self.start * 60.0).round() as u32
    }

    pub fn end_minute(&self) -> u32 {
        (self.end * 60.0).round() as u32
    }

    /// First and last 5-minute marks lying strictly inside the window.
    pub fn interior_marks(&self) -> Option<(u32, u32)> {
        let start = self.start_minute();
        let end = self.end_minute();
        if end == 0 {
            return None;
        }
        let first = (start / SLOT_MINUTES + 1) * SLOT_MINUTES;
        let last = ((end - 1) / SLOT_MINUTES) * SLOT_MINUTES;
        (first <= last).then_some((first, last))
    }

    pub fn contains_strictly(&self, minute_of_day: u32) -> bool {
        minute_of_day > self.start_minute() && minute_of_day < self.end_minute()
    }

    fn validate(&self) -> EngineResult<()> {
        if !self.start.is_finite() || !self.end.is_finite() {
            return Err(EngineError::InvalidTimeWindow(format!(
                "window {}-{} is not finite",
                self.start, self.end
            )));
        }
        if self.start < 0.0 || self.end > 24.0 || self.start >= self.end {
            return Err(EngineError::InvalidTimeWindow(format!(
                "window {}-{} must satisfy 0 <= start < end <= 24",
                self.start, self.end
            )));
        }
        if self.interior_marks().is_none() {
            return Err(EngineError::InvalidTimeWindow(format!(
                "window {}-{} is too narrow for {SLOT_MINUTES}-minute slots",
                self.start, self.end
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeWindowTable {
    platforms: HashMap<Platform, HashMap<Weekday, Vec<TimeWindow>>>,
}

static CURATED: LazyLock<TimeWindowTable> = LazyLock::new(TimeWindowTable::build_curated);

impl Default for TimeWindowTable {
    fn default() -> Self {
        CURATED.clone()
    }
}

impl TimeWindowTable {
    /// The built-in table, built once per process.
    pub fn curated() -> &'static TimeWindowTable {
        &CURATED
    }

    pub fn empty() -> Self {
        Self {
            platforms: HashMap::new(),
        }
    }

    pub fn set_windows(&mut self, platform: Platform, weekday: Weekday, windows: Vec<TimeWindow>) {
        self.platforms
            .entry(platform)
            .or_default()
            .insert(weekday, windows);
    }

    pub fn windows(&self, platform: Platform, weekday: Weekday) -> &[TimeWindow] {
        self.platforms
            .get(&platform)
            .and_then(|days| days.get(&weekday))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every (platform, weekday) pair needs at least one valid window, and
    /// the windows of one pair may not overlap.
    pub fn validate(&self) -> EngineResult<()> {
        for platform in Platform::ALL {
            for weekday in WEEKDAYS {
                let windows = self.windows(platform, weekday);
                if windows.is_empty() {
                    return Err(EngineError::NoTimeWindow { platform, weekday });
                }
                for window in windows {
                    window.validate()?;
                }
                let mut sorted = windows.to_vec();
                sorted.sort_by(|a, b| a.start.total_cmp(&b.start));
                for pair in sorted.windows(2) {
                    if pair[0].end > pair[1].start {
                        return Err(EngineError::InvalidTimeWindow(format!(
                            "{platform} windows on {weekday} overlap ({}-{} and {}-{})",
                            pair[0].start, pair[0].end, pair[1].start, pair[1].end
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    fn build_curated() -> Self {
        let w = TimeWindow::new;
        let mut table = Self::empty();

        let facebook = [
            (Weekday::Sun, vec![w(9.0, 11.0)]),
            (Weekday::Mon, vec![w(9.0, 10.5), w(12.0, 13.0)]),
            (Weekday::Tue, vec![w(9.0, 11.0), w(13.0, 14.0)]),
            (Weekday::Wed, vec![w(9.0, 11.5)]),
            (Weekday::Thu, vec![w(9.0, 11.0), w(12.0, 13.0)]),
            (Weekday::Fri, vec![w(9.0, 11.0)]),
            (Weekday::Sat, vec![w(10.0, 12.0)]),
        ];
        let instagram = [
            (Weekday::Sun, vec![w(17.0, 19.0)]),
            (Weekday::Mon, vec![w(14.0, 16.0), w(19.0, 21.0)]),
            (Weekday::Tue, vec![w(11.5, 12.75), w(18.0, 20.0)]),
            (Weekday::Wed, vec![w(12.0, 14.0), w(19.0, 21.0)]),
            (Weekday::Thu, vec![w(13.5, 15.0), w(19.0, 21.0)]),
            (Weekday::Fri, vec![w(11.5, 13.5)]),
            (Weekday::Sat, vec![w(13.0, 15.0), w(19.0, 20.5)]),
        ];

        for (weekday, windows) in facebook {
            table.set_windows(Platform::Facebook, weekday, windows);
        }
        for (weekday, windows) in instagram {
            table.set_windows(Platform::Instagram, weekday, windows);
        }
        table
    }
}
