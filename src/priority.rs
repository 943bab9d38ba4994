//! Weekday engagement ranking and the posting-day selector.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

use crate::calendar::group_by_week;
use crate::error::{EngineError, EngineResult};

pub const MIN_POSTS_PER_WEEK: u8 = 3;
pub const MAX_POSTS_PER_WEEK: u8 = 7;

/// At or below this many posts a week the lowest-ranked weekday is skipped.
const SKIP_LOWEST_AT_OR_BELOW: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekdayPriority {
    Peak,
    High,
    Moderate,
    Lowest,
}

impl WeekdayPriority {
    pub fn of(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Wed | Weekday::Thu => WeekdayPriority::Peak,
            Weekday::Tue | Weekday::Fri => WeekdayPriority::High,
            Weekday::Mon | Weekday::Sat => WeekdayPriority::Moderate,
            Weekday::Sun => WeekdayPriority::Lowest,
        }
    }

    /// Smaller is better.
    pub fn rank(&self) -> u8 {
        *self as u8
    }
}

pub struct PostingDaySelector<'a> {
    pool: &'a [NaiveDate],
    committed: &'a BTreeSet<NaiveDate>,
}

impl<'a> PostingDaySelector<'a> {
    pub fn new(pool: &'a [NaiveDate], committed: &'a BTreeSet<NaiveDate>) -> Self {
        Self { pool, committed }
    }

    /// Pick up to `posts_per_week` dates from every Sunday-start week of the
    /// pool, best-ranked weekdays first, returned in chronological order.
    pub fn select(&self, posts_per_week: u8) -> EngineResult<Vec<NaiveDate>> {
        if !(MIN_POSTS_PER_WEEK..=MAX_POSTS_PER_WEEK).contains(&posts_per_week) {
            return Err(EngineError::InvalidPostsPerWeek(posts_per_week));
        }
        let skip_lowest = posts_per_week <= SKIP_LOWEST_AT_OR_BELOW;

        let open = self
            .pool
            .iter()
            .copied()
            .filter(|date| !self.committed.contains(date));

        let mut selected = Vec::new();
        for (week, mut dates) in group_by_week(open) {
            if skip_lowest {
                dates.retain(|date| {
                    WeekdayPriority::of(date.weekday()) != WeekdayPriority::Lowest
                });
            }
            dates.sort_by_key(|date| (WeekdayPriority::of(date.weekday()), *date));
            dates.truncate(posts_per_week as usize);
            debug!(%week, picked = dates.len(), "selected posting days");
            selected.extend(dates);
        }

        selected.sort();
        selected.dedup();
        Ok(selected)
    }
}

pub fn select_posting_days(
    pool: &[NaiveDate],
    posts_per_week: u8,
    committed: &BTreeSet<NaiveDate>,
) -> EngineResult<Vec<NaiveDate>> {
    PostingDaySelector::new(pool, committed).select(posts_per_week)
}
