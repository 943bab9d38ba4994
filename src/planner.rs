//! Unattended schedule generation: a calendar of empty publish slots for
//! the next few weeks, with no input rows.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::calendar::date_range;
use crate::config::SchedulerConfig;
use crate::error::{EngineError, EngineResult};
use crate::occupancy::{OccupancySnapshot, Platform};
use crate::priority::select_posting_days;
use crate::time_picker::{PublishTime, TimePicker};
use crate::time_windows::TimeWindowTable;

/// Longest plan, in weeks.
pub const MAX_WEEKS: u32 = 52;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub start_date: NaiveDate,
    pub weeks: u32,
    pub posts_per_week: u8,
}

impl PlanRequest {
    pub fn new(start_date: NaiveDate, weeks: u32, posts_per_week: u8) -> Self {
        Self {
            start_date,
            weeks,
            posts_per_week,
        }
    }

    pub fn from_config(start_date: NaiveDate, config: &SchedulerConfig) -> Self {
        Self::new(start_date, config.weeks, config.posts_per_week)
    }

    /// Last day covered, inclusive.
    pub fn end_date(&self) -> EngineResult<NaiveDate> {
        if self.weeks == 0 || self.weeks > MAX_WEEKS {
            return Err(EngineError::InvalidWeeks(self.weeks));
        }
        let days = u64::from(self.weeks) * 7 - 1;
        self.start_date
            .checked_add_days(Days::new(days))
            .ok_or(EngineError::DateOverflow {
                start: self.start_date,
                days,
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedSlot {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub facebook_time: PublishTime,
    pub instagram_time: PublishTime,
}

impl PlannedSlot {
    pub fn time_for(&self, platform: Platform) -> PublishTime {
        match platform {
            Platform::Facebook => self.facebook_time,
            Platform::Instagram => self.instagram_time,
        }
    }
}

pub struct SchedulePlanner<'a> {
    table: &'a TimeWindowTable,
}

impl<'a> SchedulePlanner<'a> {
    pub fn new(table: &'a TimeWindowTable) -> Self {
        Self { table }
    }

    /// Expand the request's weeks into dates, keep the best weekdays that
    /// are free on both platforms and give each a time per platform.
    pub fn generate<R: Rng>(
        &self,
        request: &PlanRequest,
        committed: &OccupancySnapshot,
        rng: &mut R,
    ) -> EngineResult<Vec<PlannedSlot>> {
        let pool = date_range(request.start_date, request.end_date()?)?;
        let taken = committed.occupied_dates();
        let days = select_posting_days(&pool, request.posts_per_week, &taken)?;

        let picker = TimePicker::new(self.table);
        let mut slots = Vec::with_capacity(days.len());
        for date in days {
            let weekday = date.weekday();
            slots.push(PlannedSlot {
                date,
                weekday,
                facebook_time: picker.pick(Platform::Facebook, weekday, rng)?,
                instagram_time: picker.pick(Platform::Instagram, weekday, rng)?,
            });
        }

        info!(
            start = %request.start_date,
            weeks = request.weeks,
            slots = slots.len(),
            "generated unattended plan"
        );
        Ok(slots)
    }
}

/// Plan with the curated time windows and the thread-local generator.
pub fn generate_plan(
    request: &PlanRequest,
    committed: &OccupancySnapshot,
) -> EngineResult<Vec<PlannedSlot>> {
    SchedulePlanner::new(TimeWindowTable::curated()).generate(request, committed, &mut rand::rng())
}
