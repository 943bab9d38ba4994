use chrono::{Datelike, Days, NaiveDate, Weekday};
use std::collections::BTreeMap;

use crate::error::{EngineError, EngineResult};

/// Weekdays in index order, 0 = Sunday.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Longest candidate range, in days, the engine accepts.
pub const MAX_RANGE_DAYS: i64 = 366;

/// Every date from `start` to `end`, both inclusive, ascending.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> EngineResult<Vec<NaiveDate>> {
    if start > end {
        return Err(EngineError::StartAfterEnd { start, end });
    }
    let span = (end - start).num_days() + 1;
    if span > MAX_RANGE_DAYS {
        return Err(EngineError::RangeTooLong { days: span });
    }

    Ok(start.iter_days().take(span as usize).collect())
}

/// A candidate pool must be strictly ascending and span between 1 and
/// [`MAX_RANGE_DAYS`] days.
pub fn validate_range_dates(dates: &[NaiveDate]) -> EngineResult<()> {
    let (Some(first), Some(last)) = (dates.first(), dates.last()) else {
        return Err(EngineError::EmptyRange);
    };
    let span = (*last - *first).num_days() + 1;
    if span > MAX_RANGE_DAYS {
        return Err(EngineError::RangeTooLong { days: span });
    }
    for pair in dates.windows(2) {
        if pair[0] >= pair[1] {
            return Err(EngineError::UnsortedRange {
                previous: pair[0],
                next: pair[1],
            });
        }
    }
    Ok(())
}

/// Sunday that opens the calendar week containing `date`. The first
/// supported week is keyed by [`NaiveDate::MIN`].
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let back = Days::new(u64::from(date.weekday().num_days_from_sunday()));
    date.checked_sub_days(back).unwrap_or(NaiveDate::MIN)
}

/// Group dates by Sunday-start calendar week, keyed by that Sunday.
/// Dates keep their input order inside each group.
pub fn group_by_week<I>(dates: I) -> BTreeMap<NaiveDate, Vec<NaiveDate>>
where
    I: IntoIterator<Item = NaiveDate>,
{
    let mut weeks: BTreeMap<NaiveDate, Vec<NaiveDate>> = BTreeMap::new();
    for date in dates {
        weeks.entry(week_start(date)).or_default().push(date);
    }
    weeks
}

pub fn weekday_from_index(index: u32) -> EngineResult<Weekday> {
    WEEKDAYS
        .get(index as usize)
        .copied()
        .ok_or(EngineError::InvalidWeekdayIndex(index))
}

pub fn weekday_index(weekday: Weekday) -> u32 {
    weekday.num_days_from_sunday()
}
