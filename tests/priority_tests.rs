use chrono::{Datelike, NaiveDate, Weekday};
use post_scheduler::{
    EngineError, PostingDaySelector, WeekdayPriority, date_range, select_posting_days,
};
use std::collections::BTreeSet;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// 2025-06-01 is a Sunday, so June 1-14 is two full weeks.
fn two_weeks() -> Vec<NaiveDate> {
    date_range(d(2025, 6, 1), d(2025, 6, 14)).unwrap()
}

fn weekdays(dates: &[NaiveDate]) -> Vec<Weekday> {
    dates.iter().map(|date| date.weekday()).collect()
}

#[test]
fn priority_tiers_rank_midweek_first() {
    assert_eq!(WeekdayPriority::of(Weekday::Wed), WeekdayPriority::Peak);
    assert_eq!(WeekdayPriority::of(Weekday::Thu), WeekdayPriority::Peak);
    assert_eq!(WeekdayPriority::of(Weekday::Tue), WeekdayPriority::High);
    assert_eq!(WeekdayPriority::of(Weekday::Fri), WeekdayPriority::High);
    assert_eq!(WeekdayPriority::of(Weekday::Mon), WeekdayPriority::Moderate);
    assert_eq!(WeekdayPriority::of(Weekday::Sat), WeekdayPriority::Moderate);
    assert_eq!(WeekdayPriority::of(Weekday::Sun), WeekdayPriority::Lowest);
    assert!(WeekdayPriority::Peak.rank() < WeekdayPriority::Lowest.rank());
}

#[test]
fn three_posts_take_the_best_days_each_week() {
    let selected = select_posting_days(&two_weeks(), 3, &BTreeSet::new()).unwrap();
    assert_eq!(
        selected,
        vec![
            d(2025, 6, 3),
            d(2025, 6, 4),
            d(2025, 6, 5),
            d(2025, 6, 10),
            d(2025, 6, 11),
            d(2025, 6, 12),
        ]
    );
}

#[test]
fn four_posts_never_use_the_lowest_day() {
    // Only Sunday and Monday are left in the first week.
    let pool = vec![d(2025, 6, 1), d(2025, 6, 2)];
    let selected = select_posting_days(&pool, 4, &BTreeSet::new()).unwrap();
    assert_eq!(selected, vec![d(2025, 6, 2)]);
}

#[test]
fn five_posts_may_use_the_lowest_day_when_needed() {
    let pool = vec![d(2025, 6, 1), d(2025, 6, 2)];
    let selected = select_posting_days(&pool, 5, &BTreeSet::new()).unwrap();
    assert_eq!(selected, vec![d(2025, 6, 1), d(2025, 6, 2)]);
}

#[test]
fn seven_posts_fill_the_whole_week() {
    let selected = select_posting_days(&two_weeks(), 7, &BTreeSet::new()).unwrap();
    assert_eq!(selected, two_weeks());
}

#[test]
fn six_posts_drop_only_sunday() {
    let pool = date_range(d(2025, 6, 1), d(2025, 6, 7)).unwrap();
    let selected = select_posting_days(&pool, 6, &BTreeSet::new()).unwrap();
    assert!(!weekdays(&selected).contains(&Weekday::Sun));
    assert_eq!(selected.len(), 6);
}

#[test]
fn committed_dates_are_replaced_by_the_next_best_day() {
    let committed = BTreeSet::from([d(2025, 6, 4)]); // Wednesday
    let pool = date_range(d(2025, 6, 1), d(2025, 6, 7)).unwrap();
    let selected = PostingDaySelector::new(&pool, &committed)
        .select(3)
        .unwrap();
    assert_eq!(
        weekdays(&selected),
        vec![Weekday::Tue, Weekday::Thu, Weekday::Fri]
    );
}

#[test]
fn partial_weeks_are_grouped_by_sunday() {
    // Thursday 2025-06-05 through Tuesday 2025-06-10
    let pool = date_range(d(2025, 6, 5), d(2025, 6, 10)).unwrap();
    let selected = select_posting_days(&pool, 3, &BTreeSet::new()).unwrap();
    assert_eq!(
        selected,
        vec![
            d(2025, 6, 5),
            d(2025, 6, 6),
            d(2025, 6, 7),
            d(2025, 6, 9),
            d(2025, 6, 10),
        ]
    );
    assert!(selected.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn posts_per_week_outside_three_to_seven_is_rejected() {
    for bad in [0u8, 2, 8] {
        assert_eq!(
            select_posting_days(&two_weeks(), bad, &BTreeSet::new()),
            Err(EngineError::InvalidPostsPerWeek(bad))
        );
    }
}
