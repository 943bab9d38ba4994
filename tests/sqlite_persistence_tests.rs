#![cfg(feature = "sqlite")]

use chrono::NaiveDate;
use post_scheduler::{
    ContentRow, OccupancySnapshot, PersistenceError, PlanRequest, Platform, SlotStore,
    SqliteSlotStore, assign_dates, date_range, generate_plan,
};
use tempfile::NamedTempFile;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn committed_rows_show_up_as_occupancy() {
    let file = NamedTempFile::new().unwrap();
    let store = SqliteSlotStore::new(file.path()).unwrap();

    let rows = vec![
        ContentRow::new(1, "first"),
        ContentRow::new(2, "second").with_date("2025-06-04"),
    ];
    let range = date_range(d(2025, 6, 1), d(2025, 6, 7)).unwrap();
    let result = assign_dates(&rows, &range, &store.occupancy(d(2025, 6, 1), d(2025, 6, 7)).unwrap())
        .unwrap();
    assert_eq!(store.commit_result(&result).unwrap(), 2);

    let reopened = SqliteSlotStore::new(file.path()).unwrap();
    let snapshot = reopened.occupancy(d(2025, 6, 1), d(2025, 6, 30)).unwrap();
    assert_eq!(snapshot.occupied_platforms(d(2025, 6, 1)), Platform::ALL.to_vec());
    assert_eq!(snapshot.occupied_platforms(d(2025, 6, 4)), Platform::ALL.to_vec());
    assert!(snapshot.is_available(d(2025, 6, 2)));

    // outside the queried window
    let narrow = reopened.occupancy(d(2025, 6, 2), d(2025, 6, 3)).unwrap();
    assert_eq!(narrow, OccupancySnapshot::new());
}

#[test]
fn second_batch_avoids_dates_from_the_first() {
    let store = SqliteSlotStore::in_memory().unwrap();
    let range = date_range(d(2025, 6, 1), d(2025, 6, 7)).unwrap();

    let first = vec![ContentRow::new(1, "a"), ContentRow::new(2, "b")];
    let occupancy = store.occupancy(d(2025, 6, 1), d(2025, 6, 7)).unwrap();
    store
        .commit_result(&assign_dates(&first, &range, &occupancy).unwrap())
        .unwrap();

    let second = vec![ContentRow::new(1, "c")];
    let occupancy = store.occupancy(d(2025, 6, 1), d(2025, 6, 7)).unwrap();
    let result = assign_dates(&second, &range, &occupancy).unwrap();
    assert_eq!(result.scheduled_rows[0].assigned_date, Some(d(2025, 6, 3)));
}

#[test]
fn conflicting_commit_rolls_back() {
    let store = SqliteSlotStore::in_memory().unwrap();
    let range = date_range(d(2025, 6, 1), d(2025, 6, 7)).unwrap();
    let empty = OccupancySnapshot::new();

    let one = assign_dates(&[ContentRow::new(1, "x").with_date("2025-06-03")], &range, &empty)
        .unwrap();
    store.commit_result(&one).unwrap();

    // computed against a stale snapshot: 06-01 is new, 06-03 clashes
    let stale = assign_dates(
        &[
            ContentRow::new(1, "y"),
            ContentRow::new(2, "z").with_date("2025-06-03"),
        ],
        &range,
        &empty,
    )
    .unwrap();
    assert!(matches!(
        store.commit_result(&stale),
        Err(PersistenceError::Sqlite(_))
    ));

    let snapshot = store.occupancy(d(2025, 6, 1), d(2025, 6, 7)).unwrap();
    assert!(snapshot.is_available(d(2025, 6, 1)));
    assert_eq!(snapshot.occupied_dates().len(), 1);
}

#[test]
fn results_that_cannot_proceed_are_not_committed() {
    let store = SqliteSlotStore::in_memory().unwrap();
    let range = date_range(d(2025, 6, 1), d(2025, 6, 7)).unwrap();
    let blocked = assign_dates(
        &[ContentRow::new(1, "bad").with_date("not a date")],
        &range,
        &OccupancySnapshot::new(),
    )
    .unwrap();

    assert!(matches!(
        store.commit_result(&blocked),
        Err(PersistenceError::InvalidData(_))
    ));
}

#[test]
fn planned_slots_are_committed_for_both_platforms() {
    let store = SqliteSlotStore::in_memory().unwrap();
    let plan = generate_plan(
        &PlanRequest::new(d(2025, 6, 1), 2, 3),
        &OccupancySnapshot::new(),
    )
    .unwrap();
    assert_eq!(store.commit_plan(&plan).unwrap(), 6);

    let snapshot = store.occupancy(d(2025, 6, 1), d(2025, 6, 14)).unwrap();
    assert_eq!(snapshot.dates(Platform::Facebook).len(), 6);
    assert_eq!(snapshot.dates(Platform::Instagram).len(), 6);

    // the next plan steers around what is already booked
    let next = generate_plan(&PlanRequest::new(d(2025, 6, 1), 2, 3), &snapshot).unwrap();
    assert!(next.iter().all(|slot| !snapshot.occupied_dates().contains(&slot.date)));
}

#[test]
fn single_dates_can_be_marked_once() {
    let store = SqliteSlotStore::in_memory().unwrap();
    assert!(store.occupy(Platform::Facebook, d(2025, 6, 9)).unwrap());
    assert!(!store.occupy(Platform::Facebook, d(2025, 6, 9)).unwrap());
    assert!(store.occupy(Platform::Instagram, d(2026, 1, 2)).unwrap());

    let all = store.snapshot().unwrap();
    assert_eq!(all.occupied_platforms(d(2025, 6, 9)), vec![Platform::Facebook]);
    assert_eq!(all.occupied_platforms(d(2026, 1, 2)), vec![Platform::Instagram]);
    assert_eq!(all.occupied_dates().len(), 2);
}
