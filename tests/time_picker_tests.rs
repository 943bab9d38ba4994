use chrono::Weekday;
use post_scheduler::calendar::WEEKDAYS;
use post_scheduler::{
    EngineError, Platform, PublishTime, TimePicker, TimeWindow, TimeWindowTable, pick_time,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn in_some_window(windows: &[TimeWindow], time: PublishTime) -> bool {
    windows
        .iter()
        .any(|window| window.contains_strictly(time.minute_of_day()))
}

#[test]
fn curated_table_is_complete_and_valid() {
    TimeWindowTable::curated().validate().unwrap();
}

#[test]
fn picked_times_stay_inside_windows_on_five_minute_marks() {
    let table = TimeWindowTable::curated();
    let picker = TimePicker::new(table);
    let mut rng = StdRng::seed_from_u64(7);

    for platform in Platform::ALL {
        for weekday in WEEKDAYS {
            let windows = table.windows(platform, weekday);
            for _ in 0..200 {
                let time = picker.pick(platform, weekday, &mut rng).unwrap();
                assert_eq!(time.minute_of_day() % 5, 0, "{platform} {weekday} {time}");
                assert!(
                    in_some_window(windows, time),
                    "{time} outside {platform} windows on {weekday}"
                );
            }
        }
    }
}

#[test]
fn same_seed_gives_same_time() {
    let picker = TimePicker::new(TimeWindowTable::curated());
    let first = picker
        .pick(Platform::Instagram, Weekday::Wed, &mut StdRng::seed_from_u64(42))
        .unwrap();
    let second = picker
        .pick(Platform::Instagram, Weekday::Wed, &mut StdRng::seed_from_u64(42))
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn both_windows_of_a_pair_get_used() {
    let table = TimeWindowTable::curated();
    let picker = TimePicker::new(table);
    let windows = table.windows(Platform::Instagram, Weekday::Mon);
    assert_eq!(windows.len(), 2);

    let mut rng = StdRng::seed_from_u64(3);
    let mut hits = [0usize; 2];
    for _ in 0..400 {
        let time = picker
            .pick(Platform::Instagram, Weekday::Mon, &mut rng)
            .unwrap();
        for (idx, window) in windows.iter().enumerate() {
            if window.contains_strictly(time.minute_of_day()) {
                hits[idx] += 1;
            }
        }
    }
    assert!(hits[0] > 0 && hits[1] > 0, "hits: {hits:?}");
}

#[test]
fn narrow_window_lands_on_its_only_interior_mark() {
    let mut table = TimeWindowTable::empty();
    table.set_windows(
        Platform::Facebook,
        Weekday::Fri,
        vec![TimeWindow::new(9.0, 9.25)],
    );
    let picker = TimePicker::new(&table);
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..50 {
        let time = picker.pick(Platform::Facebook, Weekday::Fri, &mut rng).unwrap();
        let minute = time.minute_of_day();
        assert!((545..=550).contains(&minute), "{time}");
    }
}

#[test]
fn every_interior_mark_is_equally_likely() {
    let mut table = TimeWindowTable::empty();
    // 09:00-09:30 has five interior marks, 09:05 through 09:25
    table.set_windows(
        Platform::Instagram,
        Weekday::Tue,
        vec![TimeWindow::new(9.0, 9.5)],
    );
    let picker = TimePicker::new(&table);
    let mut rng = StdRng::seed_from_u64(21);

    let mut counts = [0usize; 5];
    for _ in 0..5000 {
        let minute = picker
            .pick(Platform::Instagram, Weekday::Tue, &mut rng)
            .unwrap()
            .minute_of_day();
        counts[((minute - 545) / 5) as usize] += 1;
    }
    // 1000 expected per mark; an edge-heavy draw would give the ends ~1250
    for count in counts {
        assert!((850..1150).contains(&count), "counts: {counts:?}");
    }
}

#[test]
fn weekday_index_zero_is_sunday() {
    let table = TimeWindowTable::curated();
    let picker = TimePicker::new(table);
    let mut rng = StdRng::seed_from_u64(11);
    let time = picker
        .pick_for_index(Platform::Facebook, 0, &mut rng)
        .unwrap();
    assert!(in_some_window(
        table.windows(Platform::Facebook, Weekday::Sun),
        time
    ));
    assert_eq!(
        picker.pick_for_index(Platform::Facebook, 9, &mut rng),
        Err(EngineError::InvalidWeekdayIndex(9))
    );
}

#[test]
fn missing_pair_is_an_error() {
    let table = TimeWindowTable::empty();
    let picker = TimePicker::new(&table);
    let err = picker
        .pick(Platform::Instagram, Weekday::Sat, &mut StdRng::seed_from_u64(0))
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::NoTimeWindow {
            platform: Platform::Instagram,
            weekday: Weekday::Sat
        }
    );
}

#[test]
fn table_validation_rejects_bad_windows() {
    let mut table = TimeWindowTable::curated().clone();
    table.set_windows(
        Platform::Facebook,
        Weekday::Mon,
        vec![TimeWindow::new(9.0, 11.0), TimeWindow::new(10.0, 12.0)],
    );
    assert!(matches!(
        table.validate(),
        Err(EngineError::InvalidTimeWindow(_))
    ));

    table.set_windows(Platform::Facebook, Weekday::Mon, vec![TimeWindow::new(13.0, 12.0)]);
    assert!(table.validate().is_err());

    table.set_windows(Platform::Facebook, Weekday::Mon, vec![]);
    assert!(matches!(
        table.validate(),
        Err(EngineError::NoTimeWindow { .. })
    ));
}

#[test]
fn publish_time_displays_and_parses_hh_mm() {
    let time: PublishTime = "09:05".parse().unwrap();
    assert_eq!(time.to_string(), "09:05");
    assert_eq!(time.minute_of_day(), 545);
    assert_eq!(
        serde_json::to_string(&time).unwrap(),
        "\"09:05\"".to_string()
    );
    let back: PublishTime = serde_json::from_str("\"21:30\"").unwrap();
    assert_eq!(back.to_string(), "21:30");
}

#[test]
fn thread_rng_helper_uses_curated_table() {
    let time = pick_time(Platform::Facebook, Weekday::Wed).unwrap();
    assert!(in_some_window(
        TimeWindowTable::curated().windows(Platform::Facebook, Weekday::Wed),
        time
    ));
}
