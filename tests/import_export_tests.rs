use chrono::NaiveDate;
use post_scheduler::{
    ContentRow, OccupancySnapshot, PersistenceError, PlanRequest, SchedulingResult, assign_dates,
    date_range, generate_plan, load_rows_from_csv, read_rows_from_csv, save_plan_to_csv,
    save_result_to_json, save_scheduled_rows_to_csv,
};
use std::fs;
use std::io::Write;
use tempfile::NamedTempFile;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_result() -> SchedulingResult {
    let rows = vec![
        ContentRow::new(1, "Morning, coffee").with_image("img/coffee.png"),
        ContentRow::new(2, "Launch").with_date("2025-06-05"),
        ContentRow::new(3, "Recap"),
    ];
    let range = date_range(d(2025, 6, 1), d(2025, 6, 7)).unwrap();
    assign_dates(&rows, &range, &OccupancySnapshot::new()).unwrap()
}

#[test]
fn csv_rows_load_with_any_header_case() {
    let data = "Date,TEXT,Image\n\
                2025-06-03,\"Hello, world\",img/a.png\n\
                ,Second post,\n\
                ,,\n\
                6/9/2025,  Third  ,\n";
    let rows = read_rows_from_csv(data.as_bytes()).unwrap();

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].row_index, 1);
    assert_eq!(rows[0].raw_date, "2025-06-03");
    assert_eq!(rows[0].text, "Hello, world");
    assert_eq!(rows[0].image_ref.as_deref(), Some("img/a.png"));

    assert_eq!(rows[1].row_index, 2);
    assert!(!rows[1].has_anchor_candidate());
    assert_eq!(rows[1].image_ref, None);

    // the blank record still takes up row 3
    assert_eq!(rows[2].row_index, 4);
    assert_eq!(rows[2].raw_date, "6/9/2025");
    assert_eq!(rows[2].text, "Third");
}

#[test]
fn csv_without_date_column_gives_unanchored_rows() {
    let rows = read_rows_from_csv("text\nfirst\nsecond\n".as_bytes()).unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row.raw_date.is_empty()));
}

#[test]
fn csv_missing_text_is_rejected() {
    let err = read_rows_from_csv("date,body\n2025-06-01,hi\n".as_bytes()).unwrap_err();
    assert!(matches!(err, PersistenceError::InvalidData(msg) if msg.contains("'text'")));

    let err = read_rows_from_csv("date,text\n2025-06-01,\n".as_bytes()).unwrap_err();
    assert!(matches!(err, PersistenceError::InvalidData(msg) if msg == "row 1 has no text"));
}

#[test]
fn csv_rows_load_from_a_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "date,text").unwrap();
    writeln!(file, "06-02-2025,From disk").unwrap();
    file.flush().unwrap();

    let rows = load_rows_from_csv(file.path()).unwrap();
    assert_eq!(rows, vec![ContentRow::new(1, "From disk").with_date("06-02-2025")]);

    assert!(matches!(
        load_rows_from_csv("/definitely/not/here.csv"),
        Err(PersistenceError::Io(_))
    ));
}

#[test]
fn result_round_trips_through_json() {
    let result = sample_result();
    let file = NamedTempFile::new().unwrap();
    save_result_to_json(&result, file.path()).unwrap();

    let text = fs::read_to_string(file.path()).unwrap();
    let loaded: SchedulingResult = serde_json::from_str(&text).unwrap();
    assert_eq!(loaded, result);
    assert!(text.contains("\"can_proceed\": true"));
}

#[test]
fn scheduled_rows_export_in_date_order() {
    let result = sample_result();
    let file = NamedTempFile::new().unwrap();
    save_scheduled_rows_to_csv(&result, file.path()).unwrap();

    let text = fs::read_to_string(file.path()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "row,date,text,image",
            "1,2025-06-01,\"Morning, coffee\",img/coffee.png",
            "2,2025-06-05,Launch,",
            "3,2025-06-06,Recap,",
        ]
    );
}

#[test]
fn plan_exports_one_line_per_slot() {
    let plan = generate_plan(
        &PlanRequest::new(d(2025, 6, 1), 1, 3),
        &OccupancySnapshot::new(),
    )
    .unwrap();
    let file = NamedTempFile::new().unwrap();
    save_plan_to_csv(&plan, file.path()).unwrap();

    let text = fs::read_to_string(file.path()).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("date,weekday,facebook_time,instagram_time")
    );
    let first: Vec<&str> = lines.next().unwrap().split(',').collect();
    assert_eq!(first[0], "2025-06-03");
    assert_eq!(first[1], "Tue");
    assert_eq!(first[2], plan[0].facebook_time.to_string());
    assert_eq!(lines.count(), 2);
}
