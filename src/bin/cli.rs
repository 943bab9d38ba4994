use chrono::{Datelike, NaiveDate};
use post_scheduler::{
    ContentRow, OccupancySnapshot, PlanRequest, PlannedSlot, Platform, SchedulePlanner,
    SchedulerConfig, SchedulingResult, assign_dates, date_range, load_rows_from_csv,
    normalize_date, save_plan_to_csv, save_result_to_json,
};
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

struct Session {
    config: SchedulerConfig,
    range: (NaiveDate, NaiveDate),
    occupancy: OccupancySnapshot,
    rows: Vec<ContentRow>,
    last_result: Option<SchedulingResult>,
    last_plan: Option<Vec<PlannedSlot>>,
}

impl Session {
    fn new(config: SchedulerConfig) -> Self {
        let start = chrono::Local::now().date_naive();
        let end = PlanRequest::from_config(start, &config)
            .end_date()
            .unwrap_or(start);
        Self {
            config,
            range: (start, end),
            occupancy: OccupancySnapshot::new(),
            rows: Vec::new(),
            last_result: None,
            last_plan: None,
        }
    }

    fn next_row_index(&self) -> usize {
        self.rows.iter().map(|row| row.row_index).max().unwrap_or(0) + 1
    }
}

fn render_text_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (ci, cell) in row.iter().enumerate() {
            if cell.len() > widths[ci] {
                widths[ci] = cell.len();
            }
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_line(&widths, headers));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push_str(&render_line(&widths, &cells));
        out.push('\n');
    }
    out.push_str(&sep);
    out
}

fn render_line(widths: &[usize], cells: &[&str]) -> String {
    let mut line = String::from("|");
    for (ci, cell) in cells.iter().enumerate() {
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(widths[ci].saturating_sub(cell.len())));
        line.push_str(" |");
    }
    line
}

fn render_rows(rows: &[ContentRow]) -> String {
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                row.row_index.to_string(),
                row.raw_date.clone(),
                row.text.clone(),
                row.image_ref.clone().unwrap_or_default(),
            ]
        })
        .collect();
    render_text_table(&["row", "date", "text", "image"], &body)
}

fn render_result(result: &SchedulingResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("Assignment ({})\n", result.to_cli_summary()));

    let body: Vec<Vec<String>> = result
        .scheduled_rows
        .iter()
        .chain(result.unscheduled_rows.iter())
        .map(|row| {
            vec![
                row.row_index.to_string(),
                row.assigned_date.map(|d| d.to_string()).unwrap_or_default(),
                row.text.clone(),
                row.failure.clone().unwrap_or_default(),
            ]
        })
        .collect();
    out.push_str(&render_text_table(&["row", "date", "text", "failure"], &body));

    for error in &result.blocking_errors {
        out.push_str(&format!("\nBlocking: {error}"));
    }
    for issue in &result.issues {
        let kind = if issue.is_blocking { "blocking" } else { "warning" };
        out.push_str(&format!(
            "\nRow {} ({kind}): {} -> {}",
            issue.row_index, issue.problem, issue.suggested_fix
        ));
    }
    for suggestion in &result.suggestions {
        out.push_str(&format!("\nSuggestion: {suggestion}"));
    }
    out
}

fn render_plan(plan: &[PlannedSlot]) -> String {
    let body: Vec<Vec<String>> = plan
        .iter()
        .map(|slot| {
            vec![
                slot.date.to_string(),
                slot.weekday.to_string(),
                slot.facebook_time.to_string(),
                slot.instagram_time.to_string(),
            ]
        })
        .collect();
    render_text_table(&["date", "weekday", "facebook", "instagram"], &body)
}

fn render_occupancy(occupancy: &OccupancySnapshot) -> String {
    let body: Vec<Vec<String>> = occupancy
        .occupied_dates()
        .into_iter()
        .map(|date| {
            let platforms = occupancy
                .occupied_platforms(date)
                .iter()
                .map(|p| p.as_str())
                .collect::<Vec<_>>()
                .join(",");
            vec![date.to_string(), date.weekday().to_string(), platforms]
        })
        .collect();
    render_text_table(&["date", "weekday", "taken on"], &body)
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  range <start> <end>                Set the candidate date range\n  occupy <facebook|instagram|both> <date>\n                                     Mark a date as already taken\n  show                               Show range and occupied dates\n  add <date|-> <text...>             Append a content row ('-' = no anchor)\n  rows                               List content rows\n  clear                              Remove all content rows\n  load csv <path>                    Load content rows from CSV (date,text,image)\n  assign                             Assign publish dates to the rows\n  commit                             Claim the dates of the last assignment\n  plan <start> [weeks] [posts_per_week]\n                                     Generate an unattended posting plan\n  save json <path>                   Save the last assignment result\n  save plan <path>                   Save the last plan as CSV\n  quit|exit                          Exit"
    );
}

fn parse_user_date(raw: &str) -> Option<NaiveDate> {
    let date = normalize_date(raw);
    if date.is_none() {
        println!("Invalid date '{raw}' (use YYYY-MM-DD, MM/DD/YYYY or MM-DD-YYYY)");
    }
    date
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config = match SchedulerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Config error: {e}; using defaults");
            SchedulerConfig::default()
        }
    };
    let mut session = Session::new(config);

    println!("Post Scheduler (CLI) - type 'help' for commands\n");
    println!("Range: {} .. {}", session.range.0, session.range.1);

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "range" => match (parts.next(), parts.next()) {
                (Some(start_s), Some(end_s)) => {
                    let (Some(start), Some(end)) = (parse_user_date(start_s), parse_user_date(end_s))
                    else {
                        continue;
                    };
                    if start > end {
                        println!("Range start must be on or before range end.");
                        continue;
                    }
                    session.range = (start, end);
                    println!("Range: {start} .. {end}");
                }
                _ => println!("Usage: range <start> <end>"),
            },
            "occupy" => match (parts.next(), parts.next()) {
                (Some(platform_s), Some(date_s)) => {
                    let Some(date) = parse_user_date(date_s) else {
                        continue;
                    };
                    if platform_s.eq_ignore_ascii_case("both") {
                        session.occupancy.occupy_all(date);
                        println!("Marked {date} as taken on every platform.");
                        continue;
                    }
                    match platform_s.parse::<Platform>() {
                        Ok(platform) => {
                            if session.occupancy.occupy(platform, date) {
                                println!("Marked {date} as taken on {platform}.");
                            } else {
                                println!("{date} was already taken on {platform}.");
                            }
                        }
                        Err(e) => println!("Error: {e}"),
                    }
                }
                _ => println!("Usage: occupy <facebook|instagram|both> <date>"),
            },
            "show" => {
                println!("Range: {} .. {}", session.range.0, session.range.1);
                println!("{}", render_occupancy(&session.occupancy));
            }
            "add" => {
                let date_s = parts.next();
                let text = parts.collect::<Vec<_>>().join(" ");
                match date_s {
                    Some(date_s) if !text.is_empty() => {
                        let raw_date = if date_s == "-" { "" } else { date_s };
                        let row = ContentRow::new(session.next_row_index(), text).with_date(raw_date);
                        println!("Added row {}.", row.row_index);
                        session.rows.push(row);
                    }
                    _ => println!("Usage: add <date|-> <text...>"),
                }
            }
            "rows" => println!("{}", render_rows(&session.rows)),
            "clear" => {
                session.rows.clear();
                session.last_result = None;
                println!("Rows cleared.");
            }
            "load" => match (parts.next(), parts.next()) {
                (Some("csv"), Some(path)) => match load_rows_from_csv(path) {
                    Ok(rows) => {
                        println!("Loaded {} rows from {path}.", rows.len());
                        session.rows = rows;
                        session.last_result = None;
                    }
                    Err(e) => println!("Load error: {e}"),
                },
                _ => println!("Usage: load csv <path>"),
            },
            "assign" => {
                let range = match date_range(session.range.0, session.range.1) {
                    Ok(range) => range,
                    Err(e) => {
                        println!("Error: {e}");
                        continue;
                    }
                };
                match assign_dates(&session.rows, &range, &session.occupancy) {
                    Ok(result) => {
                        println!("{}", render_result(&result));
                        session.last_result = Some(result);
                    }
                    Err(e) => println!("Error: {e}"),
                }
            }
            "commit" => match session.last_result.take() {
                Some(result) if result.can_proceed => {
                    for row in &result.scheduled_rows {
                        if let Some(date) = row.assigned_date {
                            session.occupancy.occupy_all(date);
                        }
                    }
                    println!("Committed {} rows.", result.scheduled_rows.len());
                }
                Some(result) => {
                    println!("Last assignment cannot proceed; nothing committed.");
                    session.last_result = Some(result);
                }
                None => println!("Nothing to commit; run 'assign' first."),
            },
            "plan" => {
                let Some(start_s) = parts.next() else {
                    println!("Usage: plan <start> [weeks] [posts_per_week]");
                    continue;
                };
                let Some(start) = parse_user_date(start_s) else {
                    continue;
                };
                let weeks = match parts.next().map(str::parse::<u32>) {
                    None => session.config.weeks,
                    Some(Ok(v)) => v,
                    Some(Err(_)) => {
                        println!("Invalid weeks");
                        continue;
                    }
                };
                let posts_per_week = match parts.next().map(str::parse::<u8>) {
                    None => session.config.posts_per_week,
                    Some(Ok(v)) => v,
                    Some(Err(_)) => {
                        println!("Invalid posts_per_week");
                        continue;
                    }
                };
                let request = PlanRequest::new(start, weeks, posts_per_week);
                let planner = SchedulePlanner::new(&session.config.time_windows);
                match planner.generate(&request, &session.occupancy, &mut rand::rng()) {
                    Ok(plan) => {
                        println!("Planned {} slots.\n{}", plan.len(), render_plan(&plan));
                        session.last_plan = Some(plan);
                    }
                    Err(e) => println!("Plan error: {e}"),
                }
            }
            "save" => match (parts.next(), parts.next()) {
                (Some("json"), Some(path)) => match &session.last_result {
                    Some(result) => match save_result_to_json(result, path) {
                        Ok(_) => println!("Result saved to {path}."),
                        Err(e) => println!("Save error: {e}"),
                    },
                    None => println!("Nothing to save; run 'assign' first."),
                },
                (Some("plan"), Some(path)) => match &session.last_plan {
                    Some(plan) => match save_plan_to_csv(plan, path) {
                        Ok(_) => println!("Plan saved to {path}."),
                        Err(e) => println!("Save error: {e}"),
                    },
                    None => println!("Nothing to save; run 'plan' first."),
                },
                _ => println!("Usage: save <json|plan> <path>"),
            },
            _ => println!("Unknown command. Type 'help'."),
        }
    }
}
