//! Anchored date assignment.
//!
//! Turns an ordered batch of [`ContentRow`]s into publish dates drawn from a
//! candidate range. Rows that carry a date ("anchors") are pinned to it;
//! every other row takes the earliest free date that keeps it between the
//! anchors around it in row order.
//!
//! The run has two phases. First every blocking condition is checked
//! (unparseable dates, duplicate anchors, anchors outside the range or on
//! occupied dates, too few free dates). If any fires, nothing is assigned
//! and the whole batch comes back unscheduled. Otherwise rows are assigned
//! greedily in row order; a row that cannot be placed fails on its own and
//! the rest continue.

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

use crate::calendar::validate_range_dates;
use crate::dates::normalize_date;
use crate::error::EngineResult;
use crate::occupancy::{OccupancySnapshot, Platform};
use crate::report::{Issue, SchedulingResult, Summary};
use crate::row::{ContentRow, RowOutcome};

const DATE_FORMAT_FIX: &str =
    "Use YYYY-MM-DD, MM/DD/YYYY or MM-DD-YYYY, or leave the date empty to have one assigned";

pub struct DateAssignment<'a> {
    rows: &'a [ContentRow],
    range_dates: &'a [NaiveDate],
    occupancy: &'a OccupancySnapshot,
}

/// An anchor that survived validation, remembered with the row it came from.
#[derive(Debug, Clone, Copy)]
struct Pin {
    row_index: usize,
    date: NaiveDate,
}

impl<'a> DateAssignment<'a> {
    pub fn new(
        rows: &'a [ContentRow],
        range_dates: &'a [NaiveDate],
        occupancy: &'a OccupancySnapshot,
    ) -> Self {
        Self {
            rows,
            range_dates,
            occupancy,
        }
    }

    pub fn execute(&self) -> EngineResult<SchedulingResult> {
        validate_range_dates(self.range_dates)?;
        debug!(
            rows = self.rows.len(),
            range_days = self.range_dates.len(),
            "assigning publish dates"
        );

        let mut outcomes: Vec<RowOutcome> = self.rows.iter().map(RowOutcome::pending).collect();
        let mut issues = Vec::new();
        let mut blocking_errors = Vec::new();
        let mut suggestions = Vec::new();

        self.parse_anchors(&mut outcomes, &mut issues);
        self.reject_duplicate_anchors(&mut outcomes, &mut issues, &mut blocking_errors);
        self.validate_anchors(&mut outcomes, &mut issues, &mut suggestions);
        self.check_capacity(&outcomes, &mut blocking_errors, &mut suggestions);

        let blocked = !blocking_errors.is_empty() || issues.iter().any(|issue| issue.is_blocking);
        if blocked {
            warn!(
                batch_errors = blocking_errors.len(),
                row_errors = issues.iter().filter(|issue| issue.is_blocking).count(),
                "batch rejected before assignment"
            );
            return Ok(Self::finish(
                Vec::new(),
                outcomes,
                issues,
                blocking_errors,
                suggestions,
            ));
        }

        self.assign_sequentially(&mut outcomes, &mut issues);

        let (scheduled, unscheduled): (Vec<_>, Vec<_>) =
            outcomes.into_iter().partition(RowOutcome::is_scheduled);
        let result = Self::finish(scheduled, unscheduled, issues, blocking_errors, suggestions);
        info!(
            scheduled = result.summary.scheduled,
            unscheduled = result.summary.unscheduled,
            "assignment finished"
        );
        Ok(result)
    }

    fn parse_anchors(&self, outcomes: &mut [RowOutcome], issues: &mut Vec<Issue>) {
        for outcome in outcomes.iter_mut() {
            let raw = outcome.raw_date.trim();
            if raw.is_empty() {
                continue;
            }
            match normalize_date(raw) {
                Some(date) => outcome.anchored_date = Some(date),
                None => {
                    let problem = format!("Invalid date format \"{raw}\"");
                    outcome.failure = Some(problem.clone());
                    issues.push(Issue::blocking(outcome.row_index, problem, DATE_FORMAT_FIX));
                }
            }
        }
    }

    /// The first row claiming a date keeps it; every later claimant fails.
    fn reject_duplicate_anchors(
        &self,
        outcomes: &mut [RowOutcome],
        issues: &mut Vec<Issue>,
        blocking_errors: &mut Vec<String>,
    ) {
        let mut claims: BTreeMap<NaiveDate, Vec<usize>> = BTreeMap::new();
        for (position, outcome) in outcomes.iter().enumerate() {
            if let Some(date) = outcome.anchored_date {
                claims.entry(date).or_default().push(position);
            }
        }

        for (date, positions) in claims {
            if positions.len() < 2 {
                continue;
            }
            let row_list = positions
                .iter()
                .map(|&position| outcomes[position].row_index.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            blocking_errors.push(format!(
                "Duplicate date in CSV: {date} appears in rows {row_list}"
            ));

            let keeper = outcomes[positions[0]].row_index;
            for &position in &positions[1..] {
                let outcome = &mut outcomes[position];
                let problem = format!("Duplicate date {date}: already used by row {keeper}");
                outcome.failure = Some(problem.clone());
                issues.push(Issue::blocking(
                    outcome.row_index,
                    problem,
                    "Pick a different date for this row, or clear it to have one assigned",
                ));
            }
        }
    }

    fn validate_anchors(
        &self,
        outcomes: &mut [RowOutcome],
        issues: &mut Vec<Issue>,
        suggestions: &mut Vec<String>,
    ) {
        let in_range: BTreeSet<NaiveDate> = self.range_dates.iter().copied().collect();
        let first = self.range_dates[0];
        let last = self.range_dates[self.range_dates.len() - 1];
        let mut outside = false;

        for outcome in outcomes.iter_mut().filter(|outcome| outcome.failure.is_none()) {
            let Some(date) = outcome.anchored_date else {
                continue;
            };

            let rejection = if !in_range.contains(&date) {
                outside = true;
                Some((
                    format!("Date {date} is outside the selected range {first} to {last}"),
                    format!("Expand the range to include {date}"),
                ))
            } else {
                let taken = self.occupancy.occupied_platforms(date);
                if taken.is_empty() {
                    None
                } else {
                    let names = taken
                        .iter()
                        .map(Platform::label)
                        .collect::<Vec<_>>()
                        .join(" and ");
                    Some((
                        format!("Date {date} already has a post on {names}"),
                        "Pick a different date for this row".to_string(),
                    ))
                }
            };

            if let Some((problem, fix)) = rejection {
                outcome.failure = Some(problem.clone());
                issues.push(Issue::blocking(outcome.row_index, problem, fix));
            }
        }

        if outside {
            let anchors = outcomes.iter().filter_map(|outcome| outcome.anchored_date);
            let earliest = anchors.clone().min().map_or(first, |date| date.min(first));
            let latest = anchors.max().map_or(last, |date| date.max(last));
            suggestions.push(format!(
                "Expand the range to {earliest} to {latest} to cover every dated row"
            ));
        }
    }

    fn check_capacity(
        &self,
        outcomes: &[RowOutcome],
        blocking_errors: &mut Vec<String>,
        suggestions: &mut Vec<String>,
    ) {
        let occupied = self.occupancy.occupied_dates();
        let anchored: BTreeSet<NaiveDate> = outcomes
            .iter()
            .filter_map(|outcome| outcome.anchored_date)
            .collect();
        let available = self
            .range_dates
            .iter()
            .filter(|date| !occupied.contains(date) && !anchored.contains(date))
            .count();
        let needed = outcomes
            .iter()
            .filter(|outcome| outcome.raw_date.trim().is_empty())
            .count();

        if needed > available {
            let shortfall = needed - available;
            blocking_errors.push(format!(
                "Not enough open dates: {needed} rows need a date but only {available} are free in the selected range"
            ));
            let unit = if shortfall == 1 { "day" } else { "days" };
            suggestions.push(format!("Extend the date range by {shortfall} {unit}"));
        }
    }

    /// Greedy pass in row order. Only reached when no blocking condition
    /// fired, so every anchor left is valid.
    fn assign_sequentially(&self, outcomes: &mut [RowOutcome], issues: &mut Vec<Issue>) {
        let pins: Vec<Option<Pin>> = outcomes
            .iter()
            .map(|outcome| {
                outcome.anchored_date.map(|date| Pin {
                    row_index: outcome.row_index,
                    date,
                })
            })
            .collect();

        let mut used = self.occupancy.occupied_dates();
        used.extend(pins.iter().flatten().map(|pin| pin.date));

        for position in 0..outcomes.len() {
            if let Some(pin) = pins[position] {
                outcomes[position].assigned_date = Some(pin.date);
                continue;
            }

            let floor = pins[..position].iter().rev().find_map(|pin| *pin);
            let ceiling = pins[position + 1..].iter().find_map(|pin| *pin);

            let pick = self.range_dates.iter().copied().find(|date| {
                !used.contains(date)
                    && floor.is_none_or(|pin| *date > pin.date)
                    && ceiling.is_none_or(|pin| *date < pin.date)
            });

            let outcome = &mut outcomes[position];
            match pick {
                Some(date) => {
                    used.insert(date);
                    outcome.assigned_date = Some(date);
                }
                None => {
                    let (problem, fix) = Self::no_date_reason(floor, ceiling);
                    debug!(row = outcome.row_index, reason = %problem, "row left unscheduled");
                    outcome.failure = Some(problem.clone());
                    issues.push(Issue::non_blocking(outcome.row_index, problem, fix));
                }
            }
        }
    }

    fn no_date_reason(floor: Option<Pin>, ceiling: Option<Pin>) -> (String, String) {
        match (floor, ceiling) {
            (None, Some(ceiling)) => (
                format!("No available date before anchor {}", ceiling.date),
                format!(
                    "Move row {}'s date later or start the range earlier",
                    ceiling.row_index
                ),
            ),
            (Some(floor), None) => (
                format!("No available date after anchor {}", floor.date),
                format!(
                    "Move row {}'s date earlier or extend the range",
                    floor.row_index
                ),
            ),
            (Some(floor), Some(ceiling)) => (
                format!(
                    "No available date between anchor {} and anchor {}",
                    floor.date, ceiling.date
                ),
                format!(
                    "Spread the dates on rows {} and {} further apart",
                    floor.row_index, ceiling.row_index
                ),
            ),
            (None, None) => (
                "No dates left in range".to_string(),
                "Extend the date range".to_string(),
            ),
        }
    }

    fn finish(
        scheduled_rows: Vec<RowOutcome>,
        unscheduled_rows: Vec<RowOutcome>,
        mut issues: Vec<Issue>,
        blocking_errors: Vec<String>,
        suggestions: Vec<String>,
    ) -> SchedulingResult {
        issues.sort_by_key(|issue| issue.row_index);
        let blocked = unscheduled_rows
            .iter()
            .filter(|row| {
                issues
                    .iter()
                    .any(|issue| issue.is_blocking && issue.row_index == row.row_index)
            })
            .count();
        let summary = Summary {
            scheduled: scheduled_rows.len(),
            unscheduled: unscheduled_rows.len(),
            blocked,
            total: scheduled_rows.len() + unscheduled_rows.len(),
        };
        SchedulingResult {
            can_proceed: !scheduled_rows.is_empty(),
            scheduled_rows,
            unscheduled_rows,
            issues,
            blocking_errors,
            suggestions,
            summary,
        }
    }
}

/// Run [`DateAssignment`] over `rows`.
pub fn assign_dates(
    rows: &[ContentRow],
    range_dates: &[NaiveDate],
    occupancy: &OccupancySnapshot,
) -> EngineResult<SchedulingResult> {
    DateAssignment::new(rows, range_dates, occupancy).execute()
}
