use serde::{Deserialize, Serialize};

use crate::row::RowOutcome;

/// A problem found with one row.
///
/// Blocking issues reject the whole batch. Non-blocking issues mean the
/// row could not be placed while the rest of the batch went ahead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub row_index: usize,
    pub problem: String,
    pub suggested_fix: String,
    pub is_blocking: bool,
}

impl Issue {
    pub fn blocking(
        row_index: usize,
        problem: impl Into<String>,
        suggested_fix: impl Into<String>,
    ) -> Self {
        Self {
            row_index,
            problem: problem.into(),
            suggested_fix: suggested_fix.into(),
            is_blocking: true,
        }
    }

    pub fn non_blocking(
        row_index: usize,
        problem: impl Into<String>,
        suggested_fix: impl Into<String>,
    ) -> Self {
        Self {
            row_index,
            problem: problem.into(),
            suggested_fix: suggested_fix.into(),
            is_blocking: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub scheduled: usize,
    pub unscheduled: usize,
    /// Rows carrying a row-level blocking failure.
    pub blocked: usize,
    pub total: usize,
}

/// Everything one run of the assignment engine produced. The caller decides
/// whether to commit `scheduled_rows`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingResult {
    pub scheduled_rows: Vec<RowOutcome>,
    pub unscheduled_rows: Vec<RowOutcome>,
    pub issues: Vec<Issue>,
    pub blocking_errors: Vec<String>,
    pub suggestions: Vec<String>,
    pub summary: Summary,
    pub can_proceed: bool,
}

impl SchedulingResult {
    pub fn blocking_issues(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|issue| issue.is_blocking)
    }

    pub fn issues_for_row(&self, row_index: usize) -> impl Iterator<Item = &Issue> {
        self.issues
            .iter()
            .filter(move |issue| issue.row_index == row_index)
    }

    pub fn outcome_for_row(&self, row_index: usize) -> Option<&RowOutcome> {
        self.scheduled_rows
            .iter()
            .chain(self.unscheduled_rows.iter())
            .find(|row| row.row_index == row_index)
    }

    /// Scheduled rows ordered by publish date rather than row order.
    pub fn scheduled_by_date(&self) -> Vec<&RowOutcome> {
        let mut rows: Vec<&RowOutcome> = self.scheduled_rows.iter().collect();
        rows.sort_by_key(|row| (row.assigned_date, row.row_index));
        rows
    }

    /// One-line report in the same `key=value` style the CLI prints.
    pub fn to_cli_summary(&self) -> String {
        let mut parts = vec![
            format!("total={}", self.summary.total),
            format!("scheduled={}", self.summary.scheduled),
            format!("unscheduled={}", self.summary.unscheduled),
        ];
        if self.summary.blocked > 0 {
            parts.push(format!("blocked={}", self.summary.blocked));
        }
        if let (Some(first), Some(last)) = (
            self.scheduled_rows.iter().filter_map(|r| r.assigned_date).min(),
            self.scheduled_rows.iter().filter_map(|r| r.assigned_date).max(),
        ) {
            parts.push(format!("span={first}..{last}"));
        }
        parts.push(format!("can_proceed={}", self.can_proceed));
        parts.join(", ")
    }
}
