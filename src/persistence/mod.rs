//! Adapters around the engine: the CSV row source, exports, and the slot
//! store that supplies occupancy and receives accepted results.

use chrono::NaiveDate;
use std::io;
use thiserror::Error;

use crate::occupancy::{OccupancySnapshot, Platform};
use crate::planner::PlannedSlot;
use crate::report::SchedulingResult;
use crate::row::RowOutcome;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("slot store lock poisoned")]
    LockPoisoned,
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Where already-committed publish slots live.
pub trait SlotStore {
    /// Dates taken per platform between `start` and `end`, inclusive.
    fn occupancy(&self, start: NaiveDate, end: NaiveDate) -> PersistenceResult<OccupancySnapshot>;

    /// Every date taken on any platform.
    fn snapshot(&self) -> PersistenceResult<OccupancySnapshot>;

    /// Mark one date as taken on one platform. `false` when it already was.
    fn occupy(&self, platform: Platform, date: NaiveDate) -> PersistenceResult<bool>;

    /// Claim both platforms for every assigned row. All or nothing.
    fn commit_rows(&self, rows: &[RowOutcome]) -> PersistenceResult<usize>;

    fn commit_plan(&self, plan: &[PlannedSlot]) -> PersistenceResult<usize>;

    fn commit_result(&self, result: &SchedulingResult) -> PersistenceResult<usize> {
        if !result.can_proceed {
            return Err(PersistenceError::InvalidData(
                "scheduling result has nothing to commit".to_string(),
            ));
        }
        self.commit_rows(&result.scheduled_rows)
    }
}

pub mod file;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{
    load_rows_from_csv, read_rows_from_csv, save_plan_to_csv, save_result_to_json,
    save_scheduled_rows_to_csv,
};
