pub mod assignment;
pub mod calendar;
pub mod config;
pub mod dates;
pub mod error;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod occupancy;
pub mod persistence;
pub mod planner;
pub mod priority;
pub mod report;
pub mod row;
pub mod time_picker;
pub mod time_windows;

pub use assignment::{DateAssignment, assign_dates};
pub use calendar::{date_range, weekday_from_index};
pub use config::SchedulerConfig;
pub use dates::{normalize_date, normalize_date_string};
pub use error::{EngineError, EngineResult};
pub use occupancy::{OccupancySnapshot, Platform};
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteSlotStore;
pub use persistence::{
    PersistenceError, PersistenceResult, SlotStore, load_rows_from_csv, read_rows_from_csv,
    save_plan_to_csv, save_result_to_json, save_scheduled_rows_to_csv,
};
pub use planner::{PlanRequest, PlannedSlot, SchedulePlanner, generate_plan};
pub use priority::{PostingDaySelector, WeekdayPriority, select_posting_days};
pub use report::{Issue, SchedulingResult, Summary};
pub use row::{ContentRow, RowOutcome};
pub use time_picker::{PublishTime, TimePicker, pick_time};
pub use time_windows::{TimeWindow, TimeWindowTable};
