use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

use crate::persistence::{PersistenceError, PersistenceResult};
use crate::planner::MAX_WEEKS;
use crate::priority::{MAX_POSTS_PER_WEEK, MIN_POSTS_PER_WEEK};
use crate::time_windows::TimeWindowTable;

/// Environment variable naming a JSON config file for the binaries.
pub const CONFIG_ENV: &str = "POST_SCHEDULER_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub posts_per_week: u8,
    pub weeks: u32,
    pub time_windows: TimeWindowTable,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            posts_per_week: 4,
            weeks: 4,
            time_windows: TimeWindowTable::default(),
        }
    }
}

impl SchedulerConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> PersistenceResult<Self> {
        let file = File::open(path)?;
        let config: SchedulerConfig = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_json<P: AsRef<Path>>(&self, path: P) -> PersistenceResult<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Config from `POST_SCHEDULER_CONFIG` when set, defaults otherwise.
    pub fn from_env() -> PersistenceResult<Self> {
        match std::env::var(CONFIG_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_json_file(path.trim()),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> PersistenceResult<()> {
        if !(MIN_POSTS_PER_WEEK..=MAX_POSTS_PER_WEEK).contains(&self.posts_per_week) {
            return Err(PersistenceError::InvalidData(format!(
                "posts_per_week must be between {MIN_POSTS_PER_WEEK} and {MAX_POSTS_PER_WEEK} (got {})",
                self.posts_per_week
            )));
        }
        if self.weeks == 0 || self.weeks > MAX_WEEKS {
            return Err(PersistenceError::InvalidData(format!(
                "weeks must be between 1 and {MAX_WEEKS} (got {})",
                self.weeks
            )));
        }
        self.time_windows
            .validate()
            .map_err(|err| PersistenceError::InvalidData(err.to_string()))
    }
}
