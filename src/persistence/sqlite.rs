use super::{PersistenceError, PersistenceResult, SlotStore};
use crate::occupancy::{OccupancySnapshot, Platform};
use crate::planner::PlannedSlot;
use crate::row::RowOutcome;
use chrono::NaiveDate;
use rusqlite::{Connection, params};
use std::sync::{Mutex, MutexGuard};
use tracing::info;

pub struct SqliteSlotStore {
    connection: Mutex<Connection>,
}

impl SqliteSlotStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    pub fn in_memory() -> PersistenceResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(connection: Connection) -> PersistenceResult<Self> {
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS publish_slots (
                platform TEXT NOT NULL,
                publish_date TEXT NOT NULL,
                publish_time TEXT,
                content TEXT NOT NULL DEFAULT '',
                image_ref TEXT,
                PRIMARY KEY (platform, publish_date)
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    fn lock(&self) -> PersistenceResult<MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|_| PersistenceError::LockPoisoned)
    }
}

fn collect_snapshot<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    args: P,
) -> PersistenceResult<OccupancySnapshot> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(args, |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut snapshot = OccupancySnapshot::new();
    for row in rows {
        let (platform, date) = row?;
        let platform: Platform = platform.parse().map_err(PersistenceError::InvalidData)?;
        let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|err| {
            PersistenceError::InvalidData(format!("stored date '{date}': {err}"))
        })?;
        snapshot.occupy(platform, date);
    }
    Ok(snapshot)
}

impl SlotStore for SqliteSlotStore {
    fn occupancy(&self, start: NaiveDate, end: NaiveDate) -> PersistenceResult<OccupancySnapshot> {
        let conn = self.lock()?;
        collect_snapshot(
            &conn,
            "SELECT platform, publish_date FROM publish_slots
             WHERE publish_date BETWEEN ?1 AND ?2",
            params![start.to_string(), end.to_string()],
        )
    }

    fn snapshot(&self) -> PersistenceResult<OccupancySnapshot> {
        let conn = self.lock()?;
        collect_snapshot(&conn, "SELECT platform, publish_date FROM publish_slots", params![])
    }

    fn occupy(&self, platform: Platform, date: NaiveDate) -> PersistenceResult<bool> {
        let conn = self.lock()?;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO publish_slots (platform, publish_date) VALUES (?1, ?2)",
            params![platform.as_str(), date.to_string()],
        )?;
        Ok(inserted > 0)
    }

    fn commit_rows(&self, rows: &[RowOutcome]) -> PersistenceResult<usize> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut committed = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO publish_slots (platform, publish_date, content, image_ref)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for row in rows {
                let Some(date) = row.assigned_date else {
                    continue;
                };
                for platform in Platform::ALL {
                    stmt.execute(params![
                        platform.as_str(),
                        date.to_string(),
                        row.text,
                        row.image_ref
                    ])?;
                }
                committed += 1;
            }
        }
        tx.commit()?;
        info!(rows = committed, "committed scheduled rows");
        Ok(committed)
    }

    fn commit_plan(&self, plan: &[PlannedSlot]) -> PersistenceResult<usize> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO publish_slots (platform, publish_date, publish_time)
                 VALUES (?1, ?2, ?3)",
            )?;
            for slot in plan {
                for platform in Platform::ALL {
                    stmt.execute(params![
                        platform.as_str(),
                        slot.date.to_string(),
                        slot.time_for(platform).to_string()
                    ])?;
                }
            }
        }
        tx.commit()?;
        info!(slots = plan.len(), "committed planned slots");
        Ok(plan.len())
    }
}
