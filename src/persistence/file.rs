use super::{PersistenceError, PersistenceResult};
use crate::planner::PlannedSlot;
use crate::report::SchedulingResult;
use crate::row::ContentRow;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Default, Deserialize)]
struct RowCsvRecord {
    #[serde(default)]
    date: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    image: String,
}

#[derive(Serialize)]
struct ScheduledRowCsvRecord<'a> {
    row: usize,
    date: String,
    text: &'a str,
    image: &'a str,
}

#[derive(Serialize)]
struct PlannedSlotCsvRecord {
    date: String,
    weekday: String,
    facebook_time: String,
    instagram_time: String,
}

/// Read content rows from delimited text with a header line.
///
/// Columns are `date`, `text` and `image`, matched case-insensitively; only
/// `text` is required. Blank records are skipped but still count toward
/// `row_index`.
pub fn read_rows_from_csv<R: Read>(reader: R) -> PersistenceResult<Vec<ContentRow>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|header| header.trim().to_ascii_lowercase())
        .collect();
    if !headers.iter().any(|header| header == "text") {
        return Err(PersistenceError::InvalidData(
            "CSV is missing a 'text' column".to_string(),
        ));
    }
    csv_reader.set_headers(csv::StringRecord::from(headers));

    let mut rows = Vec::new();
    for (idx, record) in csv_reader.deserialize::<RowCsvRecord>().enumerate() {
        let record = record?;
        let row_index = idx + 1;
        if record.date.is_empty() && record.text.is_empty() && record.image.is_empty() {
            continue;
        }
        if record.text.is_empty() {
            return Err(PersistenceError::InvalidData(format!(
                "row {row_index} has no text"
            )));
        }

        let mut row = ContentRow::new(row_index, record.text).with_date(record.date);
        if !record.image.is_empty() {
            row = row.with_image(record.image);
        }
        rows.push(row);
    }
    Ok(rows)
}

pub fn load_rows_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<ContentRow>> {
    let file = File::open(path)?;
    read_rows_from_csv(file)
}

pub fn save_result_to_json<P: AsRef<Path>>(
    result: &SchedulingResult,
    path: P,
) -> PersistenceResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, result)?;
    Ok(())
}

/// Write scheduled rows in publish-date order.
pub fn save_scheduled_rows_to_csv<P: AsRef<Path>>(
    result: &SchedulingResult,
    path: P,
) -> PersistenceResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in result.scheduled_by_date() {
        writer.serialize(ScheduledRowCsvRecord {
            row: row.row_index,
            date: row
                .assigned_date
                .map(|date| date.to_string())
                .unwrap_or_default(),
            text: &row.text,
            image: row.image_ref.as_deref().unwrap_or_default(),
        })?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_plan_to_csv<P: AsRef<Path>>(plan: &[PlannedSlot], path: P) -> PersistenceResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for slot in plan {
        writer.serialize(PlannedSlotCsvRecord {
            date: slot.date.to_string(),
            weekday: slot.weekday.to_string(),
            facebook_time: slot.facebook_time.to_string(),
            instagram_time: slot.instagram_time.to_string(),
        })?;
    }
    writer.flush()?;
    Ok(())
}
