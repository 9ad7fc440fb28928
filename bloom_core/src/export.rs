//! CSV export of day records, for taking data to an appointment.
//!
//! The export is a full snapshot: the target file is rewritten on every
//! run, synced to disk before returning.

use crate::store::{HealthStore, RecordStore};
use crate::types::{DayRecord, MOOD_UNSET};
use crate::Result;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    date: String,
    mood: Option<i32>,
    weight: Option<f64>,
    temperature: Option<f64>,
    sleep_hours: Option<f64>,
    water_intake: Option<f64>,
    energy: Option<i32>,
    libido: Option<i32>,
    sexual_activity: bool,
    vitamins: bool,
    symptoms: String,
    notes: String,
}

impl From<&DayRecord> for CsvRow {
    fn from(record: &DayRecord) -> Self {
        let symptoms = record
            .symptoms
            .iter()
            .map(|s| format!("{}:{}", s.name, s.intensity))
            .collect::<Vec<_>>()
            .join(";");

        CsvRow {
            date: crate::codec::format_date(record.date),
            mood: (record.mood != MOOD_UNSET).then_some(record.mood),
            weight: record.weight,
            temperature: record.temperature,
            sleep_hours: record.sleep_hours,
            water_intake: record.water_intake,
            energy: record.energy,
            libido: record.libido,
            sexual_activity: record.sexual_activity,
            vitamins: record.vitamins,
            symptoms,
            notes: record.notes.clone(),
        }
    }
}

/// Export every stored day record to a CSV file, oldest first.
///
/// Returns the number of records written. The file is replaced wholesale
/// and fsynced before the function returns.
pub fn export_day_records<S: RecordStore>(
    store: &HealthStore<S>,
    csv_path: &Path,
) -> Result<usize> {
    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let dates = store.day_dates()?;
    let mut writer = csv::Writer::from_path(csv_path)?;
    let mut count = 0;

    for date in dates {
        if let Some(record) = store.day_record(date)? {
            writer.serialize(CsvRow::from(&record))?;
            count += 1;
        }
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Exported {} day records to {:?}", count, csv_path);
    Ok(count)
}
