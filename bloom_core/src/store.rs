//! Record storage: the key-value contract, a file-backed default, and the
//! typed facade the rest of the system goes through.
//!
//! The store works in untyped payloads; all typing happens in the codec.
//! Writes are atomic replace-by-key. There is no merge and no transaction
//! protocol - edits are serialized through one foreground flow.

use crate::codec::{self, Payload};
use crate::types::*;
use crate::{Error, Result};
use chrono::NaiveDate;
use fs2::FileExt;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Key-value contract consumed from the persistence collaborator.
///
/// `read` returns the stored payload or `None` when the key was never
/// written; `write` replaces the whole payload for a key.
pub trait RecordStore {
    fn read(&self, key: &str) -> Result<Option<Payload>>;
    fn write(&mut self, key: &str, payload: Payload) -> Result<()>;
    fn keys(&self) -> Result<Vec<String>>;
}

// ============================================================================
// In-memory store
// ============================================================================

/// In-memory store used by tests and as a scratch workspace
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: BTreeMap<String, Payload>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<Payload>> {
        Ok(self.records.get(key).cloned())
    }

    fn write(&mut self, key: &str, payload: Payload) -> Result<()> {
        self.records.insert(key.to_string(), payload);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.records.keys().cloned().collect())
    }
}

// ============================================================================
// File-backed store
// ============================================================================

/// Single-document JSON store with file locking.
///
/// The whole document is loaded for each operation and replaced atomically
/// on write (temp file, sync, rename). A missing or corrupt document is
/// treated as empty with a warning - stored data is never a fatal error.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load_document(&self) -> Result<BTreeMap<String, Payload>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(
                    "Unable to open store file {:?}: {}. Treating as empty.",
                    self.path,
                    e
                );
                return Ok(BTreeMap::new());
            }
        };

        if let Err(e) = file.lock_shared() {
            tracing::warn!(
                "Unable to lock store file {:?}: {}. Treating as empty.",
                self.path,
                e
            );
            return Ok(BTreeMap::new());
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        let read_result = reader.read_to_string(&mut contents);
        file.unlock()?;
        if let Err(e) = read_result {
            tracing::warn!(
                "Failed to read store file {:?}: {}. Treating as empty.",
                self.path,
                e
            );
            return Ok(BTreeMap::new());
        }

        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(document)) => {
                let mut records = BTreeMap::new();
                for (key, value) in document {
                    if let Value::Object(payload) = value {
                        records.insert(key, payload);
                    }
                }
                Ok(records)
            }
            Ok(_) | Err(_) => {
                tracing::warn!(
                    "Store file {:?} is not a JSON object. Treating as empty.",
                    self.path
                );
                Ok(BTreeMap::new())
            }
        }
    }

    fn save_document(&self, records: &BTreeMap<String, Payload>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let parent = self
            .path
            .parent()
            .ok_or_else(|| Error::Store("store path missing parent".into()))?;
        let temp = NamedTempFile::new_in(parent)?;

        temp.as_file().lock_exclusive()?;
        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let document: serde_json::Map<String, Value> = records
                .iter()
                .map(|(k, v)| (k.clone(), Value::Object(v.clone())))
                .collect();
            let contents = serde_json::to_string(&Value::Object(document))?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved store document to {:?}", self.path);
        Ok(())
    }
}

impl RecordStore for JsonFileStore {
    fn read(&self, key: &str) -> Result<Option<Payload>> {
        Ok(self.load_document()?.remove(key))
    }

    fn write(&mut self, key: &str, payload: Payload) -> Result<()> {
        let mut records = self.load_document()?;
        records.insert(key.to_string(), payload);
        self.save_document(&records)
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.load_document()?.keys().cloned().collect())
    }
}

// ============================================================================
// Typed facade
// ============================================================================

const DAY_PREFIX: &str = "day:";
const FERTILITY_PREFIX: &str = "fertility:";
const MENOPAUSE_PREFIX: &str = "menopause:";
const CYCLE_CONFIG_KEY: &str = "settings:cycle";
const PREGNANCY_CONFIG_KEY: &str = "settings:pregnancy";
const GOAL_KEY: &str = "settings:goal";

/// Typed access to health records: marries a [`RecordStore`] with the
/// lenient codec. The only errors it surfaces are store failures.
pub struct HealthStore<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> HealthStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    // ---- day records ----

    pub fn day_record(&self, date: NaiveDate) -> Result<Option<DayRecord>> {
        let key = format!("{}{}", DAY_PREFIX, codec::format_date(date));
        Ok(self
            .store
            .read(&key)?
            .map(|payload| codec::decode_day_record(date, &payload)))
    }

    pub fn save_day_record(&mut self, record: &DayRecord) -> Result<()> {
        let key = format!("{}{}", DAY_PREFIX, codec::format_date(record.date));
        self.store.write(&key, codec::encode_day_record(record))
    }

    /// All dates with a day record, ascending
    pub fn day_dates(&self) -> Result<Vec<NaiveDate>> {
        self.dates_with_prefix(DAY_PREFIX)
    }

    // ---- fertility records ----

    pub fn fertility_record(&self, date: NaiveDate) -> Result<Option<FertilityRecord>> {
        let key = format!("{}{}", FERTILITY_PREFIX, codec::format_date(date));
        Ok(self
            .store
            .read(&key)?
            .map(|payload| codec::decode_fertility_record(date, &payload)))
    }

    pub fn save_fertility_record(&mut self, record: &FertilityRecord) -> Result<()> {
        let key = format!("{}{}", FERTILITY_PREFIX, codec::format_date(record.date));
        self.store
            .write(&key, codec::encode_fertility_record(record))
    }

    // ---- menopause records ----

    pub fn menopause_record(&self, date: NaiveDate) -> Result<Option<MenopauseDayRecord>> {
        let key = format!("{}{}", MENOPAUSE_PREFIX, codec::format_date(date));
        Ok(self
            .store
            .read(&key)?
            .map(|payload| codec::decode_menopause_record(date, &payload)))
    }

    pub fn save_menopause_record(&mut self, record: &MenopauseDayRecord) -> Result<()> {
        let key = format!("{}{}", MENOPAUSE_PREFIX, codec::format_date(record.date));
        self.store
            .write(&key, codec::encode_menopause_record(record))
    }

    /// All stored menopause records, ascending by date
    pub fn menopause_records(&self) -> Result<Vec<MenopauseDayRecord>> {
        let mut records = Vec::new();
        for date in self.dates_with_prefix(MENOPAUSE_PREFIX)? {
            if let Some(record) = self.menopause_record(date)? {
                records.push(record);
            }
        }
        Ok(records)
    }

    // ---- tracking parameters ----

    pub fn cycle_config(&self) -> Result<CycleConfig> {
        Ok(self
            .store
            .read(CYCLE_CONFIG_KEY)?
            .map(|payload| codec::decode_cycle_config(&payload))
            .unwrap_or_default())
    }

    pub fn save_cycle_config(&mut self, config: &CycleConfig) -> Result<()> {
        self.store
            .write(CYCLE_CONFIG_KEY, codec::encode_cycle_config(config))
    }

    pub fn pregnancy_config(&self) -> Result<PregnancyConfig> {
        Ok(self
            .store
            .read(PREGNANCY_CONFIG_KEY)?
            .map(|payload| codec::decode_pregnancy_config(&payload))
            .unwrap_or_default())
    }

    pub fn save_pregnancy_config(&mut self, config: &PregnancyConfig) -> Result<()> {
        self.store
            .write(PREGNANCY_CONFIG_KEY, codec::encode_pregnancy_config(config))
    }

    /// Active tracking mode; defaults to cycle tracking when never set
    pub fn active_goal(&self) -> Result<UserGoal> {
        Ok(self
            .store
            .read(GOAL_KEY)?
            .and_then(|payload| codec::as_str_lenient(payload.get("goal")))
            .map(|s| codec::parse_user_goal(&s))
            .unwrap_or(UserGoal::CycleTracking))
    }

    pub fn save_active_goal(&mut self, goal: UserGoal) -> Result<()> {
        let mut payload = Payload::new();
        payload.insert("goal".into(), codec::user_goal_str(goal).into());
        self.store.write(GOAL_KEY, payload)
    }

    fn dates_with_prefix(&self, prefix: &str) -> Result<Vec<NaiveDate>> {
        let mut dates: Vec<NaiveDate> = self
            .store
            .keys()?
            .into_iter()
            .filter_map(|key| {
                key.strip_prefix(prefix)
                    .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
            })
            .collect();
        dates.sort();
        Ok(dates)
    }
}

/// Default store document path inside a data directory
pub fn store_path(data_dir: &Path) -> PathBuf {
    data_dir.join("records.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_day_record_replace_by_key() {
        let mut store = HealthStore::new(MemoryStore::new());
        let day = date("2024-03-10");

        let mut first = DayRecord::empty(day);
        first.mood = 2;
        first.notes = "first".into();
        store.save_day_record(&first).unwrap();

        // Second write fully replaces the first, no merge
        let mut second = DayRecord::empty(day);
        second.weight = Some(60.0);
        store.save_day_record(&second).unwrap();

        let loaded = store.day_record(day).unwrap().unwrap();
        assert_eq!(loaded.mood, MOOD_UNSET);
        assert_eq!(loaded.weight, Some(60.0));
        assert!(loaded.notes.is_empty());
    }

    #[test]
    fn test_absent_record_reads_as_none() {
        let store = HealthStore::new(MemoryStore::new());
        assert!(store.day_record(date("2024-03-10")).unwrap().is_none());
        assert!(store.fertility_record(date("2024-03-10")).unwrap().is_none());
    }

    #[test]
    fn test_configs_default_when_never_written() {
        let store = HealthStore::new(MemoryStore::new());
        assert_eq!(store.cycle_config().unwrap(), CycleConfig::default());
        assert_eq!(store.pregnancy_config().unwrap(), PregnancyConfig::default());
        assert_eq!(store.active_goal().unwrap(), UserGoal::CycleTracking);
    }

    #[test]
    fn test_goal_roundtrip() {
        let mut store = HealthStore::new(MemoryStore::new());
        store.save_active_goal(UserGoal::Menopause).unwrap();
        assert_eq!(store.active_goal().unwrap(), UserGoal::Menopause);
    }

    #[test]
    fn test_day_dates_sorted() {
        let mut store = HealthStore::new(MemoryStore::new());
        for day in ["2024-03-12", "2024-03-10", "2024-03-11"] {
            store.save_day_record(&DayRecord::empty(date(day))).unwrap();
        }
        assert_eq!(
            store.day_dates().unwrap(),
            vec![date("2024-03-10"), date("2024-03-11"), date("2024-03-12")]
        );
    }

    #[test]
    fn test_file_store_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = store_path(temp_dir.path());

        let mut store = HealthStore::new(JsonFileStore::new(&path));
        let mut record = DayRecord::empty(date("2024-03-10"));
        record.mood = 4;
        record.sleep_hours = Some(8.0);
        store.save_day_record(&record).unwrap();

        // Fresh handle sees the persisted record
        let reopened = HealthStore::new(JsonFileStore::new(&path));
        let loaded = reopened.day_record(date("2024-03-10")).unwrap().unwrap();
        assert_eq!(loaded, record);
    }

    #[test]
    fn test_file_store_corrupt_document_treated_as_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("records.json");
        std::fs::write(&path, "{ not json }").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(store.read("day:2024-03-10").unwrap().is_none());
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn test_file_store_atomic_save_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("records.json");

        let mut store = JsonFileStore::new(&path);
        store.write("day:2024-03-10", Payload::new()).unwrap();

        assert!(path.exists());
        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "records.json")
            .collect();
        assert!(extras.is_empty(), "Unexpected extras: {:?}", extras);
    }
}
