#![forbid(unsafe_code)]

//! Core domain model and business logic for the Bloom health tracker.
//!
//! This crate provides:
//! - Domain types (day, fertility and menopause records, templates)
//! - Lenient schema codec between records and store payloads
//! - Static lookup tables (baby sizes, week info, checklists, triggers)
//! - Cycle, pregnancy and menopause engines
//! - Reminder scheduling over a pluggable alarm backend
//! - Record storage, MRS journal, CSV export

pub mod types;
pub mod error;
pub mod codec;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod store;
pub mod journal;
pub mod cycle;
pub mod pregnancy;
pub mod menopause;
pub mod scheduler;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use store::{HealthStore, JsonFileStore, MemoryStore, RecordStore};
pub use journal::MrsJournal;
pub use cycle::CycleSummary;
pub use pregnancy::PregnancySnapshot;
pub use scheduler::{AlarmBackend, LoggingAlarmBackend, ReminderScheduler};
pub use export::export_day_records;
