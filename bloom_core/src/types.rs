//! Core domain types for the Bloom health tracking system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Daily health records and their symptom entries
//! - Fertility and menopause records
//! - Cycle and pregnancy tracking parameters
//! - Static lookup-table rows (baby sizes, week info, checklists)
//! - Reminder templates and recurrence flags

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Mood sentinel meaning "intentionally unset" (distinct from a real 0).
pub const MOOD_UNSET: i32 = -1;

// ============================================================================
// Day Record Types
// ============================================================================

/// Category of a logged symptom
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SymptomCategory {
    Physical,
    Emotional,
    Activity,
    Habits,
}

/// A single symptom logged on a day
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SymptomEntry {
    pub name: String,
    pub category: SymptomCategory,
    /// Intensity on a 1-3 scale
    pub intensity: u8,
    pub notes: String,
}

/// One day of general health signals, keyed by calendar date.
///
/// Writes are full-record replace-by-key: the last writer wins, there is
/// no field-level merge.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DayRecord {
    pub date: NaiveDate,
    /// 0-4, or [`MOOD_UNSET`] when the user never picked a mood
    pub mood: i32,
    pub symptoms: Vec<SymptomEntry>,
    pub weight: Option<f64>,
    pub temperature: Option<f64>,
    pub sleep_hours: Option<f64>,
    pub water_intake: Option<f64>,
    /// 0-100
    pub energy: Option<i32>,
    /// 0-2
    pub libido: Option<i32>,
    pub sexual_activity: bool,
    pub vitamins: bool,
    pub notes: String,
}

impl DayRecord {
    /// An empty record for a date, every field at its documented default
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            mood: MOOD_UNSET,
            symptoms: Vec::new(),
            weight: None,
            temperature: None,
            sleep_hours: None,
            water_intake: None,
            energy: None,
            libido: None,
            sexual_activity: false,
            vitamins: false,
            notes: String::new(),
        }
    }
}

// ============================================================================
// Fertility Record Types
// ============================================================================

/// Result of an at-home ovulation test strip
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OvulationTestResult {
    Negative,
    Weak,
    Positive,
}

/// Observed cervical fluid consistency
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CervicalFluidType {
    Dry,
    Sticky,
    Creamy,
    EggWhite,
}

/// Fertility signals for one day
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FertilityRecord {
    pub date: NaiveDate,
    pub basal_temperature: Option<f64>,
    pub ovulation_test: Option<OvulationTestResult>,
    pub cervical_fluid: Option<CervicalFluidType>,
    pub notes: String,
}

impl FertilityRecord {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            basal_temperature: None,
            ovulation_test: None,
            cervical_fluid: None,
            notes: String::new(),
        }
    }
}

// ============================================================================
// Menopause Record Types
// ============================================================================

/// Detail attached to one menopause symptom on one day
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SymptomDetail {
    /// Intensity on a 1-5 scale
    pub intensity: u8,
    pub notes: String,
    pub specific_triggers: Vec<String>,
    pub duration_minutes: Option<u32>,
}

/// One day of menopause tracking, keyed by calendar date.
///
/// Symptom keys are free-form strings; the trigger-suggestion table is
/// advisory only and never constrains what may be stored here.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MenopauseDayRecord {
    pub date: NaiveDate,
    pub symptoms: BTreeMap<String, SymptomDetail>,
    /// 1-5
    pub mood: u8,
    /// 1-5
    pub energy: u8,
    pub day_triggers: Vec<String>,
}

impl MenopauseDayRecord {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            symptoms: BTreeMap::new(),
            mood: 3,
            energy: 3,
            day_triggers: Vec::new(),
        }
    }
}

/// A completed Menopause Rating Scale questionnaire result.
///
/// Scoring arithmetic happens in the presentation layer; the core only
/// persists the outcome. Results are immutable once recorded.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MrsResult {
    pub id: Uuid,
    pub total_score: u32,
    pub category_scores: BTreeMap<String, u32>,
    pub test_date: NaiveDate,
}

// ============================================================================
// Tracking Parameters
// ============================================================================

/// Default cycle length in days, used whenever the stored value is unusable
pub const DEFAULT_CYCLE_LENGTH: i64 = 28;
/// Default menstruation length in days
pub const DEFAULT_MENSTRUATION_LENGTH: i64 = 5;

/// User-entered menstrual cycle parameters
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CycleConfig {
    pub cycle_length: i64,
    pub menstruation_length: i64,
    pub last_period_start: Option<NaiveDate>,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            cycle_length: DEFAULT_CYCLE_LENGTH,
            menstruation_length: DEFAULT_MENSTRUATION_LENGTH,
            last_period_start: None,
        }
    }
}

impl CycleConfig {
    /// Copy of this config with non-positive lengths silently replaced by
    /// the documented defaults. Engines only ever see normalized values.
    pub fn normalized(&self) -> Self {
        let mut cfg = self.clone();
        if cfg.cycle_length <= 0 {
            cfg.cycle_length = DEFAULT_CYCLE_LENGTH;
        }
        if cfg.menstruation_length <= 0 {
            cfg.menstruation_length = DEFAULT_MENSTRUATION_LENGTH;
        }
        cfg
    }
}

/// User-entered pregnancy parameters.
///
/// An unset start date means "unknown": no gestational week is ever
/// computed from a default.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PregnancyConfig {
    pub start_date: Option<NaiveDate>,
}

/// The tracking mode the user is currently in
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UserGoal {
    CycleTracking,
    Pregnancy,
    Menopause,
}

impl UserGoal {
    /// All goals, in catalog order
    pub fn all() -> [UserGoal; 3] {
        [
            UserGoal::CycleTracking,
            UserGoal::Pregnancy,
            UserGoal::Menopause,
        ]
    }
}

// ============================================================================
// Lookup Table Rows
// ============================================================================

/// Row of the baby-size-by-week table.
///
/// Rows are ordered by strictly increasing `week` and looked up as a
/// ceiling: the first row whose week is >= the queried week wins.
#[derive(Clone, Debug, PartialEq)]
pub struct BabySizeEntry {
    pub week: u32,
    pub name: &'static str,
    pub emoji: &'static str,
    pub description: &'static str,
    pub size_cm: f64,
}

/// Row of the pregnancy week-info table, covering an inclusive week range
#[derive(Clone, Debug, PartialEq)]
pub struct PregnancyWeekInfo {
    pub week_from: u32,
    pub week_to: u32,
    pub title: &'static str,
    pub guidance: &'static str,
}

// ============================================================================
// Reminder Types
// ============================================================================

/// Recurrence flags for a reminder template.
///
/// Flags are not mutually exclusive by construction; [`Recurrence::cadence`]
/// resolves the precedence (monthly over weekly over daily).
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recurrence {
    pub daily: bool,
    pub weekly: bool,
    pub monthly: bool,
}

/// Resolved recurrence cadence after precedence is applied
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cadence {
    OneShot,
    Daily,
    Weekly,
    Monthly,
}

impl Recurrence {
    pub const DAILY: Recurrence = Recurrence {
        daily: true,
        weekly: false,
        monthly: false,
    };
    pub const WEEKLY: Recurrence = Recurrence {
        daily: false,
        weekly: true,
        monthly: false,
    };
    pub const MONTHLY: Recurrence = Recurrence {
        daily: false,
        weekly: false,
        monthly: true,
    };

    /// Resolve the flag set to a single cadence: monthly wins over weekly,
    /// weekly over daily. No flag set means the reminder fires once.
    pub fn cadence(&self) -> Cadence {
        if self.monthly {
            Cadence::Monthly
        } else if self.weekly {
            Cadence::Weekly
        } else if self.daily {
            Cadence::Daily
        } else {
            Cadence::OneShot
        }
    }
}

/// A static reminder archetype: fixed time-of-day, recurrence, and the
/// notification text to deliver.
///
/// Templates live in the per-mode catalog and never change at runtime;
/// the scheduler turns them into concrete next-fire registrations.
#[derive(Clone, Debug, PartialEq)]
pub struct ReminderTemplate {
    /// Stable id, unique within its target mode
    pub id: &'static str,
    /// Open string-keyed notification type (not enumerated by the core)
    pub kind: &'static str,
    pub title: &'static str,
    pub body: &'static str,
    /// 0-23
    pub scheduled_hour: u8,
    /// 0-59
    pub scheduled_minute: u8,
    pub target_mode: UserGoal,
    pub enabled: bool,
    pub recurrence: Recurrence,
}
