//! Pregnancy engine: gestational-week arithmetic over the static tables.
//!
//! Week math follows the obstetric convention: weeks are 1-indexed from the
//! pregnancy start date, and an unset or future start date yields "unknown"
//! rather than a zero or negative week.

use crate::catalog;
use crate::types::{BabySizeEntry, PregnancyConfig, PregnancyWeekInfo};
use chrono::NaiveDate;

/// Standard 40-week term, in days
const TERM_DAYS: i64 = 280;

/// Derived pregnancy values for one date
#[derive(Clone, Debug, PartialEq)]
pub struct PregnancySnapshot {
    pub week: u32,
    pub trimester: u8,
    pub baby_size: &'static BabySizeEntry,
    pub next_size: Option<&'static BabySizeEntry>,
    pub progress_to_next: f64,
    pub week_info: &'static PregnancyWeekInfo,
    pub due_date: NaiveDate,
}

/// Gestational week for a date: `floor(days / 7) + 1`.
///
/// `None` when the start date is unknown or lies after `current`; the
/// result is never zero or negative.
pub fn gestational_week(config: &PregnancyConfig, current: NaiveDate) -> Option<u32> {
    let start = config.start_date?;
    let days = (current - start).num_days();
    if days < 0 {
        return None;
    }
    Some((days / 7) as u32 + 1)
}

/// Ceiling lookup into the baby-size table: the first entry whose week
/// threshold is >= `week`, clamped to the last entry past the end.
pub fn baby_size_for_week(week: u32) -> &'static BabySizeEntry {
    let table = catalog::baby_size_table();
    table
        .iter()
        .find(|entry| entry.week >= week)
        .unwrap_or_else(|| &table[table.len() - 1])
}

/// The size entry after the current one, or `None` at the final entry
pub fn next_baby_size(week: u32) -> Option<&'static BabySizeEntry> {
    let table = catalog::baby_size_table();
    let index = current_entry_index(week);
    table.get(index + 1)
}

/// Fraction of the current size bracket elapsed, clamped to `[0, 1]`.
///
/// The bracket width is the gap to the previous table entry (or the
/// entry's own week when it is the first, treating the bracket as starting
/// at week 0). The final bracket is always complete (`1.0`).
pub fn progress_to_next(week: u32) -> f64 {
    let table = catalog::baby_size_table();
    let index = current_entry_index(week);
    if index + 1 >= table.len() {
        return 1.0;
    }

    let entry = &table[index];
    let bracket_width = if index == 0 {
        entry.week
    } else {
        entry.week - table[index - 1].week
    };
    if bracket_width == 0 {
        return 1.0;
    }

    let elapsed = week as f64 - entry.week as f64 + 1.0;
    (elapsed / bracket_width as f64).clamp(0.0, 1.0)
}

fn current_entry_index(week: u32) -> usize {
    let table = catalog::baby_size_table();
    table
        .iter()
        .position(|entry| entry.week >= week)
        .unwrap_or(table.len() - 1)
}

/// Trimester for a gestational week, clamped to 1-3
pub fn trimester(week: u32) -> u8 {
    match week {
        0..=13 => 1,
        14..=27 => 2,
        _ => 3,
    }
}

/// Week-range guidance for a gestational week (neutral placeholder when
/// the week falls outside every table range)
pub fn week_info(week: u32) -> &'static PregnancyWeekInfo {
    catalog::week_info_for(week)
}

/// Checklist for the trimester of a gestational week
pub fn checklist(week: u32) -> &'static [&'static str] {
    catalog::checklist_for_trimester(trimester(week))
}

/// Estimated due date: start date plus the standard 40-week term
pub fn estimated_due_date(start: NaiveDate) -> NaiveDate {
    start + chrono::Duration::days(TERM_DAYS)
}

/// Bundle every derived pregnancy value for one date.
///
/// `None` when no gestational week can be computed.
pub fn summarize(config: &PregnancyConfig, current: NaiveDate) -> Option<PregnancySnapshot> {
    let week = gestational_week(config, current)?;
    let start = config.start_date?;
    Some(PregnancySnapshot {
        week,
        trimester: trimester(week),
        baby_size: baby_size_for_week(week),
        next_size: next_baby_size(week),
        progress_to_next: progress_to_next(week),
        week_info: week_info(week),
        due_date: estimated_due_date(start),
    })
}
