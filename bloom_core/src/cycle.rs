//! Cycle engine: menstrual cycle and period arithmetic.
//!
//! All computations are pure functions over a [`CycleConfig`] and a current
//! date, in whole calendar days. Invalid configuration never propagates as
//! an error: non-positive lengths are silently replaced by the documented
//! defaults, and a missing anchor date yields "unknown" (`None`).

use crate::types::CycleConfig;
use chrono::NaiveDate;

/// Estimated fertile days within a cycle, as 1-based cycle days
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FertileWindow {
    /// Estimated ovulation day (luteal-phase heuristic, not a guarantee)
    pub ovulation_day: i64,
    pub start_day: i64,
    pub end_day: i64,
}

/// Derived cycle values for one date, bundled for the presentation layer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CycleSummary {
    /// 0-based offset within the current cycle
    pub cycle_day_index: i64,
    pub in_menstruation: bool,
    pub in_fertile_window: bool,
    pub period_expected_in_days: i64,
    pub next_period_start: NaiveDate,
}

/// 0-based day index within the current cycle.
///
/// Normalized into `[0, cycle_length)` even for dates before the anchor or
/// many cycles later. `None` only when no period start has been recorded.
pub fn cycle_day_index(config: &CycleConfig, current: NaiveDate) -> Option<i64> {
    let config = config.normalized();
    let start = config.last_period_start?;
    let days = (current - start).num_days();
    Some(days.rem_euclid(config.cycle_length))
}

/// Smallest predicted period start strictly after `current`.
///
/// Predictions are anchors of the form `last_period_start + k * cycle_length`.
pub fn predicted_next_period_start(config: &CycleConfig, current: NaiveDate) -> Option<NaiveDate> {
    let config = config.normalized();
    let start = config.last_period_start?;
    let days = (current - start).num_days();
    let k = days.div_euclid(config.cycle_length) + 1;
    Some(start + chrono::Duration::days(k * config.cycle_length))
}

/// Estimated fertile window for the configured cycle.
///
/// Ovulation is estimated at `cycle_length - 14` (luteal-phase heuristic),
/// clamped into `[1, cycle_length]`; the window is ovulation +/- 2 days,
/// clamped into the same range.
pub fn fertile_window(config: &CycleConfig) -> FertileWindow {
    let config = config.normalized();
    let ovulation_day = (config.cycle_length - 14).clamp(1, config.cycle_length);
    FertileWindow {
        ovulation_day,
        start_day: (ovulation_day - 2).max(1),
        end_day: (ovulation_day + 2).min(config.cycle_length),
    }
}

/// Whether `current` falls inside the estimated fertile window
pub fn is_in_fertile_window(config: &CycleConfig, current: NaiveDate) -> bool {
    let Some(index) = cycle_day_index(config, current) else {
        return false;
    };
    let day = index + 1;
    let window = fertile_window(config);
    day >= window.start_day && day <= window.end_day
}

/// Whether `current` falls inside the expected menstruation days
pub fn is_in_menstruation(config: &CycleConfig, current: NaiveDate) -> bool {
    let normalized = config.normalized();
    match cycle_day_index(config, current) {
        Some(index) => index + 1 <= normalized.menstruation_length,
        None => false,
    }
}

/// Bundle every derived cycle value for one date.
///
/// `None` when no period start has been recorded yet.
pub fn summarize(config: &CycleConfig, current: NaiveDate) -> Option<CycleSummary> {
    let cycle_day_index = cycle_day_index(config, current)?;
    let next_period_start = predicted_next_period_start(config, current)?;
    Some(CycleSummary {
        cycle_day_index,
        in_menstruation: is_in_menstruation(config, current),
        in_fertile_window: is_in_fertile_window(config, current),
        period_expected_in_days: (next_period_start - current).num_days(),
        next_period_start,
    })
}
