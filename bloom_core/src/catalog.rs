//! Static lookup tables and the reminder template catalog.
//!
//! Everything in this module is immutable, built once at first use, and
//! safe to read from anywhere without synchronization.

use crate::types::*;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

// ============================================================================
// Baby size table
// ============================================================================

/// Baby-size-by-week table, ordered by strictly increasing week threshold.
///
/// Lookups are ceiling lookups: the first row whose week is >= the queried
/// gestational week applies, and weeks past the end clamp to the last row.
static BABY_SIZES: Lazy<Vec<BabySizeEntry>> = Lazy::new(|| {
    vec![
        BabySizeEntry {
            week: 4,
            name: "Poppy seed",
            emoji: "\u{1F331}",
            description: "The embryo has just implanted and is smaller than a grain of rice.",
            size_cm: 0.1,
        },
        BabySizeEntry {
            week: 6,
            name: "Sweet pea",
            emoji: "\u{1F33F}",
            description: "The neural tube closes and a tiny heart begins to beat.",
            size_cm: 0.5,
        },
        BabySizeEntry {
            week: 8,
            name: "Raspberry",
            emoji: "\u{1FAD0}",
            description: "Arms and legs are budding; facial features start to form.",
            size_cm: 1.6,
        },
        BabySizeEntry {
            week: 10,
            name: "Strawberry",
            emoji: "\u{1F353}",
            description: "All vital organs are in place and starting to work together.",
            size_cm: 3.1,
        },
        BabySizeEntry {
            week: 12,
            name: "Lime",
            emoji: "\u{1F34B}",
            description: "Reflexes are developing; fingers open and close.",
            size_cm: 5.4,
        },
        BabySizeEntry {
            week: 14,
            name: "Lemon",
            emoji: "\u{1F34B}",
            description: "Facial muscles get a workout with the first expressions.",
            size_cm: 8.7,
        },
        BabySizeEntry {
            week: 16,
            name: "Avocado",
            emoji: "\u{1F951}",
            description: "The skeleton hardens from cartilage to bone.",
            size_cm: 11.6,
        },
        BabySizeEntry {
            week: 18,
            name: "Bell pepper",
            emoji: "\u{1FAD1}",
            description: "Ears are in position; hearing begins to develop.",
            size_cm: 14.2,
        },
        BabySizeEntry {
            week: 20,
            name: "Banana",
            emoji: "\u{1F34C}",
            description: "Halfway there. Measured crown to heel from now on.",
            size_cm: 25.6,
        },
        BabySizeEntry {
            week: 24,
            name: "Corn cob",
            emoji: "\u{1F33D}",
            description: "Lungs develop the branches needed for breathing.",
            size_cm: 30.0,
        },
        BabySizeEntry {
            week: 28,
            name: "Eggplant",
            emoji: "\u{1F346}",
            description: "Eyes open and close; sleep cycles are forming.",
            size_cm: 37.6,
        },
        BabySizeEntry {
            week: 32,
            name: "Squash",
            emoji: "\u{1F383}",
            description: "Rapid weight gain; skin smooths out.",
            size_cm: 42.4,
        },
        BabySizeEntry {
            week: 36,
            name: "Honeydew melon",
            emoji: "\u{1F348}",
            description: "Almost ready - most babies settle head-down now.",
            size_cm: 47.4,
        },
        BabySizeEntry {
            week: 40,
            name: "Watermelon",
            emoji: "\u{1F349}",
            description: "Full term. Ready to meet the world.",
            size_cm: 51.2,
        },
    ]
});

/// Get the baby-size table
pub fn baby_size_table() -> &'static [BabySizeEntry] {
    &BABY_SIZES
}

// ============================================================================
// Pregnancy week info
// ============================================================================

static WEEK_INFO: Lazy<Vec<PregnancyWeekInfo>> = Lazy::new(|| {
    vec![
        PregnancyWeekInfo {
            week_from: 1,
            week_to: 4,
            title: "Getting started",
            guidance: "Start a prenatal vitamin with folic acid and book a first appointment.",
        },
        PregnancyWeekInfo {
            week_from: 5,
            week_to: 8,
            title: "Embryonic development",
            guidance: "Morning sickness often peaks now. Small frequent meals can help.",
        },
        PregnancyWeekInfo {
            week_from: 9,
            week_to: 13,
            title: "End of the first trimester",
            guidance: "First-trimester screening usually happens in this window.",
        },
        PregnancyWeekInfo {
            week_from: 14,
            week_to: 17,
            title: "Second trimester begins",
            guidance: "Energy tends to return. A good time to plan gentle exercise.",
        },
        PregnancyWeekInfo {
            week_from: 18,
            week_to: 22,
            title: "Anatomy scan window",
            guidance: "The detailed ultrasound is typically scheduled around week 20.",
        },
        PregnancyWeekInfo {
            week_from: 23,
            week_to: 27,
            title: "Rapid growth",
            guidance: "Glucose screening is commonly done between weeks 24 and 28.",
        },
        PregnancyWeekInfo {
            week_from: 28,
            week_to: 32,
            title: "Third trimester begins",
            guidance: "Start counting daily movements and plan the birth preferences.",
        },
        PregnancyWeekInfo {
            week_from: 33,
            week_to: 36,
            title: "Final stretch",
            guidance: "Pack the hospital bag and install the car seat.",
        },
        PregnancyWeekInfo {
            week_from: 37,
            week_to: 42,
            title: "Full term",
            guidance: "Labour can start any time now. Keep the care team's number handy.",
        },
    ]
});

/// Neutral placeholder returned for weeks outside every table range
static NO_SPECIFIC_GUIDANCE: PregnancyWeekInfo = PregnancyWeekInfo {
    week_from: 0,
    week_to: 0,
    title: "General guidance",
    guidance: "No specific guidance for this week.",
};

/// Get the week-info table
pub fn week_info_table() -> &'static [PregnancyWeekInfo] {
    &WEEK_INFO
}

/// Look up week info for a gestational week; out-of-range weeks resolve to
/// a neutral placeholder rather than an error.
pub fn week_info_for(week: u32) -> &'static PregnancyWeekInfo {
    WEEK_INFO
        .iter()
        .find(|info| week >= info.week_from && week <= info.week_to)
        .unwrap_or(&NO_SPECIFIC_GUIDANCE)
}

// ============================================================================
// Pregnancy checklists
// ============================================================================

static CHECKLISTS: Lazy<[Vec<&'static str>; 3]> = Lazy::new(|| {
    [
        vec![
            "Start a prenatal vitamin",
            "Book the first midwife or doctor appointment",
            "Review medications with a clinician",
            "Cut out alcohol and reduce caffeine",
        ],
        vec![
            "Schedule the anatomy scan",
            "Start a birth-preparation course",
            "Plan parental leave with your employer",
            "Begin sleeping on your side",
        ],
        vec![
            "Pack the hospital bag",
            "Install and check the car seat",
            "Agree a birth plan with the care team",
            "Prepare meals for the first weeks at home",
        ],
    ]
});

const EMPTY_CHECKLIST: &[&str] = &[];

/// Checklist for a trimester (1-3). Unrecognized trimesters get the
/// neutral empty list, never an error.
pub fn checklist_for_trimester(trimester: u8) -> &'static [&'static str] {
    match trimester {
        1..=3 => &CHECKLISTS[(trimester - 1) as usize],
        _ => EMPTY_CHECKLIST,
    }
}

// ============================================================================
// Menopause trigger suggestions
// ============================================================================

/// Advisory trigger suggestions per menopause symptom type.
///
/// This is suggestion data for the entry surfaces, never a validation
/// constraint: any free-text trigger may be stored against any symptom.
static TRIGGER_SUGGESTIONS: Lazy<BTreeMap<&'static str, Vec<&'static str>>> = Lazy::new(|| {
    let mut map = BTreeMap::new();
    map.insert(
        "hot_flashes",
        vec!["caffeine", "alcohol", "spicy food", "warm rooms", "stress"],
    );
    map.insert(
        "night_sweats",
        vec!["alcohol", "heavy bedding", "late meals", "warm bedroom"],
    );
    map.insert(
        "insomnia",
        vec!["caffeine", "screen time", "late exercise", "stress"],
    );
    map.insert(
        "mood_swings",
        vec!["poor sleep", "stress", "blood sugar dips"],
    );
    map.insert(
        "headaches",
        vec!["dehydration", "skipped meals", "bright light", "stress"],
    );
    map.insert(
        "joint_pain",
        vec!["inactivity", "cold weather", "repetitive strain"],
    );
    map.insert(
        "fatigue",
        vec!["poor sleep", "overexertion", "low iron"],
    );
    map.insert(
        "anxiety",
        vec!["caffeine", "news and doomscrolling", "poor sleep"],
    );
    map
});

const NO_SUGGESTIONS: &[&str] = &[];

/// Advisory trigger suggestions for a symptom type (empty when unknown)
pub fn trigger_suggestions(symptom_type: &str) -> &'static [&'static str] {
    TRIGGER_SUGGESTIONS
        .get(symptom_type)
        .map(|v| v.as_slice())
        .unwrap_or(NO_SUGGESTIONS)
}

/// All symptom types that carry suggestions, in stable order
pub fn suggested_symptom_types() -> impl Iterator<Item = &'static str> {
    TRIGGER_SUGGESTIONS.keys().copied()
}

// ============================================================================
// Reminder template catalog
// ============================================================================

static REMINDER_TEMPLATES: Lazy<Vec<ReminderTemplate>> = Lazy::new(|| {
    vec![
        // Cycle tracking
        ReminderTemplate {
            id: "cycle_daily_log",
            kind: "daily_log",
            title: "Evening check-in",
            body: "Take a minute to log today's mood and symptoms.",
            scheduled_hour: 20,
            scheduled_minute: 30,
            target_mode: UserGoal::CycleTracking,
            enabled: true,
            recurrence: Recurrence::DAILY,
        },
        ReminderTemplate {
            id: "cycle_period_forecast",
            kind: "period_forecast",
            title: "Period forecast",
            body: "Your next period prediction has been updated.",
            scheduled_hour: 9,
            scheduled_minute: 0,
            target_mode: UserGoal::CycleTracking,
            enabled: true,
            recurrence: Recurrence::WEEKLY,
        },
        ReminderTemplate {
            id: "cycle_fertile_window",
            kind: "fertile_window",
            title: "Fertile window",
            body: "You are entering your estimated fertile window.",
            scheduled_hour: 8,
            scheduled_minute: 0,
            target_mode: UserGoal::CycleTracking,
            enabled: false,
            recurrence: Recurrence::DAILY,
        },
        // Pregnancy
        ReminderTemplate {
            id: "pregnancy_vitamin",
            kind: "supplement",
            title: "Prenatal vitamin",
            body: "Time for today's prenatal vitamin.",
            scheduled_hour: 9,
            scheduled_minute: 0,
            target_mode: UserGoal::Pregnancy,
            enabled: true,
            recurrence: Recurrence::DAILY,
        },
        ReminderTemplate {
            id: "pregnancy_weekly_progress",
            kind: "weekly_progress",
            title: "Weekly progress",
            body: "A new week of your pregnancy has started. See what's changed.",
            scheduled_hour: 10,
            scheduled_minute: 0,
            target_mode: UserGoal::Pregnancy,
            enabled: true,
            // Carried over from an older build that set both flags;
            // weekly wins under the documented precedence.
            recurrence: Recurrence {
                daily: true,
                weekly: true,
                monthly: false,
            },
        },
        ReminderTemplate {
            id: "pregnancy_checklist_review",
            kind: "checklist",
            title: "Checklist review",
            body: "Review your trimester checklist and tick off what's done.",
            scheduled_hour: 18,
            scheduled_minute: 0,
            target_mode: UserGoal::Pregnancy,
            enabled: true,
            recurrence: Recurrence::MONTHLY,
        },
        // Menopause
        ReminderTemplate {
            id: "menopause_daily_log",
            kind: "daily_log",
            title: "Symptom check-in",
            body: "Log today's symptoms and possible triggers.",
            scheduled_hour: 21,
            scheduled_minute: 0,
            target_mode: UserGoal::Menopause,
            enabled: true,
            recurrence: Recurrence::DAILY,
        },
        ReminderTemplate {
            id: "menopause_mrs_checkin",
            kind: "mrs_checkin",
            title: "Monthly rating scale",
            body: "It's been a while since your last MRS questionnaire.",
            scheduled_hour: 10,
            scheduled_minute: 0,
            target_mode: UserGoal::Menopause,
            enabled: true,
            recurrence: Recurrence::MONTHLY,
        },
        ReminderTemplate {
            id: "menopause_hydration",
            kind: "hydration",
            title: "Hydration break",
            body: "A glass of water can take the edge off hot flashes.",
            scheduled_hour: 14,
            scheduled_minute: 0,
            target_mode: UserGoal::Menopause,
            enabled: false,
            recurrence: Recurrence::DAILY,
        },
    ]
});

/// All reminder templates, every mode
pub fn reminder_templates() -> &'static [ReminderTemplate] {
    &REMINDER_TEMPLATES
}

/// Templates targeting one mode, catalog order
pub fn templates_for_mode(mode: UserGoal) -> impl Iterator<Item = &'static ReminderTemplate> {
    REMINDER_TEMPLATES
        .iter()
        .filter(move |t| t.target_mode == mode)
}

/// Find a template by its stable id
pub fn template_by_id(id: &str) -> Option<&'static ReminderTemplate> {
    REMINDER_TEMPLATES.iter().find(|t| t.id == id)
}

// ============================================================================
// Validation
// ============================================================================

/// Validate all static tables for consistency.
///
/// Returns a list of validation errors, or empty Vec if valid.
pub fn validate() -> Vec<String> {
    let mut errors = Vec::new();

    // Baby sizes: strictly increasing weeks, sensible rows
    let mut prev_week = 0u32;
    let mut prev_size = 0.0f64;
    for entry in baby_size_table() {
        if entry.week <= prev_week {
            errors.push(format!(
                "Baby size week {} is not strictly greater than {}",
                entry.week, prev_week
            ));
        }
        if entry.size_cm <= prev_size {
            errors.push(format!(
                "Baby size for week {} does not grow ({} cm)",
                entry.week, entry.size_cm
            ));
        }
        if entry.name.is_empty() {
            errors.push(format!("Baby size for week {} has empty name", entry.week));
        }
        prev_week = entry.week;
        prev_size = entry.size_cm;
    }
    if baby_size_table().is_empty() {
        errors.push("Baby size table is empty".to_string());
    }

    // Week info: well-formed, ordered, non-overlapping ranges
    let mut prev_to = 0u32;
    for info in week_info_table() {
        if info.week_from > info.week_to {
            errors.push(format!(
                "Week info range {}-{} is inverted",
                info.week_from, info.week_to
            ));
        }
        if info.week_from <= prev_to {
            errors.push(format!(
                "Week info range {}-{} overlaps the previous range",
                info.week_from, info.week_to
            ));
        }
        prev_to = info.week_to;
    }

    // Checklists: each trimester has content
    for trimester in 1..=3u8 {
        if checklist_for_trimester(trimester).is_empty() {
            errors.push(format!("Trimester {} checklist is empty", trimester));
        }
    }

    // Templates: unique ids per mode, fields in range
    for mode in UserGoal::all() {
        let mut seen = std::collections::HashSet::new();
        for template in templates_for_mode(mode) {
            if template.id.is_empty() {
                errors.push("Reminder template has empty id".to_string());
            }
            if !seen.insert(template.id) {
                errors.push(format!(
                    "Duplicate reminder template id '{}' in mode {:?}",
                    template.id, mode
                ));
            }
            if template.scheduled_hour > 23 {
                errors.push(format!(
                    "Template '{}' has hour {} out of range",
                    template.id, template.scheduled_hour
                ));
            }
            if template.scheduled_minute > 59 {
                errors.push(format!(
                    "Template '{}' has minute {} out of range",
                    template.id, template.scheduled_minute
                ));
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_validate() {
        let errors = validate();
        assert!(errors.is_empty(), "Catalog validation errors: {:?}", errors);
    }

    #[test]
    fn test_baby_size_weeks_strictly_increasing() {
        let table = baby_size_table();
        for pair in table.windows(2) {
            assert!(pair[0].week < pair[1].week);
        }
    }

    #[test]
    fn test_week_info_out_of_range_gets_placeholder() {
        let info = week_info_for(99);
        assert_eq!(info.title, "General guidance");

        let info = week_info_for(0);
        assert_eq!(info.title, "General guidance");
    }

    #[test]
    fn test_checklist_unknown_trimester_is_empty() {
        assert!(checklist_for_trimester(0).is_empty());
        assert!(checklist_for_trimester(4).is_empty());
        assert!(!checklist_for_trimester(2).is_empty());
    }

    #[test]
    fn test_trigger_suggestions_unknown_symptom_is_empty() {
        assert!(trigger_suggestions("totally_new_symptom").is_empty());
        assert!(!trigger_suggestions("hot_flashes").is_empty());
    }

    #[test]
    fn test_every_mode_has_enabled_templates() {
        for mode in UserGoal::all() {
            let enabled = templates_for_mode(mode).filter(|t| t.enabled).count();
            assert!(enabled >= 1, "Mode {:?} has no enabled templates", mode);
        }
    }

    #[test]
    fn test_template_lookup_by_id() {
        let template = template_by_id("pregnancy_vitamin").unwrap();
        assert_eq!(template.target_mode, UserGoal::Pregnancy);
        assert!(template_by_id("nope").is_none());
    }

    #[test]
    fn test_multi_flag_template_resolves_to_weekly() {
        let template = template_by_id("pregnancy_weekly_progress").unwrap();
        assert!(template.recurrence.daily && template.recurrence.weekly);
        assert_eq!(template.recurrence.cadence(), crate::types::Cadence::Weekly);
    }
}
