//! Menopause engine: MRS result recording and symptom/trigger aggregation.
//!
//! Day records themselves are opaque here - they are stored and retrieved
//! through the codec and [`crate::store::HealthStore`], and the MRS
//! questionnaire arithmetic happens in the presentation layer. This module
//! persists the outcomes and summarizes what was logged.

use crate::journal::{self, MrsJournal};
use crate::types::{MenopauseDayRecord, MrsResult};
use crate::Result;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::path::Path;
use uuid::Uuid;

/// Record a completed MRS questionnaire result.
///
/// The result is immutable from here on: it gets a fresh id and is
/// appended to the journal, never updated in place.
pub fn record_mrs_result(
    journal: &mut MrsJournal,
    total_score: u32,
    category_scores: BTreeMap<String, u32>,
    test_date: NaiveDate,
) -> Result<MrsResult> {
    let result = MrsResult {
        id: Uuid::new_v4(),
        total_score,
        category_scores,
        test_date,
    };
    journal.append(&result)?;
    tracing::info!(
        "Recorded MRS result for {} with total score {}",
        test_date,
        total_score
    );
    Ok(result)
}

/// All recorded MRS results, newest test date first
pub fn mrs_history(journal_path: &Path) -> Result<Vec<MrsResult>> {
    let mut results = journal::read_results(journal_path)?;
    results.sort_by(|a, b| b.test_date.cmp(&a.test_date));
    Ok(results)
}

/// The most recent MRS result, if any
pub fn latest_mrs(journal_path: &Path) -> Result<Option<MrsResult>> {
    Ok(mrs_history(journal_path)?.into_iter().next())
}

/// Count how often each trigger was logged across records, most common
/// first. Both day-level triggers and per-symptom triggers count.
pub fn trigger_frequency(records: &[MenopauseDayRecord]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in records {
        for trigger in &record.day_triggers {
            *counts.entry(trigger.as_str()).or_insert(0) += 1;
        }
        for detail in record.symptoms.values() {
            for trigger in &detail.specific_triggers {
                *counts.entry(trigger.as_str()).or_insert(0) += 1;
            }
        }
    }
    sorted_by_count(counts)
}

/// Count how often each symptom type was logged, most common first
pub fn symptom_frequency(records: &[MenopauseDayRecord]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in records {
        for symptom in record.symptoms.keys() {
            *counts.entry(symptom.as_str()).or_insert(0) += 1;
        }
    }
    sorted_by_count(counts)
}

fn sorted_by_count(counts: BTreeMap<&str, usize>) -> Vec<(String, usize)> {
    let mut entries: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    // Descending by count; the BTreeMap already gives a stable name order
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SymptomDetail;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn record_with(
        day: &str,
        day_triggers: &[&str],
        symptoms: &[(&str, &[&str])],
    ) -> MenopauseDayRecord {
        let mut record = MenopauseDayRecord::empty(date(day));
        record.day_triggers = day_triggers.iter().map(|s| s.to_string()).collect();
        for (name, triggers) in symptoms {
            record.symptoms.insert(
                name.to_string(),
                SymptomDetail {
                    intensity: 3,
                    notes: String::new(),
                    specific_triggers: triggers.iter().map(|s| s.to_string()).collect(),
                    duration_minutes: None,
                },
            );
        }
        record
    }

    #[test]
    fn test_trigger_frequency_counts_both_levels() {
        let records = vec![
            record_with("2024-03-01", &["stress"], &[("hot_flashes", &["coffee"])]),
            record_with("2024-03-02", &["stress"], &[("hot_flashes", &["coffee", "wine"])]),
            record_with("2024-03-03", &[], &[("insomnia", &["coffee"])]),
        ];

        let freq = trigger_frequency(&records);
        assert_eq!(freq[0], ("coffee".to_string(), 3));
        assert_eq!(freq[1], ("stress".to_string(), 2));
        assert_eq!(freq[2], ("wine".to_string(), 1));
    }

    #[test]
    fn test_symptom_frequency_most_common_first() {
        let records = vec![
            record_with("2024-03-01", &[], &[("hot_flashes", &[]), ("insomnia", &[])]),
            record_with("2024-03-02", &[], &[("hot_flashes", &[])]),
        ];

        let freq = symptom_frequency(&records);
        assert_eq!(freq[0], ("hot_flashes".to_string(), 2));
        assert_eq!(freq[1], ("insomnia".to_string(), 1));
    }

    #[test]
    fn test_free_text_triggers_are_allowed() {
        // The suggestion table never constrains what may be stored
        let records = vec![record_with(
            "2024-03-01",
            &["a trigger nobody suggested"],
            &[],
        )];
        let freq = trigger_frequency(&records);
        assert_eq!(freq[0].0, "a trigger nobody suggested");
    }

    #[test]
    fn test_mrs_record_and_history() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("mrs.jsonl");
        let mut journal = MrsJournal::new(&path);

        let mut scores = BTreeMap::new();
        scores.insert("somatic".to_string(), 6u32);

        record_mrs_result(&mut journal, 11, scores.clone(), date("2024-01-15")).unwrap();
        record_mrs_result(&mut journal, 14, scores, date("2024-03-15")).unwrap();

        let history = mrs_history(&path).unwrap();
        assert_eq!(history.len(), 2);
        // Newest test date first
        assert_eq!(history[0].test_date, date("2024-03-15"));

        let latest = latest_mrs(&path).unwrap().unwrap();
        assert_eq!(latest.total_score, 14);
    }

    #[test]
    fn test_latest_mrs_empty_journal() {
        let temp_dir = tempfile::tempdir().unwrap();
        let latest = latest_mrs(&temp_dir.path().join("none.jsonl")).unwrap();
        assert!(latest.is_none());
    }
}
