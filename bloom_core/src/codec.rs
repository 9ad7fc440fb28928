//! Lenient schema codec between typed records and untyped store payloads.
//!
//! Payloads coming back from the key-value store have survived several
//! schema versions: integers stored as floats, numbers stored as strings,
//! fields missing entirely. Decoding is therefore **total** - every
//! `decode_*` function returns a record, coercing what it can and falling
//! back to documented defaults for the rest. Encoding is sparse: unset
//! optionals, sentinel values, `false` flags and empty strings/lists are
//! omitted rather than written as nulls.

use crate::types::*;
use chrono::NaiveDate;
use serde_json::{Map, Value};

/// Untyped store payload, as read from / written to the key-value store
pub type Payload = Map<String, Value>;

// ============================================================================
// Coercion helpers
// ============================================================================

/// Coerce a value to f64: typed number first, then numeric string
pub fn as_f64_lenient(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Coerce a value to i64: exact integer, then float truncation, then string
pub fn as_i64_lenient(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    }
}

/// Coerce a value to bool: typed bool, nonzero number, or "true"/"1"
pub fn as_bool_lenient(value: Option<&Value>) -> Option<bool> {
    match value? {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => Some(n.as_f64().map(|f| f != 0.0).unwrap_or(false)),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Coerce a value to an owned string (strings only; numbers are not
/// promoted, a numeric payload in a text field is schema drift we drop)
pub fn as_str_lenient(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

/// Parse an ISO `yyyy-MM-dd` date value
pub fn as_date_lenient(value: Option<&Value>) -> Option<NaiveDate> {
    let s = as_str_lenient(value)?;
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

fn clamp_i64(v: Option<i64>, default: i64, min: i64, max: i64) -> i64 {
    v.unwrap_or(default).clamp(min, max)
}

// ============================================================================
// Lenient enum parsing
// ============================================================================

/// Parse a symptom category string, falling back to Physical
pub fn parse_symptom_category(s: &str) -> SymptomCategory {
    match s.trim().to_lowercase().as_str() {
        "physical" => SymptomCategory::Physical,
        "emotional" => SymptomCategory::Emotional,
        "activity" => SymptomCategory::Activity,
        "habits" => SymptomCategory::Habits,
        other => {
            tracing::debug!("Unknown symptom category '{}', defaulting to physical", other);
            SymptomCategory::Physical
        }
    }
}

/// Parse an ovulation test result; unknown strings decode as "not recorded"
pub fn parse_ovulation_test(s: &str) -> Option<OvulationTestResult> {
    match s.trim().to_lowercase().as_str() {
        "negative" => Some(OvulationTestResult::Negative),
        "weak" => Some(OvulationTestResult::Weak),
        "positive" => Some(OvulationTestResult::Positive),
        _ => None,
    }
}

/// Parse a cervical fluid type; unknown strings decode as "not recorded"
pub fn parse_cervical_fluid(s: &str) -> Option<CervicalFluidType> {
    match s.trim().to_lowercase().as_str() {
        "dry" => Some(CervicalFluidType::Dry),
        "sticky" => Some(CervicalFluidType::Sticky),
        "creamy" => Some(CervicalFluidType::Creamy),
        "egg_white" | "eggwhite" => Some(CervicalFluidType::EggWhite),
        _ => None,
    }
}

/// Parse a user goal string, falling back to cycle tracking
pub fn parse_user_goal(s: &str) -> UserGoal {
    match s.trim().to_lowercase().as_str() {
        "cycle_tracking" | "cycle" => UserGoal::CycleTracking,
        "pregnancy" => UserGoal::Pregnancy,
        "menopause" => UserGoal::Menopause,
        other => {
            tracing::debug!("Unknown user goal '{}', defaulting to cycle_tracking", other);
            UserGoal::CycleTracking
        }
    }
}

pub(crate) fn symptom_category_str(c: SymptomCategory) -> &'static str {
    match c {
        SymptomCategory::Physical => "physical",
        SymptomCategory::Emotional => "emotional",
        SymptomCategory::Activity => "activity",
        SymptomCategory::Habits => "habits",
    }
}

pub(crate) fn ovulation_test_str(r: OvulationTestResult) -> &'static str {
    match r {
        OvulationTestResult::Negative => "negative",
        OvulationTestResult::Weak => "weak",
        OvulationTestResult::Positive => "positive",
    }
}

pub(crate) fn cervical_fluid_str(f: CervicalFluidType) -> &'static str {
    match f {
        CervicalFluidType::Dry => "dry",
        CervicalFluidType::Sticky => "sticky",
        CervicalFluidType::Creamy => "creamy",
        CervicalFluidType::EggWhite => "egg_white",
    }
}

pub(crate) fn user_goal_str(g: UserGoal) -> &'static str {
    match g {
        UserGoal::CycleTracking => "cycle_tracking",
        UserGoal::Pregnancy => "pregnancy",
        UserGoal::Menopause => "menopause",
    }
}

// ============================================================================
// Day records
// ============================================================================

/// Decode a day record payload. Never fails; unusable fields become their
/// documented defaults.
pub fn decode_day_record(date: NaiveDate, payload: &Payload) -> DayRecord {
    let mut record = DayRecord::empty(date);

    record.mood = clamp_i64(
        as_i64_lenient(payload.get("mood")),
        MOOD_UNSET as i64,
        MOOD_UNSET as i64,
        4,
    ) as i32;
    record.weight = as_f64_lenient(payload.get("weight"));
    record.temperature = as_f64_lenient(payload.get("temperature"));
    record.sleep_hours = as_f64_lenient(payload.get("sleep_hours"));
    record.water_intake = as_f64_lenient(payload.get("water_intake"));
    record.energy = as_i64_lenient(payload.get("energy")).map(|v| v.clamp(0, 100) as i32);
    record.libido = as_i64_lenient(payload.get("libido")).map(|v| v.clamp(0, 2) as i32);
    record.sexual_activity = as_bool_lenient(payload.get("sexual_activity")).unwrap_or(false);
    record.vitamins = as_bool_lenient(payload.get("vitamins")).unwrap_or(false);
    record.notes = as_str_lenient(payload.get("notes")).unwrap_or_default();

    if let Some(Value::Array(items)) = payload.get("symptoms") {
        for item in items {
            if let Value::Object(obj) = item {
                record.symptoms.push(decode_symptom_entry(obj));
            }
        }
    }

    record
}

fn decode_symptom_entry(obj: &Payload) -> SymptomEntry {
    let category = as_str_lenient(obj.get("category"))
        .map(|s| parse_symptom_category(&s))
        .unwrap_or(SymptomCategory::Physical);

    SymptomEntry {
        name: as_str_lenient(obj.get("name")).unwrap_or_default(),
        category,
        intensity: clamp_i64(as_i64_lenient(obj.get("intensity")), 1, 1, 3) as u8,
        notes: as_str_lenient(obj.get("notes")).unwrap_or_default(),
    }
}

/// Encode a day record sparsely: defaults and unset fields are omitted
pub fn encode_day_record(record: &DayRecord) -> Payload {
    let mut payload = Payload::new();

    if record.mood != MOOD_UNSET {
        payload.insert("mood".into(), record.mood.into());
    }
    insert_f64(&mut payload, "weight", record.weight);
    insert_f64(&mut payload, "temperature", record.temperature);
    insert_f64(&mut payload, "sleep_hours", record.sleep_hours);
    insert_f64(&mut payload, "water_intake", record.water_intake);
    if let Some(energy) = record.energy {
        payload.insert("energy".into(), energy.into());
    }
    if let Some(libido) = record.libido {
        payload.insert("libido".into(), libido.into());
    }
    if record.sexual_activity {
        payload.insert("sexual_activity".into(), true.into());
    }
    if record.vitamins {
        payload.insert("vitamins".into(), true.into());
    }
    insert_str(&mut payload, "notes", &record.notes);

    if !record.symptoms.is_empty() {
        let items: Vec<Value> = record
            .symptoms
            .iter()
            .map(|s| Value::Object(encode_symptom_entry(s)))
            .collect();
        payload.insert("symptoms".into(), Value::Array(items));
    }

    payload
}

fn encode_symptom_entry(entry: &SymptomEntry) -> Payload {
    let mut obj = Payload::new();
    obj.insert("name".into(), entry.name.clone().into());
    obj.insert("category".into(), symptom_category_str(entry.category).into());
    obj.insert("intensity".into(), entry.intensity.into());
    insert_str(&mut obj, "notes", &entry.notes);
    obj
}

// ============================================================================
// Fertility records
// ============================================================================

pub fn decode_fertility_record(date: NaiveDate, payload: &Payload) -> FertilityRecord {
    let mut record = FertilityRecord::empty(date);

    record.basal_temperature = as_f64_lenient(payload.get("basal_temperature"));
    record.ovulation_test = as_str_lenient(payload.get("ovulation_test"))
        .and_then(|s| parse_ovulation_test(&s));
    record.cervical_fluid = as_str_lenient(payload.get("cervical_fluid"))
        .and_then(|s| parse_cervical_fluid(&s));
    record.notes = as_str_lenient(payload.get("notes")).unwrap_or_default();

    record
}

pub fn encode_fertility_record(record: &FertilityRecord) -> Payload {
    let mut payload = Payload::new();

    insert_f64(&mut payload, "basal_temperature", record.basal_temperature);
    if let Some(result) = record.ovulation_test {
        payload.insert("ovulation_test".into(), ovulation_test_str(result).into());
    }
    if let Some(fluid) = record.cervical_fluid {
        payload.insert("cervical_fluid".into(), cervical_fluid_str(fluid).into());
    }
    insert_str(&mut payload, "notes", &record.notes);

    payload
}

// ============================================================================
// Menopause records
// ============================================================================

pub fn decode_menopause_record(date: NaiveDate, payload: &Payload) -> MenopauseDayRecord {
    let mut record = MenopauseDayRecord::empty(date);

    record.mood = clamp_i64(as_i64_lenient(payload.get("mood")), 3, 1, 5) as u8;
    record.energy = clamp_i64(as_i64_lenient(payload.get("energy")), 3, 1, 5) as u8;
    record.day_triggers = decode_string_list(payload.get("day_triggers"));

    if let Some(Value::Object(symptoms)) = payload.get("symptoms") {
        for (name, value) in symptoms {
            if let Value::Object(obj) = value {
                record.symptoms.insert(name.clone(), decode_symptom_detail(obj));
            }
        }
    }

    record
}

fn decode_symptom_detail(obj: &Payload) -> SymptomDetail {
    SymptomDetail {
        intensity: clamp_i64(as_i64_lenient(obj.get("intensity")), 1, 1, 5) as u8,
        notes: as_str_lenient(obj.get("notes")).unwrap_or_default(),
        specific_triggers: decode_string_list(obj.get("specific_triggers")),
        duration_minutes: as_i64_lenient(obj.get("duration_minutes")).map(|v| v.max(0) as u32),
    }
}

pub fn encode_menopause_record(record: &MenopauseDayRecord) -> Payload {
    let mut payload = Payload::new();

    payload.insert("mood".into(), record.mood.into());
    payload.insert("energy".into(), record.energy.into());
    insert_string_list(&mut payload, "day_triggers", &record.day_triggers);

    if !record.symptoms.is_empty() {
        let mut symptoms = Payload::new();
        for (name, detail) in &record.symptoms {
            symptoms.insert(name.clone(), Value::Object(encode_symptom_detail(detail)));
        }
        payload.insert("symptoms".into(), Value::Object(symptoms));
    }

    payload
}

fn encode_symptom_detail(detail: &SymptomDetail) -> Payload {
    let mut obj = Payload::new();
    obj.insert("intensity".into(), detail.intensity.into());
    insert_str(&mut obj, "notes", &detail.notes);
    insert_string_list(&mut obj, "specific_triggers", &detail.specific_triggers);
    if let Some(minutes) = detail.duration_minutes {
        obj.insert("duration_minutes".into(), minutes.into());
    }
    obj
}

// ============================================================================
// Tracking parameters
// ============================================================================

pub fn decode_cycle_config(payload: &Payload) -> CycleConfig {
    CycleConfig {
        cycle_length: as_i64_lenient(payload.get("cycle_length")).unwrap_or(DEFAULT_CYCLE_LENGTH),
        menstruation_length: as_i64_lenient(payload.get("menstruation_length"))
            .unwrap_or(DEFAULT_MENSTRUATION_LENGTH),
        last_period_start: as_date_lenient(payload.get("last_period_start")),
    }
}

pub fn encode_cycle_config(config: &CycleConfig) -> Payload {
    let mut payload = Payload::new();
    payload.insert("cycle_length".into(), config.cycle_length.into());
    payload.insert("menstruation_length".into(), config.menstruation_length.into());
    if let Some(start) = config.last_period_start {
        payload.insert("last_period_start".into(), format_date(start).into());
    }
    payload
}

pub fn decode_pregnancy_config(payload: &Payload) -> PregnancyConfig {
    PregnancyConfig {
        start_date: as_date_lenient(payload.get("start_date")),
    }
}

pub fn encode_pregnancy_config(config: &PregnancyConfig) -> Payload {
    let mut payload = Payload::new();
    if let Some(start) = config.start_date {
        payload.insert("start_date".into(), format_date(start).into());
    }
    payload
}

/// Canonical store-key / payload form of a date
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

// ============================================================================
// Shared encode helpers
// ============================================================================

fn insert_f64(payload: &mut Payload, key: &str, value: Option<f64>) {
    if let Some(v) = value {
        if let Some(n) = serde_json::Number::from_f64(v) {
            payload.insert(key.into(), Value::Number(n));
        }
    }
}

fn insert_str(payload: &mut Payload, key: &str, value: &str) {
    if !value.is_empty() {
        payload.insert(key.into(), value.to_string().into());
    }
}

fn insert_string_list(payload: &mut Payload, key: &str, values: &[String]) {
    if !values.is_empty() {
        let items: Vec<Value> = values.iter().map(|s| s.clone().into()).collect();
        payload.insert(key.into(), Value::Array(items));
    }
}

fn decode_string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| as_str_lenient(Some(v)))
            .collect(),
        _ => Vec::new(),
    }
}
