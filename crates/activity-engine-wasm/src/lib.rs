//! WASM bindings for activity-engine.
//!
//! Exposes time-range parsing, schedule conflict detection, recurring activity
//! expansion and date grouping to the browser portal via `wasm-bindgen`. All
//! activities cross the boundary as JSON strings in the portal's camelCase
//! shape; absent results come back as the JSON literal `null`.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p activity-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir web/src/wasm/ \
//!   target/wasm32-unknown-unknown/release/activity_engine_wasm.wasm
//! ```

use activity_engine::{Activity, EngineError, Locale, ScheduleConflict};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleConflictDto<'a> {
    existing: &'a Activity,
    overlap_minutes: u32,
}

impl<'a> From<&ScheduleConflict<'a>> for ScheduleConflictDto<'a> {
    fn from(c: &ScheduleConflict<'a>) -> Self {
        Self {
            existing: c.existing,
            overlap_minutes: c.overlap_minutes,
        }
    }
}

// ---------------------------------------------------------------------------
// JSON plumbing (kept free of JsValue so it runs in native tests)
// ---------------------------------------------------------------------------

fn parse_activity(json: &str) -> Result<Activity, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid activity JSON: {}", e))
}

fn parse_activities(json: &str) -> Result<Vec<Activity>, String> {
    activity_engine::load_activities(json).map_err(|e| e.to_string())
}

fn parse_locale(locale: Option<&str>) -> Result<Locale, String> {
    match locale {
        Some(text) => text.parse().map_err(|e: EngineError| e.to_string()),
        None => Ok(Locale::default()),
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

fn parse_time_range_json(text: &str) -> Result<String, String> {
    to_json(&activity_engine::parse_time_range(text))
}

fn detect_conflict_json(candidate_json: &str, registered_json: &str) -> Result<String, String> {
    let candidate = parse_activity(candidate_json)?;
    let registered = parse_activities(registered_json)?;
    to_json(&activity_engine::detect_schedule_conflict(&candidate, &registered))
}

fn find_conflicts_json(candidate_json: &str, registered_json: &str) -> Result<String, String> {
    let candidate = parse_activity(candidate_json)?;
    let registered = parse_activities(registered_json)?;
    let conflicts = activity_engine::find_schedule_conflicts(&candidate, &registered);
    let dtos: Vec<ScheduleConflictDto<'_>> = conflicts.iter().map(ScheduleConflictDto::from).collect();
    to_json(&dtos)
}

fn expand_recurrence_json(base_json: &str) -> Result<String, String> {
    let base = parse_activity(base_json)?;
    to_json(&activity_engine::expand_recurrence(&base))
}

fn expand_all_json(bases_json: &str) -> Result<String, String> {
    let bases = parse_activities(bases_json)?;
    to_json(&activity_engine::expand_all(&bases))
}

fn group_by_date_json(activities_json: &str, locale: Option<&str>) -> Result<String, String> {
    let activities = parse_activities(activities_json)?;
    let locale = parse_locale(locale)?;
    to_json(&activity_engine::group_by_date(&activities, locale))
}

fn recurrence_label_text(activity_json: &str, locale: Option<&str>) -> Result<String, String> {
    let activity = parse_activity(activity_json)?;
    let locale = parse_locale(locale)?;
    Ok(activity_engine::recurrence_label(&activity, locale))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

fn js_err(message: String) -> JsValue {
    JsValue::from_str(&message)
}

/// Parse `"10:00 AM - 12:00 PM"` into `{start, end}` minutes since midnight.
///
/// Returns `"null"` when the text is not a valid range.
#[wasm_bindgen(js_name = "parseTimeRange")]
pub fn parse_time_range(text: &str) -> Result<String, JsValue> {
    parse_time_range_json(text).map_err(js_err)
}

/// Return the first registered activity that clashes with the candidate, or `"null"`.
///
/// `candidate_json` is a single activity object; `registered_json` is an array.
#[wasm_bindgen(js_name = "detectScheduleConflict")]
pub fn detect_schedule_conflict(candidate_json: &str, registered_json: &str) -> Result<String, JsValue> {
    detect_conflict_json(candidate_json, registered_json).map_err(js_err)
}

/// Return every clashing registration as `[{existing, overlapMinutes}]`, in input order.
#[wasm_bindgen(js_name = "findScheduleConflicts")]
pub fn find_schedule_conflicts(candidate_json: &str, registered_json: &str) -> Result<String, JsValue> {
    find_conflicts_json(candidate_json, registered_json).map_err(js_err)
}

/// Expand one base activity into itself plus its generated instances.
#[wasm_bindgen(js_name = "expandRecurrence")]
pub fn expand_recurrence(base_json: &str) -> Result<String, JsValue> {
    expand_recurrence_json(base_json).map_err(js_err)
}

/// Expand every base activity in a JSON array, preserving order.
#[wasm_bindgen(js_name = "expandAll")]
pub fn expand_all(bases_json: &str) -> Result<String, JsValue> {
    expand_all_json(bases_json).map_err(js_err)
}

/// Sort and group activities by date. `locale` is `"en"` (default) or `"zh"`.
///
/// Returns `[{date, label, activities}]`.
#[wasm_bindgen(js_name = "groupByDate")]
pub fn group_by_date(activities_json: &str, locale: Option<String>) -> Result<String, JsValue> {
    group_by_date_json(activities_json, locale.as_deref()).map_err(js_err)
}

/// Describe an activity's repeat schedule, e.g. `"Recurring weekly from … to …"`.
#[wasm_bindgen(js_name = "recurrenceLabel")]
pub fn recurrence_label(activity_json: &str, locale: Option<String>) -> Result<String, JsValue> {
    recurrence_label_text(activity_json, locale.as_deref()).map_err(js_err)
}
