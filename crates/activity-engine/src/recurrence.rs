//! Recurring activity expansion: one base record into its dated instances.
//!
//! Instances are never stored. They are a deterministic function of the base
//! record and are regenerated on every read, so expanding the same base twice
//! must yield identical ids, dates and order.

use chrono::{Datelike, Days, NaiveDate, NaiveTime, TimeDelta};
use tracing::{debug, warn};

use crate::activity::{parse_date, Activity, Locale, RepeatFrequency, DATE_FORMAT};

/// Expand a base activity into itself followed by every generated instance.
///
/// The base is always the first element. A frequency of `none` (or absent),
/// a missing end date, or an unparsable start/end date all yield `[base]`.
///
/// Instances are produced by repeatedly stepping a working date forward from
/// `base.date` (+7 days weekly, +14 days biweekly, +1 calendar month monthly)
/// while it is before the end date. Each stepped date at or before the end
/// date becomes one instance.
pub fn expand_recurrence(base: &Activity) -> Vec<Activity> {
    let frequency = base.frequency();
    if !frequency.is_recurring() {
        return vec![base.clone()];
    }

    let Some(end_text) = base
        .repeat_end_date
        .as_deref()
        .filter(|text| !text.trim().is_empty())
    else {
        return vec![base.clone()];
    };

    let (Some(start), Some(end)) = (base.calendar_date(), parse_date(end_text)) else {
        warn!(
            activity_id = %base.id,
            date = %base.date,
            repeat_end_date = %end_text,
            "unparsable recurrence dates; treating activity as one-time"
        );
        return vec![base.clone()];
    };

    let deadline_offset = base.deadline_date().map(|deadline| start - deadline);
    if deadline_offset.is_none() {
        warn!(
            activity_id = %base.id,
            signup_deadline = %base.signup_deadline,
            "unparsable signup deadline; instances keep the base deadline"
        );
    }

    let mut activities = vec![base.clone()];
    let mut current = start;

    while current < end {
        let Some(next) = advance(current, frequency) else {
            break;
        };
        current = next;

        if current <= end {
            activities.push(instance_of(base, current, deadline_offset));
        }
    }

    debug!(
        activity_id = %base.id,
        frequency = %frequency,
        instances = activities.len() - 1,
        "expanded recurring activity"
    );

    activities
}

/// Expand every base activity and concatenate the results in input order.
pub fn expand_all(bases: &[Activity]) -> Vec<Activity> {
    bases.iter().flat_map(expand_recurrence).collect()
}

/// Step a date forward by one period of `frequency`.
fn advance(date: NaiveDate, frequency: RepeatFrequency) -> Option<NaiveDate> {
    match frequency {
        RepeatFrequency::Weekly => date.checked_add_days(Days::new(7)),
        RepeatFrequency::Biweekly => date.checked_add_days(Days::new(14)),
        RepeatFrequency::Monthly => add_month_rolling(date),
        RepeatFrequency::None => None,
    }
}

/// One calendar month later with the same day number.
///
/// A day past the end of the target month spills into the following month
/// (Jan 31 -> Mar 3 in a common year) instead of clamping to the last day.
fn add_month_rolling(date: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if date.month() == 12 {
        (date.year().checked_add(1)?, 1)
    } else {
        (date.year(), date.month() + 1)
    };

    NaiveDate::from_ymd_opt(year, month, 1)?.checked_add_days(Days::new(u64::from(date.day() - 1)))
}

fn instance_of(base: &Activity, date: NaiveDate, deadline_offset: Option<TimeDelta>) -> Activity {
    let signup_deadline = deadline_offset
        .and_then(|offset| date.checked_sub_signed(offset))
        .map(|deadline| deadline.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| base.signup_deadline.clone());

    Activity {
        id: instance_id(&base.id, date),
        date: date.format(DATE_FORMAT).to_string(),
        signup_deadline,
        is_recurring_instance: true,
        parent_activity_id: Some(base.id.clone()),
        registered_participants_count: 0,
        registered_volunteers_count: 0,
        ..base.clone()
    }
}

/// `"<parent id>-<epoch millis of the instance date at UTC midnight>"`.
fn instance_id(parent_id: &str, date: NaiveDate) -> String {
    let millis = date.and_time(NaiveTime::MIN).and_utc().timestamp_millis();
    format!("{}-{}", parent_id, millis)
}

/// Human-readable description of an activity's repeat schedule.
///
/// ```
/// use activity_engine::{recurrence_label, Activity, Locale, RepeatFrequency};
///
/// let activity = Activity {
///     date: "2026-01-01".into(),
///     repeat_frequency: Some(RepeatFrequency::Weekly),
///     repeat_end_date: Some("2026-01-22".into()),
///     ..Activity::default()
/// };
/// assert_eq!(
///     recurrence_label(&activity, Locale::En),
///     "Recurring weekly from Jan 1, 2026 to Jan 22, 2026"
/// );
/// ```
pub fn recurrence_label(activity: &Activity, locale: Locale) -> String {
    let frequency = activity.frequency();
    let end = activity
        .repeat_end_date
        .as_deref()
        .filter(|text| !text.trim().is_empty());

    match locale {
        Locale::En => {
            let name = match frequency {
                RepeatFrequency::None => return "One-time event".to_string(),
                RepeatFrequency::Weekly => "weekly",
                RepeatFrequency::Biweekly => "bi-weekly",
                RepeatFrequency::Monthly => "monthly",
            };
            let end = end.map_or_else(|| "Ongoing".to_string(), english_date);
            format!(
                "Recurring {} from {} to {}",
                name,
                english_date(&activity.date),
                end
            )
        }
        Locale::Zh => {
            let name = match frequency {
                RepeatFrequency::None => return "單次活動".to_string(),
                RepeatFrequency::Weekly => "每週",
                RepeatFrequency::Biweekly => "每兩週",
                RepeatFrequency::Monthly => "每月",
            };
            let end = end.map_or_else(|| "持續".to_string(), chinese_date);
            format!(
                "{}重複：{} 至 {}",
                name,
                chinese_date(&activity.date),
                end
            )
        }
    }
}

fn english_date(text: &str) -> String {
    parse_date(text)
        .map(|date| date.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| text.to_string())
}

fn chinese_date(text: &str) -> String {
    parse_date(text)
        .map(|date| format!("{}年{}月{}日", date.year(), date.month(), date.day()))
        .unwrap_or_else(|| text.to_string())
}
