//! Sort activities chronologically and bucket them per calendar day.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use crate::activity::{parse_date, Activity, Locale};

/// All activities sharing one `date` string, with a display label for the day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateGroup {
    pub date: String,
    pub label: String,
    pub activities: Vec<Activity>,
}

/// Sort by calendar date, then by start time within a day.
///
/// Unparsable dates sort before all valid ones (ordered by their raw text);
/// unparsable times sort as midnight. The sort is stable, so ties keep their
/// input order.
pub fn sort_by_date_time(activities: &[Activity]) -> Vec<Activity> {
    let mut sorted = activities.to_vec();
    sorted.sort_by_cached_key(sort_key);
    sorted
}

fn sort_key(activity: &Activity) -> (Option<NaiveDate>, String, u32) {
    // The raw text keeps differently spelled copies of one day adjacent, so
    // grouping by string never splits a day into alternating buckets.
    let start = activity.time_range().map_or(0, |range| range.start);
    (activity.calendar_date(), activity.date.clone(), start)
}

/// Sort `activities` and group consecutive entries with the same `date` string.
pub fn group_by_date(activities: &[Activity], locale: Locale) -> Vec<DateGroup> {
    let mut groups: Vec<DateGroup> = Vec::new();

    for activity in sort_by_date_time(activities) {
        match groups.last_mut() {
            Some(group) if group.date == activity.date => group.activities.push(activity),
            _ => groups.push(DateGroup {
                date: activity.date.clone(),
                label: date_label(&activity.date, locale),
                activities: vec![activity],
            }),
        }
    }

    groups
}

/// Day heading for a `YYYY-MM-DD` string.
///
/// English: `"Thu, Mar 5, 2026"`. Chinese: `"2026年3月5日 星期四"`.
/// Unparsable input is returned unchanged.
pub fn date_label(date: &str, locale: Locale) -> String {
    let Some(day) = parse_date(date) else {
        return date.to_string();
    };

    match locale {
        Locale::En => day.format("%a, %b %-d, %Y").to_string(),
        Locale::Zh => format!(
            "{}年{}月{}日 {}",
            day.year(),
            day.month(),
            day.day(),
            chinese_weekday(day.weekday())
        ),
    }
}

fn chinese_weekday(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "星期一",
        Weekday::Tue => "星期二",
        Weekday::Wed => "星期三",
        Weekday::Thu => "星期四",
        Weekday::Fri => "星期五",
        Weekday::Sat => "星期六",
        Weekday::Sun => "星期日",
    }
}
