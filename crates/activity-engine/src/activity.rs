//! The activity record and its small vocabulary types.
//!
//! Field names serialize in camelCase to match the portal's JSON. Dates stay
//! as `YYYY-MM-DD` strings because conflict detection compares them textually;
//! use [`Activity::calendar_date`] when calendar arithmetic is needed.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::error::{EngineError, Result};
use crate::time_range::{parse_time_range, TimeRange};

/// Date format used for `date`, `signupDeadline` and `repeatEndDate`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` string. Returns `None` for anything else.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).ok()
}

/// Like [`parse_date`], but reports the offending text as [`EngineError::InvalidDate`].
pub fn require_date(text: &str) -> Result<NaiveDate> {
    parse_date(text).ok_or_else(|| EngineError::InvalidDate(text.to_string()))
}

/// How often a base activity repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatFrequency {
    #[default]
    None,
    Weekly,
    Biweekly,
    Monthly,
}

impl RepeatFrequency {
    pub fn is_recurring(self) -> bool {
        self != RepeatFrequency::None
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RepeatFrequency::None => "none",
            RepeatFrequency::Weekly => "weekly",
            RepeatFrequency::Biweekly => "biweekly",
            RepeatFrequency::Monthly => "monthly",
        }
    }
}

impl fmt::Display for RepeatFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepeatFrequency {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(RepeatFrequency::None),
            "weekly" => Ok(RepeatFrequency::Weekly),
            "biweekly" => Ok(RepeatFrequency::Biweekly),
            "monthly" => Ok(RepeatFrequency::Monthly),
            _ => Err(EngineError::InvalidFrequency(s.to_string())),
        }
    }
}

/// The population a signup draws capacity from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Participant,
    Volunteer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Participant => f.write_str("participant"),
            Role::Volunteer => f.write_str("volunteer"),
        }
    }
}

impl FromStr for Role {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "participant" => Ok(Role::Participant),
            "volunteer" => Ok(Role::Volunteer),
            _ => Err(EngineError::InvalidRole(s.to_string())),
        }
    }
}

/// Display language for labels and titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Zh,
}

impl FromStr for Locale {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "zh" => Ok(Locale::Zh),
            _ => Err(EngineError::InvalidLocale(s.to_string())),
        }
    }
}

/// A scheduled activity, either a base record or a generated recurring instance.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub title_chinese: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub venue: String,
    #[serde(default)]
    pub venue_chinese: String,

    /// Calendar day, `YYYY-MM-DD`.
    pub date: String,
    /// Display range, e.g. `"10:00 AM - 12:00 PM"`.
    pub time: String,
    #[serde(default)]
    pub signup_deadline: String,

    #[serde(default)]
    pub participant_capacity: i64,
    #[serde(default)]
    pub registered_participants_count: i64,
    #[serde(default)]
    pub volunteer_capacity: i64,
    #[serde(default)]
    pub registered_volunteers_count: i64,

    #[serde(default)]
    pub wheelchair_accessible: bool,
    #[serde(default)]
    pub sign_language_support: bool,
    #[serde(default)]
    pub seated_activity: bool,
    #[serde(default)]
    pub low_light: bool,
    #[serde(default)]
    pub low_noise: bool,
    #[serde(default)]
    pub payment_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_amount: Option<f64>,

    /// Blank and unrecognized values load as `None`.
    #[serde(
        default,
        deserialize_with = "lenient_frequency",
        skip_serializing_if = "Option::is_none"
    )]
    pub repeat_frequency: Option<RepeatFrequency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_end_date: Option<String>,
    #[serde(default)]
    pub is_recurring_instance: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_activity_id: Option<String>,
}

impl Activity {
    /// The repeat frequency, treating an absent value as `none`.
    pub fn frequency(&self) -> RepeatFrequency {
        self.repeat_frequency.unwrap_or_default()
    }

    pub fn calendar_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }

    pub fn deadline_date(&self) -> Option<NaiveDate> {
        parse_date(&self.signup_deadline)
    }

    pub fn time_range(&self) -> Option<TimeRange> {
        parse_time_range(&self.time)
    }

    pub fn capacity(&self, role: Role) -> i64 {
        match role {
            Role::Participant => self.participant_capacity,
            Role::Volunteer => self.volunteer_capacity,
        }
    }

    pub fn registered_count(&self, role: Role) -> i64 {
        match role {
            Role::Participant => self.registered_participants_count,
            Role::Volunteer => self.registered_volunteers_count,
        }
    }

    /// Remaining places for `role`. Negative when overbooked.
    pub fn vacancy(&self, role: Role) -> i64 {
        self.capacity(role).saturating_sub(self.registered_count(role))
    }

    pub fn participant_vacancy(&self) -> i64 {
        self.vacancy(Role::Participant)
    }

    pub fn volunteer_vacancy(&self) -> i64 {
        self.vacancy(Role::Volunteer)
    }

    pub fn is_full(&self, role: Role) -> bool {
        self.vacancy(role) <= 0
    }

    pub fn record_signup(&mut self, role: Role) {
        let count = self.registered_count_mut(role);
        *count = count.saturating_add(1);
    }

    /// Undo one signup for `role`. The count never drops below zero.
    pub fn record_cancellation(&mut self, role: Role) {
        let count = self.registered_count_mut(role);
        *count = count.saturating_sub(1).max(0);
    }

    fn registered_count_mut(&mut self, role: Role) -> &mut i64 {
        match role {
            Role::Participant => &mut self.registered_participants_count,
            Role::Volunteer => &mut self.registered_volunteers_count,
        }
    }

    pub fn display_title(&self, locale: Locale) -> &str {
        localized(&self.title, &self.title_chinese, locale)
    }

    pub fn display_venue(&self, locale: Locale) -> &str {
        localized(&self.venue, &self.venue_chinese, locale)
    }
}

fn localized<'a>(english: &'a str, chinese: &'a str, locale: Locale) -> &'a str {
    match locale {
        Locale::Zh if !chinese.is_empty() => chinese,
        _ => english,
    }
}

/// Read `repeatFrequency` through [`RepeatFrequency::from_str`].
///
/// A bad value must not reject the whole catalog, so anything unparsable
/// becomes `None` (one-time) with a warning.
fn lenient_frequency<'de, D>(deserializer: D) -> std::result::Result<Option<RepeatFrequency>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(text) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if text.trim().is_empty() {
        return Ok(None);
    }
    match text.parse() {
        Ok(frequency) => Ok(Some(frequency)),
        Err(_) => {
            warn!(repeat_frequency = %text, "unknown repeat frequency; treating as one-time");
            Ok(None)
        }
    }
}

/// Parse a JSON array of activities.
///
/// Unknown fields (including stored `participantVacancy` / `volunteerVacancy`)
/// are ignored; vacancy is always recomputed from capacity and count.
pub fn load_activities(json: &str) -> Result<Vec<Activity>> {
    Ok(serde_json::from_str(json)?)
}
