//! Error types for activity-engine operations.

use thiserror::Error;

use crate::activity::Role;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid time range: {0}")]
    InvalidTimeRange(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid repeat frequency: {0}")]
    InvalidFrequency(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Invalid locale: {0}")]
    InvalidLocale(String),

    #[error("Invalid activity JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Already signed up for activity {0}")]
    AlreadySignedUp(String),

    #[error("Activity {activity_id} is fully booked for {role}s")]
    FullyBooked { activity_id: String, role: Role },

    #[error("Signup for activity {activity_id} closed on {deadline}")]
    SignupClosed {
        activity_id: String,
        deadline: String,
    },

    #[error("Activity {activity_id} conflicts with {conflicting_id} ({conflicting_title})")]
    ScheduleConflict {
        activity_id: String,
        conflicting_id: String,
        conflicting_title: String,
    },
}

pub type Result<T> = std::result::Result<T, EngineError>;
