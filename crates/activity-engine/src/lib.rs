//! # activity-engine
//!
//! Scheduling core for an activity registration portal.
//!
//! Participants and volunteers sign up for scheduled activities (classes,
//! outings, events). The portal stores activity times as display strings
//! (`"10:00 AM - 12:00 PM"`) and recurring activities as a single base record
//! with a repeat frequency. This crate turns those records into the answers
//! the portal needs: does a signup clash with something already booked, and
//! which concrete dates does a recurring activity occupy.
//!
//! Every operation here is a pure function of its arguments.
//!
//! ## Modules
//!
//! - [`activity`] — The `Activity` record, frequencies, roles, locales
//! - [`time_range`] — `"H:MM AM - H:MM PM"` strings → minute-of-day ranges
//! - [`conflict`] — Same-day overlap detection against existing signups
//! - [`recurrence`] — Weekly / biweekly / monthly instance generation
//! - [`grouping`] — Date-then-time sorting and per-day buckets
//! - [`filter`] — Browse-screen filters (accessibility, payment, vacancy)
//! - [`signup`] — Per-user signup state and admission checks
//! - [`error`] — Error types

pub mod activity;
pub mod conflict;
pub mod error;
pub mod filter;
pub mod grouping;
pub mod recurrence;
pub mod signup;
pub mod time_range;

pub use activity::{load_activities, Activity, Locale, RepeatFrequency, Role};
pub use conflict::{detect_schedule_conflict, find_schedule_conflicts, ScheduleConflict};
pub use error::EngineError;
pub use filter::ActivityFilter;
pub use grouping::{group_by_date, sort_by_date_time, DateGroup};
pub use recurrence::{expand_all, expand_recurrence, recurrence_label};
pub use signup::{SignupBook, SignupStatus};
pub use time_range::{overlaps, parse_time_range, TimeRange};
