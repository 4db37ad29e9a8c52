//! Per-user signup state.
//!
//! A [`SignupBook`] holds the ids one user has signed up for under a single
//! [`Role`]. It owns no activities: callers pass the current (expanded)
//! catalog to every query, and the book answers with the pure functions from
//! [`crate::conflict`].

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::activity::{Activity, Role};
use crate::conflict::detect_schedule_conflict;
use crate::error::{EngineError, Result};

/// Whether a user can sign up for an activity right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignupStatus {
    Open,
    Full,
    Closed,
    SignedUp,
}

impl fmt::Display for SignupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SignupStatus::Open => "OPEN",
            SignupStatus::Full => "FULL",
            SignupStatus::Closed => "CLOSED",
            SignupStatus::SignedUp => "SIGNED UP",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupBook {
    role: Role,
    signed_up: Vec<String>,
}

impl SignupBook {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            signed_up: Vec::new(),
        }
    }

    /// A book pre-filled with `ids`. Duplicates are dropped, first occurrence kept.
    pub fn with_signups<I, S>(role: Role, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut book = Self::new(role);
        for id in ids {
            let id = id.into();
            if !book.is_signed_up(&id) {
                book.signed_up.push(id);
            }
        }
        book
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn signed_up_ids(&self) -> &[String] {
        &self.signed_up
    }

    pub fn is_signed_up(&self, activity_id: &str) -> bool {
        self.signed_up.iter().any(|id| id == activity_id)
    }

    /// Status checks run in order: already signed up, full, past deadline.
    ///
    /// The deadline day itself is still open.
    pub fn status(&self, activity: &Activity, today: NaiveDate) -> SignupStatus {
        if self.is_signed_up(&activity.id) {
            SignupStatus::SignedUp
        } else if activity.is_full(self.role) {
            SignupStatus::Full
        } else if deadline_passed(activity, today) {
            SignupStatus::Closed
        } else {
            SignupStatus::Open
        }
    }

    /// Activities from `catalog` this user is signed up for, in catalog order.
    pub fn registered<'a>(&self, catalog: &'a [Activity]) -> Vec<&'a Activity> {
        catalog
            .iter()
            .filter(|activity| self.is_signed_up(&activity.id))
            .collect()
    }

    /// Activities still open to this user that have not already taken place.
    pub fn open_activities<'a>(&self, catalog: &'a [Activity], today: NaiveDate) -> Vec<&'a Activity> {
        catalog
            .iter()
            .filter(|activity| self.status(activity, today) == SignupStatus::Open)
            .filter(|activity| activity.calendar_date().is_none_or(|date| date >= today))
            .collect()
    }

    /// Record a signup after checking capacity, deadline and schedule clashes.
    ///
    /// The caller is responsible for bumping the activity's registered count
    /// (see [`Activity::record_signup`]) once this returns `Ok`.
    pub fn sign_up(&mut self, activity: &Activity, catalog: &[Activity], today: NaiveDate) -> Result<()> {
        match self.status(activity, today) {
            SignupStatus::SignedUp => {
                return Err(EngineError::AlreadySignedUp(activity.id.clone()));
            }
            SignupStatus::Full => {
                return Err(EngineError::FullyBooked {
                    activity_id: activity.id.clone(),
                    role: self.role,
                });
            }
            SignupStatus::Closed => {
                return Err(EngineError::SignupClosed {
                    activity_id: activity.id.clone(),
                    deadline: activity.signup_deadline.clone(),
                });
            }
            SignupStatus::Open => {}
        }

        let registered = self.registered(catalog);
        if let Some(existing) = detect_schedule_conflict(activity, &registered) {
            return Err(EngineError::ScheduleConflict {
                activity_id: activity.id.clone(),
                conflicting_id: existing.id.clone(),
                conflicting_title: existing.title.clone(),
            });
        }

        debug!(activity_id = %activity.id, role = %self.role, "signed up");
        self.signed_up.push(activity.id.clone());
        Ok(())
    }

    /// Remove a signup. Returns `false` if the user was not signed up.
    pub fn cancel(&mut self, activity_id: &str) -> bool {
        let before = self.signed_up.len();
        self.signed_up.retain(|id| id != activity_id);
        self.signed_up.len() != before
    }
}

fn deadline_passed(activity: &Activity, today: NaiveDate) -> bool {
    activity
        .deadline_date()
        .is_some_and(|deadline| deadline < today)
}
