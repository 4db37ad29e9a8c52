//! Detect schedule clashes between a candidate signup and existing registrations.
//!
//! Only activities on the same `date` string are compared. Time ranges use the
//! half-open overlap test from [`crate::time_range`], so back-to-back activities
//! are NOT conflicts. Unparsable time strings are skipped with a warning rather
//! than reported: conflict detection is advisory and fails open.

use std::borrow::Borrow;

use tracing::warn;

use crate::activity::Activity;
use crate::time_range::TimeRange;

/// An existing registration that overlaps a candidate activity.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleConflict<'a> {
    pub existing: &'a Activity,
    pub overlap_minutes: u32,
}

/// Return the first registered activity that clashes with `candidate`.
///
/// Registrations are scanned in the order given; the first overlap wins.
/// Returns `None` when the candidate's own time range cannot be parsed.
/// `registered` may hold activities or references to them.
pub fn detect_schedule_conflict<'a, A: Borrow<Activity>>(
    candidate: &Activity,
    registered: &'a [A],
) -> Option<&'a Activity> {
    let candidate_range = candidate_range(candidate)?;

    same_day_ranges(candidate, registered)
        .find(|(_, range)| candidate_range.overlaps(range))
        .map(|(existing, _)| existing)
}

/// Find every registered activity that clashes with `candidate`, in input order.
///
/// The first element, when present, is the activity [`detect_schedule_conflict`]
/// returns for the same arguments.
pub fn find_schedule_conflicts<'a, A: Borrow<Activity>>(
    candidate: &Activity,
    registered: &'a [A],
) -> Vec<ScheduleConflict<'a>> {
    let Some(candidate_range) = candidate_range(candidate) else {
        return Vec::new();
    };

    same_day_ranges(candidate, registered)
        .filter(|(_, range)| candidate_range.overlaps(range))
        .map(|(existing, range)| ScheduleConflict {
            existing,
            overlap_minutes: candidate_range.overlap_minutes(&range),
        })
        .collect()
}

fn candidate_range(candidate: &Activity) -> Option<TimeRange> {
    let range = candidate.time_range();
    if range.is_none() {
        warn!(
            activity_id = %candidate.id,
            time = %candidate.time,
            "could not parse time range for candidate activity; skipping conflict check"
        );
    }
    range
}

/// Registrations sharing the candidate's date string, paired with their parsed ranges.
fn same_day_ranges<'c, 'a, A: Borrow<Activity>>(
    candidate: &'c Activity,
    registered: &'a [A],
) -> impl Iterator<Item = (&'a Activity, TimeRange)> + 'c
where
    'a: 'c,
{
    registered
        .iter()
        .map(<A as Borrow<Activity>>::borrow)
        .filter(move |existing| existing.date == candidate.date)
        .filter_map(|existing| match existing.time_range() {
            Some(range) => Some((existing, range)),
            None => {
                warn!(
                    activity_id = %existing.id,
                    time = %existing.time,
                    "could not parse time range for registered activity; skipping"
                );
                None
            }
        })
}
