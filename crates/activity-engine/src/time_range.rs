//! Parse display time ranges such as `"10:00 AM - 12:00 PM"` into minute-of-day pairs.
//!
//! The accepted grammar is `<H>:<MM> <AM|PM> - <H>:<MM> <AM|PM>`: hour 1-12
//! (leading zero optional), minutes always two digits, exactly one `" - "`
//! separator. Anything else yields `None`.
//!
//! `end > start` is not checked. An overnight range like `"11:00 PM - 1:00 AM"`
//! parses to `start = 1380, end = 60` and will not overlap the late-evening
//! ranges it visually covers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

const MINUTES_PER_HOUR: u32 = 60;

/// A half-open `[start, end)` range in minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: u32,
    pub end: u32,
}

impl TimeRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn overlaps(&self, other: &TimeRange) -> bool {
        overlaps(self, other)
    }

    /// Minutes shared with `other`, or 0 when the ranges do not overlap.
    pub fn overlap_minutes(&self, other: &TimeRange) -> u32 {
        if !self.overlaps(other) {
            return 0;
        }
        // Saturating: an inverted (overnight) range can pass the overlap test
        // while its end lies before the other range's start.
        self.end
            .min(other.end)
            .saturating_sub(self.start.max(other.start))
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", ClockTime(self.start), ClockTime(self.end))
    }
}

impl FromStr for TimeRange {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        parse_time_range(s).ok_or_else(|| EngineError::InvalidTimeRange(s.to_string()))
    }
}

/// 12-hour rendering of a minute-of-day value.
struct ClockTime(u32);

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hour24 = (self.0 / MINUTES_PER_HOUR) % 24;
        let minute = self.0 % MINUTES_PER_HOUR;
        let (hour12, period) = match hour24 {
            0 => (12, "AM"),
            1..=11 => (hour24, "AM"),
            12 => (12, "PM"),
            _ => (hour24 - 12, "PM"),
        };
        write!(f, "{}:{:02} {}", hour12, minute, period)
    }
}

/// Parse `"<start> - <end>"` into a [`TimeRange`].
///
/// Returns `None` when the separator does not split the text into exactly two
/// parts or when either side is not a valid 12-hour clock time.
pub fn parse_time_range(text: &str) -> Option<TimeRange> {
    let parts: Vec<&str> = text.split(" - ").collect();
    if parts.len() != 2 {
        return None;
    }

    Some(TimeRange {
        start: parse_clock_time(parts[0])?,
        end: parse_clock_time(parts[1])?,
    })
}

/// Parse a single `"H:MM AM"` / `"H:MM PM"` value into minutes since midnight.
pub fn parse_clock_time(text: &str) -> Option<u32> {
    let (clock, period) = text.trim().split_once(' ')?;
    let (hours, minutes) = clock.split_once(':')?;

    if hours.is_empty() || hours.len() > 2 || !hours.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if minutes.len() != 2 || !minutes.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let hour: u32 = hours.parse().ok()?;
    let minute: u32 = minutes.parse().ok()?;
    if !(1..=12).contains(&hour) || minute >= MINUTES_PER_HOUR {
        return None;
    }

    // 12 AM is midnight, 12 PM is noon.
    let hour24 = match period {
        "AM" => hour % 12,
        "PM" => hour % 12 + 12,
        _ => return None,
    };

    Some(hour24 * MINUTES_PER_HOUR + minute)
}

/// Half-open overlap test: `a.start < b.end && a.end > b.start`.
///
/// Ranges that only touch (one ends exactly when the other starts) do not overlap.
pub fn overlaps(a: &TimeRange, b: &TimeRange) -> bool {
    a.start < b.end && a.end > b.start
}
