//! Human-readable elapsed-time phrases ("1 day", "about 3 hours", "5 minutes ago").
//!
//! The bands round the way operators read a dashboard: anything between
//! 24 hours and just under 42 hours is "1 day", 45 to 89 minutes is
//! "about 1 hour", and so on.

use chrono::{Datelike, Timelike};

use crate::types::Timestamp;

const MINUTES_IN_HOUR: i64 = 60;
const MINUTES_IN_DAY: i64 = 1_440;
const MINUTES_IN_ALMOST_TWO_DAYS: i64 = 2_520;
const MINUTES_IN_MONTH: i64 = 43_200;
const MINUTES_IN_TWO_MONTHS: i64 = 86_400;

/// Phrase for the time between two instants. Argument order does not matter.
pub fn format_distance(a: Timestamp, b: Timestamp) -> String {
    let (earlier, later) = if a <= b { (a, b) } else { (b, a) };
    let seconds = (later - earlier).num_seconds();
    let minutes = round_div(seconds, 60);

    if minutes < 2 {
        return if minutes == 0 {
            "less than a minute".to_string()
        } else {
            "1 minute".to_string()
        };
    }
    if minutes < 45 {
        return format!("{minutes} minutes");
    }
    if minutes < 90 {
        return "about 1 hour".to_string();
    }
    if minutes < MINUTES_IN_DAY {
        let hours = round_div(minutes, MINUTES_IN_HOUR);
        return format!("about {hours} hours");
    }
    if minutes < MINUTES_IN_ALMOST_TWO_DAYS {
        return "1 day".to_string();
    }
    if minutes < MINUTES_IN_MONTH {
        let days = round_div(minutes, MINUTES_IN_DAY);
        return format!("{days} days");
    }
    if minutes < MINUTES_IN_TWO_MONTHS {
        let months = round_div(minutes, MINUTES_IN_MONTH);
        return plural("about", months, "month");
    }

    let months = whole_months_between(earlier, later);
    if months < 12 {
        let nearest = round_div(minutes, MINUTES_IN_MONTH);
        return plural("", nearest, "month");
    }

    let years = months / 12;
    let remainder = months % 12;
    if remainder < 3 {
        plural("about", years, "year")
    } else if remainder < 9 {
        plural("over", years, "year")
    } else {
        plural("almost", years + 1, "year")
    }
}

/// Phrase relative to `now`: "3 hours ago" for the past, "in 2 days" for the future.
pub fn format_distance_from_now(instant: Timestamp, now: Timestamp) -> String {
    let phrase = format_distance(instant, now);
    if instant > now {
        format!("in {phrase}")
    } else {
        format!("{phrase} ago")
    }
}

fn plural(qualifier: &str, count: i64, unit: &str) -> String {
    let suffix = if count == 1 { "" } else { "s" };
    if qualifier.is_empty() {
        format!("{count} {unit}{suffix}")
    } else {
        format!("{qualifier} {count} {unit}{suffix}")
    }
}

/// Integer division rounding half up. Both operands are non-negative here.
fn round_div(value: i64, divisor: i64) -> i64 {
    (value + divisor / 2) / divisor
}

/// Completed calendar months from `earlier` to `later`.
fn whole_months_between(earlier: Timestamp, later: Timestamp) -> i64 {
    let mut months = i64::from(later.year() - earlier.year()) * 12 + i64::from(later.month())
        - i64::from(earlier.month());
    let later_offset = (later.day(), later.num_seconds_from_midnight());
    let earlier_offset = (earlier.day(), earlier.num_seconds_from_midnight());
    if months > 0 && later_offset < earlier_offset {
        months -= 1;
    }
    months
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
