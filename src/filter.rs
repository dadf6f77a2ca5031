//! Month / weekday filtering of a loaded [`TripTable`].

use chrono::Weekday;
use serde::{Serialize, Serializer};

use crate::error::{BikeshareError, Result};
use crate::table::{TripTable, weekday_name};

/// Months covered by the published exports (January..June).
pub const MONTHS: [&str; 6] = ["january", "february", "march", "april", "may", "june"];

const ALL: &str = "all";

/// The (month, day) pair narrowing a table. `None` means no filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterSpec {
    month: Option<u32>,
    #[serde(serialize_with = "serialize_day")]
    day: Option<Weekday>,
}

fn serialize_day<S: Serializer>(day: &Option<Weekday>, s: S) -> std::result::Result<S::Ok, S::Error> {
    match day {
        Some(d) => s.serialize_some(weekday_name(*d)),
        None => s.serialize_none(),
    }
}

impl FilterSpec {
    /// Builds a filter, rejecting months outside 1..=6.
    pub fn new(month: Option<u32>, day: Option<Weekday>) -> Result<Self> {
        if let Some(m) = month {
            if !(1..=MONTHS.len() as u32).contains(&m) {
                return Err(BikeshareError::InvalidFilter(format!(
                    "month {m} is outside January..June"
                )));
            }
        }
        Ok(Self { month, day })
    }

    /// Parses textual month and day answers, e.g. `("march", "tu")` or `("all", "Sunday")`.
    pub fn parse(month: &str, day: &str) -> Result<Self> {
        Self::new(parse_month(month)?, parse_day(day)?)
    }

    pub fn month(&self) -> Option<u32> {
        self.month
    }

    pub fn day(&self) -> Option<Weekday> {
        self.day
    }

    pub fn apply(&self, table: &TripTable) -> TripTable {
        filter(table, self.month, self.day)
    }
}

/// Keeps rows whose month and weekday match the given values. Both filters
/// are optional and combine by logical AND; an empty result is valid.
pub fn filter(table: &TripTable, month: Option<u32>, day: Option<Weekday>) -> TripTable {
    table.select(|row| {
        month.is_none_or(|m| row.month() == m) && day.is_none_or(|d| row.day_of_week() == d)
    })
}

/// Parses `"all"`, `"1"`..`"6"`, or a month name / 3-letter prefix.
pub fn parse_month(input: &str) -> Result<Option<u32>> {
    let s = input.trim().to_lowercase();
    if s.is_empty() || s == ALL {
        return Ok(None);
    }

    if let Ok(n) = s.parse::<u32>() {
        return if (1..=MONTHS.len() as u32).contains(&n) {
            Ok(Some(n))
        } else {
            Err(BikeshareError::InvalidFilter(format!(
                "month {n} is outside January..June"
            )))
        };
    }

    MONTHS
        .iter()
        .position(|name| *name == s || (s.len() >= 3 && name.starts_with(&s)))
        .map(|i| Some(i as u32 + 1))
        .ok_or_else(|| BikeshareError::InvalidFilter(format!("unknown month '{}'", input.trim())))
}

/// Parses `"all"`, a weekday name in any case, or one of the shell
/// abbreviations `m, tu, w, th, f, sa, su`.
pub fn parse_day(input: &str) -> Result<Option<Weekday>> {
    let s = input.trim().to_lowercase();
    let day = match s.as_str() {
        "" | ALL => return Ok(None),
        "m" | "mon" | "monday" => Weekday::Mon,
        "tu" | "tue" | "tuesday" => Weekday::Tue,
        "w" | "wed" | "wednesday" => Weekday::Wed,
        "th" | "thu" | "thursday" => Weekday::Thu,
        "f" | "fri" | "friday" => Weekday::Fri,
        "sa" | "sat" | "saturday" => Weekday::Sat,
        "su" | "sun" | "sunday" => Weekday::Sun,
        _ => {
            return Err(BikeshareError::InvalidFilter(format!(
                "unknown day '{}'",
                input.trim()
            )));
        }
    };
    Ok(Some(day))
}
