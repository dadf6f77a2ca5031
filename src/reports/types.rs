//! Result records produced by the report generators.

use serde::Serialize;

use crate::city::City;
use crate::filter::FilterSpec;
use crate::stats::ModeResult;
use crate::table::Value;

/// Most frequent month, weekday and start hour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeReport {
    pub popular_month: ModeResult<Value>,
    pub popular_day: ModeResult<Value>,
    pub popular_hour: ModeResult<Value>,
}

/// Most frequent start station, end station and start/end pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationReport {
    pub popular_start_station: ModeResult<Value>,
    pub popular_end_station: ModeResult<Value>,
    pub popular_trip: ModeResult<(Value, Value)>,
}

/// Total and average trip duration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationReport {
    pub total_seconds: f64,
    /// `total_seconds` rendered as `[N days, ]H:MM:SS`.
    pub total_elapsed: String,
    pub mean_minutes: f64,
    pub trip_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserTypeCount {
    pub user_type: String,
    pub count: usize,
}

/// Gender counts, or `NoData` when the selection carries no gender values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenderBreakdown {
    Counts { male: usize, female: usize },
    NoData,
}

/// Birth year range and mode, or `NoData` when the selection carries no birth years.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BirthYearStats {
    Stats {
        earliest: i32,
        most_recent: i32,
        most_common: i32,
        most_common_count: usize,
    },
    NoData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserReport {
    pub user_types: Vec<UserTypeCount>,
    pub gender: GenderBreakdown,
    pub birth_years: BirthYearStats,
}

/// All four reports for one city and filter selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionReport {
    pub city: City,
    pub filters: FilterSpec,
    pub trips: usize,
    pub time: TimeReport,
    pub stations: StationReport,
    pub durations: DurationReport,
    pub users: UserReport,
}
