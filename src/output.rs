//! Output formatting and persistence for report results.
//!
//! Supports plain-text rendering, JSON serialization, and CSV append.

use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use tracing::debug;

use crate::city::City;
use crate::error::Result;
use crate::filter::FilterSpec;
use crate::paginate::RawRow;
use crate::reports::types::{
    BirthYearStats, DurationReport, GenderBreakdown, SessionReport, StationReport, TimeReport,
    UserReport,
};
use crate::table::weekday_name;

pub const SEPARATOR_WIDTH: usize = 40;

pub fn separator<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", "-".repeat(SEPARATOR_WIDTH))
}

/// Echoes the selection the statistics are computed over.
pub fn render_filters<W: Write>(out: &mut W, city: City, filters: &FilterSpec) -> io::Result<()> {
    let month = filters
        .month()
        .map_or_else(|| "ALL".to_string(), |m| m.to_string());
    let day = filters.day().map_or("ALL", weekday_name);

    writeln!(out, "You are filtering by...")?;
    writeln!(out, "City: {city}")?;
    writeln!(out, "Month: {month} (Jan=1, June=6)")?;
    writeln!(out, "Day: {day}")
}

pub fn render_time<W: Write>(out: &mut W, report: &TimeReport) -> io::Result<()> {
    let TimeReport {
        popular_month: month,
        popular_day: day,
        popular_hour: hour,
    } = report;
    writeln!(out, "Most popular month: {} - count: {}", month.value, month.count)?;
    writeln!(out, "Most popular day: {} - count: {}", day.value, day.count)?;
    writeln!(out, "Most popular hour: {} - count: {}", hour.value, hour.count)
}

pub fn render_stations<W: Write>(out: &mut W, report: &StationReport) -> io::Result<()> {
    let start = &report.popular_start_station;
    let end = &report.popular_end_station;
    let (from, to) = &report.popular_trip.value;

    writeln!(out, "Most popular start station: {}; count: {}", start.value, start.count)?;
    writeln!(out, "Most popular end station: {}; count: {}", end.value, end.count)?;
    writeln!(out, "Most popular trip:")?;
    writeln!(
        out,
        "Starts at \"{from}\" and ends at \"{to}\"; count: {}",
        report.popular_trip.count
    )
}

pub fn render_durations<W: Write>(out: &mut W, report: &DurationReport) -> io::Result<()> {
    writeln!(
        out,
        "Total duration of all trips: {}; count: {}",
        report.total_elapsed, report.trip_count
    )?;
    writeln!(out, "Avg trip duration: {:.2} minutes", report.mean_minutes)
}

pub fn render_users<W: Write>(out: &mut W, report: &UserReport) -> io::Result<()> {
    writeln!(out, "User types...")?;
    for entry in &report.user_types {
        writeln!(out, "{}: {}", entry.user_type, entry.count)?;
    }

    writeln!(out, "\nGender data breakdown...")?;
    match report.gender {
        GenderBreakdown::Counts { male, female } => {
            writeln!(out, "Male: {male}; Female: {female}")?
        }
        GenderBreakdown::NoData => writeln!(out, "No gender data to display.")?,
    }

    writeln!(out, "\nBirth data breakdown...")?;
    match report.birth_years {
        BirthYearStats::Stats {
            earliest,
            most_recent,
            most_common,
            ..
        } => {
            writeln!(out, "Earliest birth year: {earliest}")?;
            writeln!(out, "Most recent birth year: {most_recent}")?;
            writeln!(out, "Most common birth year: {most_common}")
        }
        BirthYearStats::NoData => writeln!(out, "No birth data to display."),
    }
}

/// Renders all four reports with their section headings.
pub fn render_session<W: Write>(out: &mut W, report: &SessionReport) -> io::Result<()> {
    render_filters(out, report.city, &report.filters)?;
    separator(out)?;

    writeln!(out, "\nThe Most Frequent Times of Travel\n")?;
    render_time(out, &report.time)?;
    separator(out)?;

    writeln!(out, "\nThe Most Popular Stations and Trip\n")?;
    render_stations(out, &report.stations)?;
    separator(out)?;

    writeln!(out, "\nTrip Duration\n")?;
    render_durations(out, &report.durations)?;
    separator(out)?;

    writeln!(out, "\nUser Stats\n")?;
    render_users(out, &report.users)?;
    separator(out)
}

/// Printed instead of the reports when the filters leave no trips.
pub fn render_empty_selection<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "\nNo trips match the selected filters.")
}

/// Renders one raw trip as `Header: value` lines after a `---` marker.
pub fn render_raw_row<W: Write>(out: &mut W, row: &RawRow) -> io::Result<()> {
    writeln!(out, "---")?;
    for (column, value) in &row.fields {
        match value {
            Some(v) => writeln!(out, "{column}: {v}")?,
            None => writeln!(out, "{column}: NaN")?,
        }
    }
    Ok(())
}

/// Writes the session report as pretty-printed JSON.
pub fn print_json<W: Write>(out: &mut W, report: &SessionReport) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}

/// Flattened one-row summary of a [`SessionReport`] for CSV export.
#[derive(Debug, Serialize)]
struct SummaryRecord {
    generated_at: DateTime<Utc>,
    city: String,
    month: Option<u32>,
    day: Option<&'static str>,
    trips: usize,
    popular_month: String,
    popular_day: String,
    popular_hour: String,
    popular_start_station: String,
    popular_end_station: String,
    popular_trip: String,
    popular_trip_count: usize,
    total_duration_seconds: f64,
    mean_duration_minutes: f64,
    male: Option<usize>,
    female: Option<usize>,
    earliest_birth_year: Option<i32>,
    most_recent_birth_year: Option<i32>,
    most_common_birth_year: Option<i32>,
}

impl SummaryRecord {
    fn from_report(report: &SessionReport) -> Self {
        let (male, female) = match report.users.gender {
            GenderBreakdown::Counts { male, female } => (Some(male), Some(female)),
            GenderBreakdown::NoData => (None, None),
        };
        let (earliest, most_recent, most_common) = match report.users.birth_years {
            BirthYearStats::Stats {
                earliest,
                most_recent,
                most_common,
                ..
            } => (Some(earliest), Some(most_recent), Some(most_common)),
            BirthYearStats::NoData => (None, None, None),
        };
        let (from, to) = &report.stations.popular_trip.value;

        SummaryRecord {
            generated_at: Utc::now(),
            city: report.city.name().to_string(),
            month: report.filters.month(),
            day: report.filters.day().map(weekday_name),
            trips: report.trips,
            popular_month: report.time.popular_month.value.to_string(),
            popular_day: report.time.popular_day.value.to_string(),
            popular_hour: report.time.popular_hour.value.to_string(),
            popular_start_station: report.stations.popular_start_station.value.to_string(),
            popular_end_station: report.stations.popular_end_station.value.to_string(),
            popular_trip: format!("{from} -> {to}"),
            popular_trip_count: report.stations.popular_trip.count,
            total_duration_seconds: report.durations.total_seconds,
            mean_duration_minutes: report.durations.mean_minutes,
            male,
            female,
            earliest_birth_year: earliest,
            most_recent_birth_year: most_recent,
            most_common_birth_year: most_common,
        }
    }
}

/// Appends a summary of `report` as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: impl AsRef<Path>, report: &SessionReport) -> Result<()> {
    let path = path.as_ref();
    let file_exists = path.exists();
    debug!(path = %path.display(), file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);

    writer.serialize(SummaryRecord::from_report(report))?;
    writer.flush()?;

    Ok(())
}
