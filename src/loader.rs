//! CSV loader for city trip exports.
//!
//! Reads the whole export into a [`TripTable`], deriving the calendar columns
//! from each row's start time. Plain `.csv` files are preferred; a `.csv.gz`
//! sibling is decoded when the plain file is absent.

use chrono::NaiveDateTime;
use flate2::read::GzDecoder;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::city::City;
use crate::error::{BikeshareError, Result};
use crate::table::{Schema, TripRecord, TripTable, headers};

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// A single row as it appears in the export. Extra columns are ignored.
#[derive(Debug, Deserialize)]
struct RawTrip {
    #[serde(rename = "Start Time")]
    start_time: String,
    #[serde(rename = "End Time")]
    end_time: String,
    #[serde(rename = "Trip Duration")]
    trip_duration: f64,
    #[serde(rename = "Start Station", default)]
    start_station: Option<String>,
    #[serde(rename = "End Station", default)]
    end_station: Option<String>,
    #[serde(rename = "User Type", default)]
    user_type: Option<String>,
    #[serde(rename = "Gender", default)]
    gender: Option<String>,
    #[serde(rename = "Birth Year", default)]
    birth_year: Option<f64>,
}

/// Loads the trip export for a city identifier such as `"new york city"`.
pub fn load_by_name(identifier: &str, data_dir: impl AsRef<Path>) -> Result<TripTable> {
    let city: City = identifier.parse()?;
    load(city, data_dir)
}

/// Loads a city's trip export from `data_dir`.
#[tracing::instrument(skip_all, fields(city = %city))]
pub fn load(city: City, data_dir: impl AsRef<Path>) -> Result<TripTable> {
    let path = source_path(city, data_dir.as_ref());
    load_path(&path)
}

/// Resolves the export file for `city`, falling back to a gzip sibling.
pub fn source_path(city: City, data_dir: &Path) -> PathBuf {
    let plain = data_dir.join(city.file_name());
    if plain.exists() {
        return plain;
    }

    let gz = data_dir.join(format!("{}.gz", city.file_name()));
    if gz.exists() {
        debug!(path = %gz.display(), "Using compressed export");
        return gz;
    }

    plain
}

/// Loads a CSV export from disk, decompressing `.gz` files.
pub fn load_path(path: &Path) -> Result<TripTable> {
    let file = File::open(path).map_err(|source| BikeshareError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let compressed = path.extension().and_then(|e| e.to_str()) == Some("gz");

    let table = if compressed {
        load_from_reader(GzDecoder::new(BufReader::new(file)))?
    } else {
        load_from_reader(BufReader::new(file))?
    };

    info!(
        path = %path.display(),
        rows = table.len(),
        has_gender = table.schema().has_gender,
        has_birth_year = table.schema().has_birth_year,
        "Trip data loaded"
    );
    Ok(table)
}

/// Loads trips from any CSV byte source with a header row.
///
/// # Errors
///
/// Returns [`BikeshareError::Parse`] if a start or end time is malformed or a
/// birth year is not a whole number, and
/// [`BikeshareError::Csv`] if a row cannot be decoded at all.
pub fn load_from_reader<R: Read>(reader: R) -> Result<TripTable> {
    let mut rdr = csv::Reader::from_reader(reader);

    let header_row = rdr.headers()?;
    let schema = Schema {
        has_gender: header_row.iter().any(|h| h == headers::GENDER),
        has_birth_year: header_row.iter().any(|h| h == headers::BIRTH_YEAR),
    };

    let mut rows = Vec::new();
    for (i, result) in rdr.deserialize().enumerate() {
        let raw: RawTrip = result?;
        rows.push(to_record(raw, i + 1)?);
    }

    Ok(TripTable::new(schema, rows))
}

fn to_record(raw: RawTrip, row: usize) -> Result<TripRecord> {
    let start_time = parse_timestamp(&raw.start_time, row, headers::START_TIME)?;
    let end_time = parse_timestamp(&raw.end_time, row, headers::END_TIME)?;

    Ok(TripRecord::new(
        start_time,
        end_time,
        raw.trip_duration,
        raw.start_station.unwrap_or_default(),
        raw.end_station.unwrap_or_default(),
    )
    .with_user_type(raw.user_type.filter(|s| !s.is_empty()))
    .with_gender(raw.gender.filter(|s| !s.is_empty()))
    .with_birth_year(raw.birth_year.map(|y| birth_year(y, row)).transpose()?))
}

// Exports write birth years as floats, e.g. "1992.0"
fn birth_year(value: f64, row: usize) -> Result<i32> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= f64::from(i32::MAX) {
        Ok(value as i32)
    } else {
        Err(BikeshareError::Parse {
            row,
            column: headers::BIRTH_YEAR,
            value: value.to_string(),
        })
    }
}

/// Parses an export timestamp, reporting the offending row and column on failure.
pub fn parse_timestamp(value: &str, row: usize, column: &'static str) -> Result<NaiveDateTime> {
    let trimmed = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| BikeshareError::Parse {
            row,
            column,
            value: value.to_string(),
        })
}
