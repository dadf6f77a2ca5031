//! In-memory trip table: records, column identifiers and schema queries.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Column headers as they appear in the published city exports.
pub mod headers {
    pub const START_TIME: &str = "Start Time";
    pub const END_TIME: &str = "End Time";
    pub const TRIP_DURATION: &str = "Trip Duration";
    pub const START_STATION: &str = "Start Station";
    pub const END_STATION: &str = "End Station";
    pub const USER_TYPE: &str = "User Type";
    pub const GENDER: &str = "Gender";
    pub const BIRTH_YEAR: &str = "Birth Year";

    // Derived from Start Time
    pub const MONTH: &str = "month";
    pub const DAY_OF_WEEK: &str = "day_of_week";
    pub const HOUR: &str = "hour";
}

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    StartTime,
    EndTime,
    TripDuration,
    StartStation,
    EndStation,
    UserType,
    Gender,
    BirthYear,
    Month,
    DayOfWeek,
    Hour,
}

impl Column {
    pub fn header(self) -> &'static str {
        match self {
            Column::StartTime => headers::START_TIME,
            Column::EndTime => headers::END_TIME,
            Column::TripDuration => headers::TRIP_DURATION,
            Column::StartStation => headers::START_STATION,
            Column::EndStation => headers::END_STATION,
            Column::UserType => headers::USER_TYPE,
            Column::Gender => headers::GENDER,
            Column::BirthYear => headers::BIRTH_YEAR,
            Column::Month => headers::MONTH,
            Column::DayOfWeek => headers::DAY_OF_WEEK,
            Column::Hour => headers::HOUR,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Column::TripDuration | Column::BirthYear | Column::Month | Column::Hour
        )
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// Full English weekday name, e.g. "Monday".
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// A single cell. Floats hash and compare by bit pattern so any value can be
/// used as a frequency key.
#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
    Timestamp(NaiveDateTime),
}

impl Value {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Int(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Text(s) => s.hash(state),
            Value::Timestamp(t) => t.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => f.write_str(s),
            Value::Timestamp(t) => write!(f, "{}", t.format(TIMESTAMP_FORMAT)),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Timestamp(_) => serializer.collect_str(self),
        }
    }
}

/// One trip. `month` and `day_of_week` are derived from the start time when
/// the record is built and cannot be set independently.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub trip_duration: f64,
    pub start_station: String,
    pub end_station: String,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,
    month: u32,
    day_of_week: Weekday,
}

impl TripRecord {
    pub fn new(
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        trip_duration: f64,
        start_station: impl Into<String>,
        end_station: impl Into<String>,
    ) -> Self {
        Self {
            start_time,
            end_time,
            trip_duration,
            start_station: start_station.into(),
            end_station: end_station.into(),
            user_type: None,
            gender: None,
            birth_year: None,
            month: start_time.month(),
            day_of_week: start_time.weekday(),
        }
    }

    pub fn with_user_type(mut self, user_type: Option<String>) -> Self {
        self.user_type = user_type;
        self
    }

    pub fn with_gender(mut self, gender: Option<String>) -> Self {
        self.gender = gender;
        self
    }

    pub fn with_birth_year(mut self, birth_year: Option<i32>) -> Self {
        self.birth_year = birth_year;
        self
    }

    /// Calendar month of the start time, 1-12.
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day_of_week(&self) -> Weekday {
        self.day_of_week
    }

    pub fn hour(&self) -> u32 {
        self.start_time.hour()
    }

    /// Cell value for `column`, or `None` when the cell is empty.
    pub fn value(&self, column: Column) -> Option<Value> {
        fn text(s: &str) -> Option<Value> {
            (!s.is_empty()).then(|| Value::Text(s.to_string()))
        }

        match column {
            Column::StartTime => Some(Value::Timestamp(self.start_time)),
            Column::EndTime => Some(Value::Timestamp(self.end_time)),
            Column::TripDuration => Some(Value::Float(self.trip_duration)),
            Column::StartStation => text(&self.start_station),
            Column::EndStation => text(&self.end_station),
            Column::UserType => self.user_type.as_deref().and_then(text),
            Column::Gender => self.gender.as_deref().and_then(text),
            Column::BirthYear => self.birth_year.map(|y| Value::Int(y.into())),
            Column::Month => Some(Value::Int(self.month.into())),
            Column::DayOfWeek => Some(Value::Text(weekday_name(self.day_of_week).to_string())),
            Column::Hour => Some(Value::Int(self.hour().into())),
        }
    }
}

/// Which optional columns the source carried.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub has_gender: bool,
    pub has_birth_year: bool,
}

impl Schema {
    pub fn has_column(&self, column: Column) -> bool {
        match column {
            Column::Gender => self.has_gender,
            Column::BirthYear => self.has_birth_year,
            _ => true,
        }
    }
}

/// Ordered trip records for one city sharing a single schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripTable {
    schema: Schema,
    rows: Vec<TripRecord>,
}

impl TripTable {
    pub fn new(schema: Schema, rows: Vec<TripRecord>) -> Self {
        Self { schema, rows }
    }

    pub fn schema(&self) -> Schema {
        self.schema
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.schema.has_column(column)
    }

    pub fn rows(&self) -> &[TripRecord] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&TripRecord> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// A new table with the same schema holding the rows that satisfy `keep`.
    pub fn select<F>(&self, mut keep: F) -> TripTable
    where
        F: FnMut(&TripRecord) -> bool,
    {
        TripTable {
            schema: self.schema,
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }
}
