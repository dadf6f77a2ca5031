//! Descriptive statistics over a filtered trip table.
//!
//! Each generator reads the table and returns a self-contained result record;
//! they share no state and can run in any order.

pub mod duration;
pub mod station;
pub mod time;
pub mod types;
pub mod users;
pub mod utility;

pub use duration::duration_report;
pub use station::station_report;
pub use time::time_report;
pub use users::user_report;

use crate::city::City;
use crate::error::Result;
use crate::filter::FilterSpec;
use crate::table::TripTable;
use types::SessionReport;

impl SessionReport {
    /// Runs all four generators over an already filtered table.
    ///
    /// # Errors
    ///
    /// Fails with [`crate::error::BikeshareError::EmptyColumn`] when the
    /// selection holds no trips.
    pub fn build(city: City, filters: FilterSpec, table: &TripTable) -> Result<Self> {
        Ok(SessionReport {
            city,
            filters,
            trips: table.len(),
            time: time_report(table)?,
            stations: station_report(table)?,
            durations: duration_report(table)?,
            users: user_report(table)?,
        })
    }
}
