use crate::error::Result;
use crate::reports::types::TimeReport;
use crate::stats::mode;
use crate::table::{Column, TripTable};

/// Most frequent times of travel. The hour column is derived from Start Time
/// on access, so the table is left untouched.
#[tracing::instrument(skip(table), fields(rows = table.len()))]
pub fn time_report(table: &TripTable) -> Result<TimeReport> {
    Ok(TimeReport {
        popular_month: mode(table, Column::Month)?,
        popular_day: mode(table, Column::DayOfWeek)?,
        popular_hour: mode(table, Column::Hour)?,
    })
}
