use crate::error::Result;
use crate::reports::types::DurationReport;
use crate::reports::utility::format_elapsed;
use crate::stats::{mean, sum};
use crate::table::{Column, TripTable};

/// Total and mean trip duration.
#[tracing::instrument(skip(table), fields(rows = table.len()))]
pub fn duration_report(table: &TripTable) -> Result<DurationReport> {
    let total_seconds = sum(table, Column::TripDuration)?;
    let mean_seconds = mean(table, Column::TripDuration)?;

    Ok(DurationReport {
        total_seconds,
        total_elapsed: format_elapsed(total_seconds),
        mean_minutes: mean_seconds / 60.0,
        trip_count: table.len(),
    })
}
