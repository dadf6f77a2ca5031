use crate::error::Result;
use crate::reports::types::StationReport;
use crate::stats::{joint_mode, mode};
use crate::table::{Column, TripTable};

/// Most popular stations and start/end combination.
#[tracing::instrument(skip(table), fields(rows = table.len()))]
pub fn station_report(table: &TripTable) -> Result<StationReport> {
    Ok(StationReport {
        popular_start_station: mode(table, Column::StartStation)?,
        popular_end_station: mode(table, Column::EndStation)?,
        popular_trip: joint_mode(table, Column::StartStation, Column::EndStation)?,
    })
}
