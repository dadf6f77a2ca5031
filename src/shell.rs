//! The interactive exploration session.

use std::io::{BufRead, Write};
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

use crate::error::Result;
use crate::loader;
use crate::output::{
    render_durations, render_empty_selection, render_filters, render_raw_row, render_stations,
    render_time, render_users, separator,
};
use crate::paginate::page;
use crate::prompt::Prompter;
use crate::reports::{duration_report, station_report, time_report, user_report};
use crate::table::TripTable;

/// Raw trips shown per "yes" answer.
pub const PAGE_SIZE: usize = 5;

const RAW_QUESTION: &str = "\nWould you like to see individual trip data? Type \"yes\" or \"no\": ";
const RESTART_QUESTION: &str = "\nWould you like to restart? Enter \"yes\" or \"no\": ";

/// Runs sessions until the user declines to restart.
pub fn run<R: BufRead, W: Write>(prompter: &mut Prompter<R, W>, data_dir: &Path) -> Result<()> {
    loop {
        run_once(prompter, data_dir)?;
        if !prompter.ask_yes_no(RESTART_QUESTION)? {
            return Ok(());
        }
    }
}

fn run_once<R: BufRead, W: Write>(prompter: &mut Prompter<R, W>, data_dir: &Path) -> Result<()> {
    writeln!(prompter.output(), "Hello! Let's explore some US bikeshare data!")?;
    let city = prompter.ask_city()?;
    let filters = prompter.ask_filters()?;

    let out = prompter.output();
    separator(out)?;
    render_filters(out, city, &filters)?;
    info!(city = %city, month = ?filters.month(), day = ?filters.day(), "Session filters chosen");

    let table = loader::load(city, data_dir)?;
    let selection = filters.apply(&table);

    if selection.is_empty() {
        warn!(city = %city, "Selection is empty");
        render_empty_selection(out)?;
        separator(out)?;
        return Ok(());
    }

    run_reports(out, &selection)?;
    page_raw_rows(prompter, &selection)
}

/// Runs the four reports in order, printing each with how long it took.
pub fn run_reports<W: Write>(out: &mut W, table: &TripTable) -> Result<()> {
    let started = Instant::now();
    writeln!(out, "\nCalculating The Most Frequent Times of Travel...\n")?;
    render_time(out, &time_report(table)?)?;
    finish_section(out, started)?;

    let started = Instant::now();
    writeln!(out, "\nCalculating The Most Popular Stations and Trip...\n")?;
    render_stations(out, &station_report(table)?)?;
    finish_section(out, started)?;

    let started = Instant::now();
    writeln!(out, "\nCalculating Trip Duration...\n")?;
    render_durations(out, &duration_report(table)?)?;
    finish_section(out, started)?;

    let started = Instant::now();
    writeln!(out, "\nCalculating User Stats...\n")?;
    render_users(out, &user_report(table)?)?;
    finish_section(out, started)
}

fn finish_section<W: Write>(out: &mut W, started: Instant) -> Result<()> {
    writeln!(out, "\nThis took {} seconds.", started.elapsed().as_secs_f64())?;
    separator(out)?;
    Ok(())
}

/// Shows [`PAGE_SIZE`] raw trips per "yes" until the user says "no" or the
/// selection runs out.
fn page_raw_rows<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    table: &TripTable,
) -> Result<()> {
    let mut start = 0;
    while prompter.ask_yes_no(RAW_QUESTION)? {
        let batch = page(table, start, PAGE_SIZE);
        let out = prompter.output();
        if batch.is_empty() {
            writeln!(out, "No more trips to display.")?;
            break;
        }
        for row in &batch {
            render_raw_row(out, row)?;
        }
        start += batch.len();
    }
    Ok(())
}
