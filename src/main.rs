//! CLI entry point for the bikeshare explorer.
//!
//! Runs the interactive session by default, or prints reports and raw trips
//! for a city and filter given on the command line.

use anyhow::Result;
use bikeshare::city::City;
use bikeshare::filter::{FilterSpec, parse_day, parse_month};
use bikeshare::output::{
    append_record, print_json, render_empty_selection, render_filters, render_raw_row,
    render_session,
};
use bikeshare::paginate::page;
use bikeshare::prompt::Prompter;
use bikeshare::reports::types::SessionReport;
use bikeshare::{loader, shell};
use clap::{Args, Parser, Subcommand};
use std::ffi::OsStr;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare")]
#[command(about = "Explore US bikeshare trip data", long_about = None)]
struct Cli {
    /// Directory holding chicago.csv, new_york_city.csv and washington.csv
    #[arg(long, global = true, env = "BIKESHARE_DATA_DIR", default_value = ".")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct Selection {
    /// Chicago, "New York City" (or nyc), or Washington
    #[arg(short, long)]
    city: City,

    /// January..June, 1..6, or "all"
    #[arg(short, long, default_value = "all")]
    month: String,

    /// Weekday name, M/Tu/W/Th/F/Sa/Su, or "all"
    #[arg(short, long, default_value = "all")]
    day: String,
}

impl Selection {
    fn filters(&self) -> bikeshare::error::Result<FilterSpec> {
        FilterSpec::new(parse_month(&self.month)?, parse_day(&self.day)?)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive session (the default)
    Explore,
    /// Print statistics for a city and optional month/day filter
    Report {
        #[command(flatten)]
        selection: Selection,

        /// Print the report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,

        /// CSV file to append a summary row to
        #[arg(short, long)]
        export: Option<PathBuf>,

        /// Also print this many raw trips
        #[arg(long, default_value_t = 0)]
        raw: usize,
    },
    /// Print raw trips from a city and optional month/day filter
    Rows {
        #[command(flatten)]
        selection: Selection,

        /// Index of the first trip to print
        #[arg(short, long, default_value_t = 0)]
        start: usize,

        /// Number of trips to print
        #[arg(short = 'n', long, default_value_t = shell::PAGE_SIZE)]
        count: usize,
    },
}

/// Directives from `var`, or `default` when it is unset, empty or invalid.
fn env_filter(var: &str, default: &str) -> EnvFilter {
    directives_or(std::env::var(var).ok().as_deref(), default)
}

fn directives_or(directives: Option<&str>, default: &str) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(default))
}

/// Logging setup: stderr for humans + JSON rolling log file.
fn init_tracing() -> Result<WorkerGuard> {
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/bikeshare.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    // Prompts go to stdout, so keep stderr quiet unless asked
    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(env_filter("RUST_LOG", "warn"));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(non_blocking_file)
        .with_filter(env_filter("RUST_LOG_JSON", "debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    Ok(guard)
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let _log_guard = init_tracing()?;

    let cli = Cli::parse();
    debug!(data_dir = %cli.data_dir.display(), "Starting");

    match cli.command.unwrap_or(Commands::Explore) {
        Commands::Explore => {
            let stdin = io::stdin();
            let mut prompter = Prompter::new(stdin.lock(), io::stdout());
            shell::run(&mut prompter, &cli.data_dir)?;
        }
        Commands::Report {
            selection,
            json,
            export,
            raw,
        } => {
            let filters = selection.filters()?;
            let table = loader::load(selection.city, &cli.data_dir)?;
            let filtered = filters.apply(&table);

            let mut out = io::stdout().lock();
            if filtered.is_empty() {
                render_filters(&mut out, selection.city, &filters)?;
                render_empty_selection(&mut out)?;
                return Ok(());
            }
            let report = SessionReport::build(selection.city, filters, &filtered)?;

            if json {
                print_json(&mut out, &report)?;
            } else {
                render_session(&mut out, &report)?;
            }

            for row in page(&filtered, 0, raw) {
                render_raw_row(&mut out, &row)?;
            }

            if let Some(path) = export {
                append_record(&path, &report)?;
                info!(path = %path.display(), "Summary exported");
            }
        }
        Commands::Rows {
            selection,
            start,
            count,
        } => {
            let filters = selection.filters()?;
            let table = loader::load(selection.city, &cli.data_dir)?;
            let filtered = filters.apply(&table);

            let mut out = io::stdout().lock();
            let rows = page(&filtered, start, count);
            if rows.is_empty() {
                writeln!(out, "No trips at index {start} (selection has {}).", filtered.len())?;
            }
            for row in &rows {
                render_raw_row(&mut out, row)?;
            }
        }
    }

    Ok(())
}
