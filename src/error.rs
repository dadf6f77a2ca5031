use std::path::PathBuf;
use thiserror::Error;

use crate::table::Column;

#[derive(Error, Debug)]
pub enum BikeshareError {
    #[error("Parse error on row {row}: column '{column}' has malformed value '{value}'")]
    Parse {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("Unknown city: '{0}'. Choose Chicago, New York City, or Washington")]
    UnknownCity(String),

    #[error("Column '{0}' has no values in the current selection")]
    EmptyColumn(Column),

    #[error("Column not found: {0}")]
    ColumnNotFound(Column),

    #[error("Column '{0}' is not numeric")]
    NotNumeric(Column),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Input closed before a valid answer was given")]
    InputClosed,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cannot open trip export '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BikeshareError>;
