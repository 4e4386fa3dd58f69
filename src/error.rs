//! Error types for loading trip data and parsing selections.
//!
//! A filter that matches nothing is not an error; see [`crate::stats::Stat`].

use std::path::PathBuf;

use thiserror::Error;

/// The source for a city could not be turned into a trip table.
#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("no data source configured for city '{city}'")]
    Unconfigured { city: String },

    #[error("failed to open '{}'", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in '{source_name}'")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },

    #[error("'{source_name}' has no 'Start Time' column")]
    MissingStartTime { source_name: String },

    #[error("'{source_name}' row {row}: cannot parse start time '{value}'")]
    BadTimestamp {
        source_name: String,
        row: usize,
        value: String,
    },

    #[error("'{source_name}' row {row}: invalid {column} value '{value}'")]
    BadValue {
        source_name: String,
        row: usize,
        column: &'static str,
        value: String,
    },
}

/// A city, month or day value outside the supported set.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidSelectionError {
    #[error("unknown city '{0}' (expected chicago, newyorkcity or washington)")]
    City(String),

    #[error("unknown month '{0}' (expected all or january through june)")]
    Month(String),

    #[error("unknown day '{0}' (expected all or monday through sunday)")]
    Day(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    DataSource(#[from] DataSourceError),

    #[error(transparent)]
    InvalidSelection(#[from] InvalidSelectionError),
}

pub type Result<T> = std::result::Result<T, Error>;
