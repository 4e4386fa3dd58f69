//! Reads a city's trip export into a [`TripTable`].
//!
//! The whole file is materialized before anything else happens. Columns other
//! than `Start Time` and the known optional ones are ignored.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord, Trim};
use flate2::read::GzDecoder;
use tracing::{debug, info};

use crate::config::DataSourceConfig;
use crate::error::DataSourceError;
use crate::selection::City;
use crate::table::{OptionalField, START_TIME_COLUMN, Schema, TripRecord, TripTable};

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

pub struct RecordLoader<'a> {
    config: &'a DataSourceConfig,
}

impl<'a> RecordLoader<'a> {
    pub fn new(config: &'a DataSourceConfig) -> Self {
        Self { config }
    }

    /// Loads every trip for `city` from its configured source.
    ///
    /// # Errors
    ///
    /// Returns a [`DataSourceError`] if the file cannot be opened or its
    /// contents are not a valid trip export.
    #[tracing::instrument(skip(self), fields(city = %city))]
    pub fn load(&self, city: City) -> Result<TripTable, DataSourceError> {
        let path = self.config.path_for(city)?;
        let table = load_path(&path)?;
        info!(
            path = %path.display(),
            rows = table.len(),
            "Trip table loaded"
        );
        Ok(table)
    }
}

/// Loads a trip export from `path`, gunzipping it when the name ends in `.gz`.
pub fn load_path(path: &Path) -> Result<TripTable, DataSourceError> {
    let file = File::open(path).map_err(|source| DataSourceError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let source_name = path.display().to_string();

    if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        debug!(path = %source_name, "Reading gzip-compressed source");
        read_trips(GzDecoder::new(file), &source_name)
    } else {
        read_trips(file, &source_name)
    }
}

/// Parses CSV trip data from any reader. `source_name` only labels errors.
pub fn read_trips<R: Read>(reader: R, source_name: &str) -> Result<TripTable, DataSourceError> {
    let csv_error = |source| DataSourceError::Csv {
        source_name: source_name.to_string(),
        source,
    };

    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = rdr.headers().map_err(csv_error)?.clone();
    let columns = ColumnIndex::from_headers(&headers).ok_or_else(|| {
        DataSourceError::MissingStartTime {
            source_name: source_name.to_string(),
        }
    })?;
    let schema = columns.schema();
    debug!(source = source_name, ?schema, "Resolved trip columns");

    let mut rows = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result.map_err(csv_error)?;
        let row = RowParser {
            record: &record,
            source_name,
            row: i + 1,
        };
        rows.push(row.parse(&columns)?);
    }

    Ok(TripTable::new(schema, rows))
}

/// Positions of the recognised columns within a header row.
struct ColumnIndex {
    start_time: usize,
    optional: Vec<(OptionalField, usize)>,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Option<Self> {
        let mut start_time = None;
        let mut optional: Vec<(OptionalField, usize)> = Vec::new();

        for (idx, name) in headers.iter().enumerate() {
            if name == START_TIME_COLUMN {
                start_time.get_or_insert(idx);
            } else if let Some(field) = OptionalField::from_column_name(name) {
                if !optional.iter().any(|(f, _)| *f == field) {
                    optional.push((field, idx));
                }
            }
        }

        Some(Self {
            start_time: start_time?,
            optional,
        })
    }

    fn schema(&self) -> Schema {
        Schema::new(self.optional.iter().map(|(f, _)| *f))
    }

    fn position(&self, field: OptionalField) -> Option<usize> {
        self.optional
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, idx)| *idx)
    }
}

struct RowParser<'r> {
    record: &'r StringRecord,
    source_name: &'r str,
    row: usize,
}

impl<'r> RowParser<'r> {
    fn parse(&self, columns: &ColumnIndex) -> Result<TripRecord, DataSourceError> {
        let raw_start = self.record.get(columns.start_time).unwrap_or("");
        let start_time =
            parse_timestamp(raw_start).ok_or_else(|| DataSourceError::BadTimestamp {
                source_name: self.source_name.to_string(),
                row: self.row,
                value: raw_start.to_string(),
            })?;

        let text = |field| self.cell(columns, field).map(str::to_string);

        Ok(TripRecord {
            start_time,
            trip_duration: self.duration(columns)?,
            start_station: text(OptionalField::StartStation),
            end_station: text(OptionalField::EndStation),
            user_type: text(OptionalField::UserType),
            gender: text(OptionalField::Gender),
            birth_year: self.birth_year(columns)?,
        })
    }

    /// Non-empty cell content for `field`, or `None` when the column is
    /// absent or the cell is blank.
    fn cell(&self, columns: &ColumnIndex, field: OptionalField) -> Option<&'r str> {
        let idx = columns.position(field)?;
        self.record.get(idx).filter(|v| !v.is_empty())
    }

    fn duration(&self, columns: &ColumnIndex) -> Result<Option<f64>, DataSourceError> {
        let Some(raw) = self.cell(columns, OptionalField::TripDuration) else {
            return Ok(None);
        };
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() && v >= 0.0 => Ok(Some(v)),
            _ => Err(self.bad_value(OptionalField::TripDuration, raw)),
        }
    }

    fn birth_year(&self, columns: &ColumnIndex) -> Result<Option<i32>, DataSourceError> {
        let Some(raw) = self.cell(columns, OptionalField::BirthYear) else {
            return Ok(None);
        };
        // Exports written from float columns carry a trailing ".0".
        match raw.parse::<f64>() {
            Ok(v) if v.fract() == 0.0 && v >= i32::MIN as f64 && v <= i32::MAX as f64 => {
                Ok(Some(v as i32))
            }
            _ => Err(self.bad_value(OptionalField::BirthYear, raw)),
        }
    }

    fn bad_value(&self, field: OptionalField, raw: &str) -> DataSourceError {
        DataSourceError::BadValue {
            source_name: self.source_name.to_string(),
            row: self.row,
            column: field.column_name(),
            value: raw.to_string(),
        }
    }
}

/// Parses a start timestamp in any of the accepted export formats.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}
