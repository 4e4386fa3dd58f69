//! Cursor over a filtered view, handing out raw rows five at a time.

use chrono::NaiveDateTime;
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::debug;

use crate::derive::DerivedTripRecord;
use crate::filter::TripView;
use crate::table::{OptionalField, START_TIME_COLUMN, Schema};

pub const PAGE_SIZE: usize = 5;

/// A single cell of a raw row. Missing values stay [`CellValue::Unset`].
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Timestamp(NaiveDateTime),
    Unset,
}

impl CellValue {
    pub fn is_unset(&self) -> bool {
        matches!(self, CellValue::Unset)
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::Integer(i) => serializer.serialize_i64(*i),
            CellValue::Float(f) => serializer.serialize_f64(*f),
            CellValue::Timestamp(ts) => {
                serializer.collect_str(&ts.format("%Y-%m-%d %H:%M:%S"))
            }
            CellValue::Unset => serializer.serialize_none(),
        }
    }
}

/// Column name to value, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct RowSnapshot {
    cells: Vec<(&'static str, CellValue)>,
}

impl RowSnapshot {
    /// Snapshot of `row` with one cell per column `schema` carries, followed
    /// by the derived columns.
    pub fn new(row: &DerivedTripRecord, schema: &Schema) -> Self {
        let record = &row.record;
        let text = |v: &Option<String>| v.clone().map_or(CellValue::Unset, CellValue::Text);

        let mut cells = vec![(START_TIME_COLUMN, CellValue::Timestamp(record.start_time))];
        for field in schema.fields() {
            let value = match field {
                OptionalField::TripDuration => {
                    record.trip_duration.map_or(CellValue::Unset, CellValue::Float)
                }
                OptionalField::StartStation => text(&record.start_station),
                OptionalField::EndStation => text(&record.end_station),
                OptionalField::UserType => text(&record.user_type),
                OptionalField::Gender => text(&record.gender),
                OptionalField::BirthYear => record
                    .birth_year
                    .map_or(CellValue::Unset, |y| CellValue::Integer(y.into())),
            };
            cells.push((field.column_name(), value));
        }

        let d = &row.derived;
        cells.extend([
            ("year", CellValue::Integer(d.year.into())),
            ("month", CellValue::Integer(d.month_number.into())),
            ("day", CellValue::Integer(d.day_of_month.into())),
            ("month_name", CellValue::Text(d.month_name.to_string())),
            ("day_of_week", CellValue::Text(d.day_of_week_name.to_string())),
            ("hour", CellValue::Integer(d.hour.into())),
        ]);

        Self { cells }
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.cells.iter().map(|(name, _)| *name)
    }

    pub fn cells(&self) -> &[(&'static str, CellValue)] {
        &self.cells
    }
}

impl Serialize for RowSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (name, value) in &self.cells {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Starts at offset 0; each [`advance`](Self::advance) moves it by
/// [`PAGE_SIZE`]. A new filter session builds a new pager.
#[derive(Debug)]
pub struct RawDataPager<'a> {
    view: TripView<'a>,
    offset: usize,
}

impl<'a> RawDataPager<'a> {
    pub fn new(view: TripView<'a>) -> Self {
        Self { view, offset: 0 }
    }

    /// Next window of up to five rows; empty once the view is exhausted.
    pub fn advance(&mut self) -> Vec<RowSnapshot> {
        let rows = self.view.rows();
        let start = self.offset.min(rows.len());
        let end = (start + PAGE_SIZE).min(rows.len());
        self.offset += PAGE_SIZE;

        let schema = self.view.schema();
        rows[start..end]
            .iter()
            .map(|row| RowSnapshot::new(row, schema))
            .collect()
    }

    /// Up to `max` consecutive windows, stopping early at the first empty one.
    pub fn pages(&mut self, max: usize) -> Vec<Vec<RowSnapshot>> {
        let mut pages = Vec::new();
        for page in 1..=max {
            let rows = self.advance();
            if rows.is_empty() {
                debug!(page, "No more rows");
                break;
            }
            pages.push(rows);
        }
        pages
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_exhausted(&self) -> bool {
        self.offset >= self.view.len()
    }
}
