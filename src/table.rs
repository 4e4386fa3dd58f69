//! Raw trip records and the per-table schema of optional columns.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use serde::Serialize;

pub const START_TIME_COLUMN: &str = "Start Time";

/// A column a city's export may or may not carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum OptionalField {
    #[serde(rename = "Trip Duration")]
    TripDuration,
    #[serde(rename = "Start Station")]
    StartStation,
    #[serde(rename = "End Station")]
    EndStation,
    #[serde(rename = "User Type")]
    UserType,
    #[serde(rename = "Gender")]
    Gender,
    #[serde(rename = "Birth Year")]
    BirthYear,
}

impl OptionalField {
    pub const ALL: [OptionalField; 6] = [
        OptionalField::TripDuration,
        OptionalField::StartStation,
        OptionalField::EndStation,
        OptionalField::UserType,
        OptionalField::Gender,
        OptionalField::BirthYear,
    ];

    /// Header of the column in the source CSV.
    pub fn column_name(&self) -> &'static str {
        match self {
            OptionalField::TripDuration => "Trip Duration",
            OptionalField::StartStation => "Start Station",
            OptionalField::EndStation => "End Station",
            OptionalField::UserType => "User Type",
            OptionalField::Gender => "Gender",
            OptionalField::BirthYear => "Birth Year",
        }
    }

    pub fn from_column_name(name: &str) -> Option<Self> {
        OptionalField::ALL
            .into_iter()
            .find(|f| f.column_name() == name.trim())
    }
}

/// Which optional columns a table carries. Fixed for the life of the table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    fields: BTreeSet<OptionalField>,
}

impl Schema {
    pub fn new(fields: impl IntoIterator<Item = OptionalField>) -> Self {
        Self {
            fields: fields.into_iter().collect(),
        }
    }

    /// Every optional column present.
    pub fn full() -> Self {
        Self::new(OptionalField::ALL)
    }

    pub fn has(&self, field: OptionalField) -> bool {
        self.fields.contains(&field)
    }

    /// Present fields in column order.
    pub fn fields(&self) -> impl Iterator<Item = OptionalField> + '_ {
        self.fields.iter().copied()
    }
}

/// One row of a city's trip export.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    pub start_time: NaiveDateTime,
    pub trip_duration: Option<f64>,
    pub start_station: Option<String>,
    pub end_station: Option<String>,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,
}

/// All trips for one city, as loaded.
#[derive(Debug, Clone, Default)]
pub struct TripTable {
    pub schema: Schema,
    pub rows: Vec<TripRecord>,
}

impl TripTable {
    pub fn new(schema: Schema, rows: Vec<TripRecord>) -> Self {
        Self { schema, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_name_lookup() {
        assert_eq!(
            OptionalField::from_column_name("Birth Year"),
            Some(OptionalField::BirthYear)
        );
        assert_eq!(
            OptionalField::from_column_name(" Gender "),
            Some(OptionalField::Gender)
        );
        assert_eq!(OptionalField::from_column_name("End Time"), None);
    }

    #[test]
    fn test_schema_presence() {
        let schema = Schema::new([OptionalField::TripDuration, OptionalField::UserType]);
        assert!(schema.has(OptionalField::TripDuration));
        assert!(!schema.has(OptionalField::Gender));
        assert_eq!(
            schema.fields().collect::<Vec<_>>(),
            vec![OptionalField::TripDuration, OptionalField::UserType]
        );
    }
}
