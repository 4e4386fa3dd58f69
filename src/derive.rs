//! Calendar fields computed from each trip's start time.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::Serialize;

use crate::selection::DAY_NAMES;
use crate::table::{Schema, TripRecord, TripTable};

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Fields derived from a start time. No timezone conversion is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TemporalFields {
    pub year: i32,
    /// 1 through 12.
    pub month_number: u32,
    pub month_name: &'static str,
    pub day_of_month: u32,
    pub day_of_week_name: &'static str,
    /// 0 through 23.
    pub hour: u32,
}

impl TemporalFields {
    pub fn from_timestamp(ts: &NaiveDateTime) -> Self {
        let month_number = ts.month();
        Self {
            year: ts.year(),
            month_number,
            month_name: MONTH_NAMES[month_number as usize - 1],
            day_of_month: ts.day(),
            day_of_week_name: weekday_name(ts.weekday()),
            hour: ts.hour(),
        }
    }
}

pub fn weekday_name(day: Weekday) -> &'static str {
    DAY_NAMES[day.num_days_from_monday() as usize]
}

#[derive(Debug, Clone, PartialEq)]
pub struct DerivedTripRecord {
    pub record: TripRecord,
    pub derived: TemporalFields,
}

impl DerivedTripRecord {
    pub fn new(record: TripRecord) -> Self {
        let derived = TemporalFields::from_timestamp(&record.start_time);
        Self { record, derived }
    }

    pub fn month_name(&self) -> &'static str {
        self.derived.month_name
    }

    pub fn day_of_week_name(&self) -> &'static str {
        self.derived.day_of_week_name
    }

    pub fn hour(&self) -> u32 {
        self.derived.hour
    }
}

/// A trip table with temporal fields attached to every row.
#[derive(Debug, Clone, Default)]
pub struct DerivedTable {
    pub schema: Schema,
    pub rows: Vec<DerivedTripRecord>,
}

impl DerivedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Attaches [`TemporalFields`] to every row. Start times are typed by the
/// time a [`TripTable`] exists, so this cannot fail.
pub fn derive(table: TripTable) -> DerivedTable {
    let TripTable { schema, rows } = table;
    DerivedTable {
        schema,
        rows: rows.into_iter().map(DerivedTripRecord::new).collect(),
    }
}
