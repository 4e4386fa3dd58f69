//! Most popular start station, end station and start/end pair.

use serde::Serialize;

use super::utility::mode;
use super::{Stat, column_stat};
use crate::filter::TripView;
use crate::table::OptionalField;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationStats {
    pub most_common_start: Stat<String>,
    pub most_common_end: Stat<String>,
    /// Formatted as `"{start} -> {end}"`.
    pub most_common_trip: Stat<String>,
}

impl StationStats {
    #[tracing::instrument(name = "station_stats", skip_all, fields(rows = view.len()))]
    pub fn from_view(view: &TripView<'_>) -> Self {
        let rows = view.rows();

        let most_common_start = column_stat(view, &[OptionalField::StartStation], || {
            mode(rows.iter().filter_map(|r| r.record.start_station.as_deref())).map(str::to_string)
        });
        let most_common_end = column_stat(view, &[OptionalField::EndStation], || {
            mode(rows.iter().filter_map(|r| r.record.end_station.as_deref())).map(str::to_string)
        });
        // A trip with either end blank has no pair.
        let most_common_trip = column_stat(
            view,
            &[OptionalField::StartStation, OptionalField::EndStation],
            || {
                mode(rows.iter().filter_map(|r| {
                    let start = r.record.start_station.as_deref()?;
                    let end = r.record.end_station.as_deref()?;
                    Some(trip_label(start, end))
                }))
            },
        );

        StationStats {
            most_common_start,
            most_common_end,
            most_common_trip,
        }
    }
}

pub fn trip_label(start: &str, end: &str) -> String {
    format!("{start} -> {end}")
}
