//! Total and average trip duration.

use serde::Serialize;

use super::utility::mean;
use super::{NoDataReason, Stat, absent_column};
use crate::filter::TripView;
use crate::table::OptionalField;

/// Durations are in seconds. Blank cells are skipped; an empty view totals 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationStats {
    pub total: Stat<f64>,
    pub mean: Stat<f64>,
    /// Rows that contributed a duration.
    pub trips_counted: usize,
}

impl DurationStats {
    #[tracing::instrument(name = "duration_stats", skip_all, fields(rows = view.len()))]
    pub fn from_view(view: &TripView<'_>) -> Self {
        if let Some(field) = absent_column(view, &[OptionalField::TripDuration]) {
            let reason = NoDataReason::ColumnAbsent(field);
            return DurationStats {
                total: Stat::NoData(reason),
                mean: Stat::NoData(reason),
                trips_counted: 0,
            };
        }

        let durations: Vec<f64> = view
            .rows()
            .iter()
            .filter_map(|r| r.record.trip_duration)
            .collect();

        let mean = match mean(&durations) {
            Some(m) => Stat::Available(m),
            None if view.is_empty() => Stat::NoData(NoDataReason::EmptySelection),
            None => Stat::NoData(NoDataReason::AllMissing),
        };

        DurationStats {
            total: Stat::Available(durations.iter().sum()),
            mean,
            trips_counted: durations.len(),
        }
    }
}
