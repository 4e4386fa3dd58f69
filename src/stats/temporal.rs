//! Most frequent month, day of week and start hour.

use serde::Serialize;

use super::utility::mode;
use super::{Stat, column_stat};
use crate::filter::TripView;

/// Derived columns are always present, so these only go without a value on an
/// empty view. Month and day are computed even when the view was already
/// filtered down to a single month or day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemporalStats {
    pub most_common_month: Stat<&'static str>,
    pub most_common_day: Stat<&'static str>,
    pub most_common_hour: Stat<u32>,
}

impl TemporalStats {
    #[tracing::instrument(name = "temporal_stats", skip_all, fields(rows = view.len()))]
    pub fn from_view(view: &TripView<'_>) -> Self {
        let rows = view.rows();
        TemporalStats {
            most_common_month: column_stat(view, &[], || mode(rows.iter().map(|r| r.month_name()))),
            most_common_day: column_stat(view, &[], || {
                mode(rows.iter().map(|r| r.day_of_week_name()))
            }),
            most_common_hour: column_stat(view, &[], || mode(rows.iter().map(|r| r.hour()))),
        }
    }
}
