//! Descriptive statistics over a filtered trip view.
//!
//! Four independent groups (temporal, station, duration, user) each read the
//! same immutable [`TripView`]. A group whose column is missing from the
//! city's schema, or that has no rows to work on, reports
//! [`Stat::NoData`] instead of failing.

pub mod duration;
pub mod station;
pub mod temporal;
pub mod user;
pub mod utility;

use serde::Serialize;

use crate::filter::TripView;
use crate::table::OptionalField;

pub use duration::DurationStats;
pub use station::StationStats;
pub use temporal::TemporalStats;
pub use user::{BirthYearStats, CategoryCount, UserStats};

/// Why a statistic has no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoDataReason {
    /// The filtered view has zero rows.
    EmptySelection,
    /// The city's source does not carry this column.
    ColumnAbsent(OptionalField),
    /// Rows exist but every value in the column is blank.
    AllMissing,
}

/// A single statistic: either a value or an explicit no-data outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat<T> {
    Available(T),
    NoData(NoDataReason),
}

impl<T> Stat<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Stat::Available(v) => Some(v),
            Stat::NoData(_) => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Stat::Available(v) => Some(v),
            Stat::NoData(_) => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Stat::NoData(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Stat<U> {
        match self {
            Stat::Available(v) => Stat::Available(f(v)),
            Stat::NoData(reason) => Stat::NoData(reason),
        }
    }
}

/// The first of `fields` missing from the view's schema, if any.
pub(crate) fn absent_column(view: &TripView<'_>, fields: &[OptionalField]) -> Option<OptionalField> {
    fields.iter().copied().find(|f| !view.schema().has(*f))
}

/// Runs `compute` only when every column in `fields` exists and the view has
/// rows. A `None` from `compute` means every value was blank.
pub(crate) fn column_stat<T>(
    view: &TripView<'_>,
    fields: &[OptionalField],
    compute: impl FnOnce() -> Option<T>,
) -> Stat<T> {
    if let Some(field) = absent_column(view, fields) {
        return Stat::NoData(NoDataReason::ColumnAbsent(field));
    }
    if view.is_empty() {
        return Stat::NoData(NoDataReason::EmptySelection);
    }
    match compute() {
        Some(v) => Stat::Available(v),
        None => Stat::NoData(NoDataReason::AllMissing),
    }
}

/// All four statistic groups for one view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsReport {
    pub rows: usize,
    pub temporal: TemporalStats,
    pub station: StationStats,
    pub duration: DurationStats,
    pub users: UserStats,
}

impl StatsReport {
    #[tracing::instrument(skip_all, fields(rows = view.len()))]
    pub fn compute(view: &TripView<'_>) -> Self {
        StatsReport {
            rows: view.len(),
            temporal: TemporalStats::from_view(view),
            station: StationStats::from_view(view),
            duration: DurationStats::from_view(view),
            users: UserStats::from_view(view),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::table;
    use super::*;
    use crate::filter::filter;
    use crate::selection::{DayFilter, Month, MonthFilter};

    const WASHINGTON_LIKE: &str = "\
Start Time,Trip Duration,Start Station,End Station,User Type
2017-06-21 08:36:34,489.066,14th & Belmont St NW,15th & K St NW,Subscriber
2017-03-11 10:40:00,402.549,Yuma St & Tenley Circle NW,Connecticut Ave & Yuma St NW,Subscriber
2017-05-30 01:02:59,637.251,17th St & Massachusetts Ave NW,5th & K St NW,Customer
";

    #[test]
    fn test_report_without_demographic_columns() {
        let table = table(WASHINGTON_LIKE);
        let report = StatsReport::compute(&TripView::all(&table));

        assert_eq!(report.rows, 3);
        assert!(report.users.user_types.value().is_some());
        assert_eq!(
            report.users.genders,
            Stat::NoData(NoDataReason::ColumnAbsent(OptionalField::Gender))
        );
        assert_eq!(
            report.users.birth_years,
            Stat::NoData(NoDataReason::ColumnAbsent(OptionalField::BirthYear))
        );
    }

    #[test]
    fn test_report_on_empty_selection() {
        let table = table(WASHINGTON_LIKE);
        let view = filter(&table, MonthFilter::Only(Month::January), DayFilter::All);
        let report = StatsReport::compute(&view);

        assert_eq!(report.rows, 0);
        assert_eq!(
            report.temporal.most_common_hour,
            Stat::NoData(NoDataReason::EmptySelection)
        );
        assert_eq!(report.duration.total, Stat::Available(0.0));
        assert!(report.duration.mean.is_no_data());
        assert!(report.station.most_common_trip.is_no_data());
    }

    #[test]
    fn test_stat_serializes_reason() {
        let stat: Stat<u32> = Stat::NoData(NoDataReason::ColumnAbsent(OptionalField::Gender));
        assert_eq!(
            serde_json::to_string(&stat).unwrap(),
            r#"{"no_data":{"column_absent":"Gender"}}"#
        );
        assert_eq!(
            serde_json::to_string(&Stat::Available(5)).unwrap(),
            r#"{"available":5}"#
        );
    }
}
