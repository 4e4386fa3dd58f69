//! One filter session: load, derive, then filter and aggregate on demand.
//!
//! A restart is a new [`Session`]; nothing carries over from the previous one.

use tracing::info;

use crate::derive::{DerivedTable, derive};
use crate::error::Result;
use crate::filter::{TripView, filter};
use crate::loader::RecordLoader;
use crate::pager::RawDataPager;
use crate::selection::Selection;
use crate::stats::StatsReport;

#[derive(Debug)]
pub struct Session {
    selection: Selection,
    table: DerivedTable,
}

impl Session {
    /// Loads and derives the selected city's trips.
    #[tracing::instrument(skip(loader), fields(city = %selection.city, month = %selection.month, day = %selection.day))]
    pub fn open(loader: &RecordLoader<'_>, selection: Selection) -> Result<Self> {
        let table = derive(loader.load(selection.city)?);
        let session = Self::from_table(selection, table);
        info!(
            total = session.table.len(),
            selected = session.view().len(),
            "Session opened"
        );
        Ok(session)
    }

    /// Wraps an already derived table.
    pub fn from_table(selection: Selection, table: DerivedTable) -> Self {
        Self { selection, table }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn table(&self) -> &DerivedTable {
        &self.table
    }

    /// The rows matching the session's month and day.
    pub fn view(&self) -> TripView<'_> {
        filter(&self.table, self.selection.month, self.selection.day)
    }

    pub fn stats(&self) -> StatsReport {
        StatsReport::compute(&self.view())
    }

    /// A fresh pager at offset 0.
    pub fn pager(&self) -> RawDataPager<'_> {
        RawDataPager::new(self.view())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::{City, Day, DayFilter, Month, MonthFilter};
    use crate::stats::Stat;
    use crate::stats::test_support::table;

    fn session(month: MonthFilter, day: DayFilter) -> Session {
        let table = table(
            "\
Start Time,Trip Duration
2017-01-02 08:00:00,60
2017-02-06 08:00:00,120
2017-02-07 09:00:00,180
",
        );
        Session::from_table(
            Selection {
                city: City::Chicago,
                month,
                day,
            },
            table,
        )
    }

    #[test]
    fn test_view_applies_selection() {
        let s = session(MonthFilter::Only(Month::February), DayFilter::All);
        assert_eq!(s.view().len(), 2);
        assert_eq!(s.table().len(), 3);
    }

    #[test]
    fn test_stats_cover_view_only() {
        let s = session(MonthFilter::All, DayFilter::Only(Day::Monday));
        let report = s.stats();
        assert_eq!(report.rows, 2);
        assert_eq!(report.duration.total, Stat::Available(180.0));
    }

    #[test]
    fn test_each_pager_starts_at_zero() {
        let s = session(MonthFilter::All, DayFilter::All);
        let mut first = s.pager();
        assert_eq!(first.advance().len(), 3);
        assert!(first.advance().is_empty());

        let mut second = s.pager();
        assert_eq!(second.offset(), 0);
        assert_eq!(second.advance().len(), 3);
    }
}
