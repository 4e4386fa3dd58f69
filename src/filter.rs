//! Month and day-of-week filtering over a derived table.

use crate::derive::{DerivedTable, DerivedTripRecord};
use crate::selection::{DayFilter, MonthFilter};
use crate::table::Schema;

/// Borrowed subset of a [`DerivedTable`], in the table's original row order.
#[derive(Debug, Clone, PartialEq)]
pub struct TripView<'a> {
    schema: &'a Schema,
    rows: Vec<&'a DerivedTripRecord>,
}

impl<'a> TripView<'a> {
    /// Every row of `table`.
    pub fn all(table: &'a DerivedTable) -> Self {
        Self {
            schema: &table.schema,
            rows: table.rows.iter().collect(),
        }
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    pub fn rows(&self) -> &[&'a DerivedTripRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Narrows this view further. Both conditions must hold for a row to stay.
    pub fn refine(&self, month: MonthFilter, day: DayFilter) -> Self {
        Self {
            schema: self.schema,
            rows: self
                .rows
                .iter()
                .copied()
                .filter(|r| month.matches(r.month_name()) && day.matches(r.day_of_week_name()))
                .collect(),
        }
    }
}

/// Rows of `table` matching `month` and `day`. An empty view is a valid result.
pub fn filter(table: &DerivedTable, month: MonthFilter, day: DayFilter) -> TripView<'_> {
    TripView::all(table).refine(month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::derive;
    use crate::loader::read_trips;
    use crate::selection::{Day, Month};

    fn sample_table() -> DerivedTable {
        let data = "\
Start Time,Trip Duration
2017-01-02 08:00:00,10
2017-01-03 09:00:00,20
2017-06-05 10:00:00,30
2017-06-06 11:00:00,40
2017-06-12 12:00:00,50
";
        derive(read_trips(data.as_bytes(), "sample").unwrap())
    }

    #[test]
    fn test_all_is_noop() {
        let table = sample_table();
        let view = filter(&table, MonthFilter::All, DayFilter::All);
        assert_eq!(view, TripView::all(&table));
        assert_eq!(view.len(), 5);
    }

    #[test]
    fn test_month_filter_keeps_only_that_month() {
        let table = sample_table();
        let view = filter(&table, MonthFilter::Only(Month::June), DayFilter::All);
        assert_eq!(view.len(), 3);
        assert!(view.rows().iter().all(|r| r.month_name() == "June"));
    }

    #[test]
    fn test_filters_compose_by_conjunction() {
        let table = sample_table();
        let view = filter(&table, MonthFilter::Only(Month::June), DayFilter::Only(Day::Monday));
        let durations: Vec<_> = view
            .rows()
            .iter()
            .map(|r| r.record.trip_duration)
            .collect();
        assert_eq!(durations, vec![Some(30.0), Some(50.0)]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let table = sample_table();
        for (month, day) in [
            (MonthFilter::All, DayFilter::All),
            (MonthFilter::Only(Month::January), DayFilter::All),
            (MonthFilter::All, DayFilter::Only(Day::Tuesday)),
            (MonthFilter::Only(Month::June), DayFilter::Only(Day::Monday)),
            (MonthFilter::Only(Month::March), DayFilter::Only(Day::Sunday)),
        ] {
            let once = filter(&table, month, day);
            assert_eq!(once.refine(month, day), once);
        }
    }

    #[test]
    fn test_empty_result_is_not_an_error() {
        let table = sample_table();
        let view = filter(&table, MonthFilter::Only(Month::April), DayFilter::All);
        assert!(view.is_empty());
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn test_parsed_filters_select_rows() {
        let table = sample_table();
        let month: MonthFilter = "june".parse().unwrap();
        let day: DayFilter = "monday".parse().unwrap();
        assert_eq!(month, MonthFilter::Only(Month::June));
        assert_eq!(filter(&table, month, day).len(), 2);

        // Anything outside the closed sets never becomes a filter.
        assert!("july".parse::<MonthFilter>().is_err());
        assert!("Juneteenth".parse::<MonthFilter>().is_err());
        assert!("mon".parse::<DayFilter>().is_err());
    }
}
