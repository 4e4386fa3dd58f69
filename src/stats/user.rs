//! User type and gender breakdowns plus birth year extremes.

use serde::Serialize;

use super::utility::{mode, value_counts};
use super::{Stat, column_stat};
use crate::filter::TripView;
use crate::table::OptionalField;

/// One entry of a frequency table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BirthYearStats {
    pub earliest: i32,
    pub most_recent: i32,
    pub most_common: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStats {
    /// Ordered by descending count.
    pub user_types: Stat<Vec<CategoryCount>>,
    /// Ordered by descending count.
    pub genders: Stat<Vec<CategoryCount>>,
    pub birth_years: Stat<BirthYearStats>,
}

impl UserStats {
    #[tracing::instrument(name = "user_stats", skip_all, fields(rows = view.len()))]
    pub fn from_view(view: &TripView<'_>) -> Self {
        let rows = view.rows();

        let user_types = column_stat(view, &[OptionalField::UserType], || {
            category_counts(rows.iter().filter_map(|r| r.record.user_type.as_deref()))
        });
        let genders = column_stat(view, &[OptionalField::Gender], || {
            category_counts(rows.iter().filter_map(|r| r.record.gender.as_deref()))
        });
        let birth_years = column_stat(view, &[OptionalField::BirthYear], || {
            let years: Vec<i32> = rows.iter().filter_map(|r| r.record.birth_year).collect();
            Some(BirthYearStats {
                earliest: *years.iter().min()?,
                most_recent: *years.iter().max()?,
                most_common: mode(years.iter().copied())?,
            })
        });

        UserStats {
            user_types,
            genders,
            birth_years,
        }
    }
}

/// `None` when there is nothing to count.
fn category_counts<'a>(values: impl Iterator<Item = &'a str>) -> Option<Vec<CategoryCount>> {
    let counts: Vec<CategoryCount> = value_counts(values)
        .into_iter()
        .map(|(value, count)| CategoryCount {
            value: value.to_string(),
            count,
        })
        .collect();
    (!counts.is_empty()).then_some(counts)
}
