//! Closed sets of cities, months and days a session can be filtered by.
//!
//! Front ends normalize raw input with [`normalize`] (lowercase, spaces
//! removed) and parse it with `FromStr`. Anything outside the set is an
//! [`InvalidSelectionError`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InvalidSelectionError;

/// Month names that can be selected. Source data covers January to June.
pub const SELECTABLE_MONTHS: [&str; 6] = ["January", "February", "March", "April", "May", "June"];

pub const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Lowercases and strips spaces, so `"New York City"` becomes `"newyorkcity"`.
pub fn normalize(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

impl City {
    pub const ALL: [City; 3] = [City::Chicago, City::NewYorkCity, City::Washington];

    /// The normalized identifier used on the command line and in config files.
    pub fn id(&self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYorkCity => "newyorkcity",
            City::Washington => "washington",
        }
    }

    /// Default file name of the city's trip export.
    pub fn default_file_name(&self) -> &'static str {
        match self {
            City::Chicago => "chicago.csv",
            City::NewYorkCity => "new_york_city.csv",
            City::Washington => "washington.csv",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for City {
    type Err = InvalidSelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        City::ALL
            .into_iter()
            .find(|c| c.id() == s)
            .ok_or_else(|| InvalidSelectionError::City(s.to_string()))
    }
}

/// A month that can be selected. Source data covers January to June.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
}

impl Month {
    pub const ALL: [Month; 6] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
    ];

    /// Title-cased name, as derived from a trip's start time.
    pub fn name(&self) -> &'static str {
        SELECTABLE_MONTHS[*self as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    /// Title-cased name, as derived from a trip's start time.
    pub fn name(&self) -> &'static str {
        DAY_NAMES[*self as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum MonthFilter {
    #[default]
    All,
    Only(Month),
}

impl MonthFilter {
    pub fn matches(&self, month_name: &str) -> bool {
        match self {
            MonthFilter::All => true,
            MonthFilter::Only(month) => month.name() == month_name,
        }
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::All => f.write_str("all"),
            MonthFilter::Only(month) => f.write_str(month.name()),
        }
    }
}

impl FromStr for MonthFilter {
    type Err = InvalidSelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(MonthFilter::All);
        }
        Month::ALL
            .into_iter()
            .find(|m| m.name().to_lowercase() == s)
            .map(MonthFilter::Only)
            .ok_or_else(|| InvalidSelectionError::Month(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum DayFilter {
    #[default]
    All,
    Only(Day),
}

impl DayFilter {
    pub fn matches(&self, day_name: &str) -> bool {
        match self {
            DayFilter::All => true,
            DayFilter::Only(day) => day.name() == day_name,
        }
    }
}

impl fmt::Display for DayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayFilter::All => f.write_str("all"),
            DayFilter::Only(day) => f.write_str(day.name()),
        }
    }
}

impl FromStr for DayFilter {
    type Err = InvalidSelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(DayFilter::All);
        }
        Day::ALL
            .into_iter()
            .find(|d| d.name().to_lowercase() == s)
            .map(DayFilter::Only)
            .ok_or_else(|| InvalidSelectionError::Day(s.to_string()))
    }
}

/// A validated (city, month, day) triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub city: City,
    pub month: MonthFilter,
    pub day: DayFilter,
}

impl Selection {
    /// Normalizes and parses raw user input.
    pub fn parse(city: &str, month: &str, day: &str) -> Result<Self, InvalidSelectionError> {
        Ok(Selection {
            city: normalize(city).parse()?,
            month: normalize(month).parse()?,
            day: normalize(day).parse()?,
        })
    }
}
