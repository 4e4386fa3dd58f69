//! Output formatting and persistence for trip statistics.
//!
//! Supports a boxed text layout, JSON serialization, and CSV append of a
//! flat per-session summary.

use std::fs::OpenOptions;
use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use tracing::debug;

use crate::config::{DisplayConfig, SourceStatus};
use crate::pager::{CellValue, RowSnapshot};
use crate::selection::Selection;
use crate::stats::{CategoryCount, NoDataReason, Stat, StatsReport};

/// Logs a report using Rust's debug pretty-print format.
pub fn print_pretty(report: &StatsReport) {
    debug!("{:#?}", report);
}

/// Writes any serializable value to stdout as pretty-printed JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Renders all four statistic groups as boxed text.
pub fn render_report(selection: &Selection, report: &StatsReport, display: &DisplayConfig) -> String {
    let rule = "―".repeat(display.rule_width);
    let mut out = String::new();

    let mut section = |title: &str, lines: Vec<String>| {
        out.push_str(&format!("{rule}\n｜ {title}\n{rule}\n"));
        for line in lines {
            out.push_str(&format!("｜   {line}\n"));
        }
        out.push_str(&format!("{rule}\n\n"));
    };

    section(
        &format!(
            "Bikeshare statistics for {} (month: {}, day: {})",
            selection.city, selection.month, selection.day
        ),
        vec![format!("Trips selected: {}", report.rows)],
    );

    let t = &report.temporal;
    section(
        "The most frequent times of travel",
        vec![
            format!("Common month: {}", show(&t.most_common_month)),
            format!("Common day of week: {}", show(&t.most_common_day)),
            format!("Common starting hour: {}", show(&t.most_common_hour)),
        ],
    );

    let s = &report.station;
    section(
        "The most popular stations and trip",
        vec![
            format!("Common start station: {}", show(&s.most_common_start)),
            format!("Common end station: {}", show(&s.most_common_end)),
            format!("Common trip: {}", show(&s.most_common_trip)),
        ],
    );

    let d = &report.duration;
    section(
        "Total and average trip duration",
        vec![
            format!(
                "Total travel time: {}",
                show(&d.total.clone().map(humanize_seconds))
            ),
            format!(
                "Average travel time: {}",
                show(&d.mean.clone().map(humanize_seconds))
            ),
        ],
    );

    let u = &report.users;
    let mut user_lines = Vec::new();
    push_counts(&mut user_lines, "User types", &u.user_types);
    push_counts(&mut user_lines, "Genders", &u.genders);
    match &u.birth_years {
        Stat::Available(b) => {
            user_lines.push(format!("Earliest year of birth: {}", b.earliest));
            user_lines.push(format!("Most recent year of birth: {}", b.most_recent));
            user_lines.push(format!("Common year of birth: {}", b.most_common));
        }
        Stat::NoData(reason) => {
            user_lines.push(format!("Year of birth: {}", describe(reason)));
        }
    }
    section("Statistics on bikeshare users", user_lines);

    out
}

fn push_counts(lines: &mut Vec<String>, label: &str, counts: &Stat<Vec<CategoryCount>>) {
    match counts {
        Stat::Available(counts) => {
            lines.push(format!("{label}:"));
            for c in counts {
                lines.push(format!("  {:<20} {}", c.value, c.count));
            }
        }
        Stat::NoData(reason) => lines.push(format!("{label}: {}", describe(reason))),
    }
}

fn show<T: std::fmt::Display>(stat: &Stat<T>) -> String {
    match stat {
        Stat::Available(v) => v.to_string(),
        Stat::NoData(reason) => describe(reason),
    }
}

fn describe(reason: &NoDataReason) -> String {
    match reason {
        NoDataReason::EmptySelection => "no data (no trips match the selection)".to_string(),
        NoDataReason::ColumnAbsent(field) => {
            format!("not available ({} is not recorded for this city)", field.column_name())
        }
        NoDataReason::AllMissing => "no data (all values blank)".to_string(),
    }
}

/// `3725.5` becomes `"3725.5 s (1h 2m 5s)"`.
pub fn humanize_seconds(seconds: f64) -> String {
    let whole = seconds.round() as u64;
    let (h, m, s) = (whole / 3600, (whole % 3600) / 60, whole % 60);
    format!("{seconds} s ({h}h {m}m {s}s)")
}

/// Renders a window of raw rows, one `column: value` block per row.
pub fn render_rows(rows: &[RowSnapshot], display: &DisplayConfig) -> String {
    let rule = "―".repeat(display.rule_width);
    let mut out = String::new();

    for row in rows {
        for (name, value) in row.cells() {
            let text = match value {
                CellValue::Text(s) => s.clone(),
                CellValue::Integer(i) => i.to_string(),
                CellValue::Float(f) => f.to_string(),
                CellValue::Timestamp(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
                CellValue::Unset => display.unset_placeholder.clone(),
            };
            let text: String = text.chars().take(display.max_cell_width).collect();
            out.push_str(&format!("{name:>14}: {text}\n"));
        }
        out.push_str(&format!("{rule}\n"));
    }

    out
}

/// One line per configured city: id, resolved path, and a marker when the
/// file is missing.
pub fn render_sources(sources: &[SourceStatus]) -> String {
    let mut out = String::new();
    for source in sources {
        let marker = if source.exists { "" } else { "  (missing)" };
        out.push_str(&format!(
            "{:<12} {}{marker}\n",
            source.city.id(),
            source.path.display()
        ));
    }
    out
}

/// One flattened CSV row summarizing a session's statistics.
#[derive(Debug, Serialize)]
pub struct SummaryRecord {
    pub generated_at: DateTime<Utc>,
    pub city: String,
    pub month: String,
    pub day: String,
    pub rows: usize,
    pub most_common_month: Option<String>,
    pub most_common_day: Option<String>,
    pub most_common_hour: Option<u32>,
    pub most_common_start_station: Option<String>,
    pub most_common_end_station: Option<String>,
    pub most_common_trip: Option<String>,
    pub total_duration: Option<f64>,
    pub mean_duration: Option<f64>,
    pub top_user_type: Option<String>,
    pub top_gender: Option<String>,
    pub earliest_birth_year: Option<i32>,
    pub most_recent_birth_year: Option<i32>,
    pub most_common_birth_year: Option<i32>,
}

impl SummaryRecord {
    pub fn new(selection: &Selection, report: &StatsReport) -> Self {
        let top = |counts: &Stat<Vec<CategoryCount>>| {
            counts.value().and_then(|c| c.first()).map(|c| c.value.clone())
        };
        let birth = report.users.birth_years.value();

        SummaryRecord {
            generated_at: Utc::now(),
            city: selection.city.to_string(),
            month: selection.month.to_string(),
            day: selection.day.to_string(),
            rows: report.rows,
            most_common_month: report.temporal.most_common_month.value().map(|m| m.to_string()),
            most_common_day: report.temporal.most_common_day.value().map(|d| d.to_string()),
            most_common_hour: report.temporal.most_common_hour.value().copied(),
            most_common_start_station: report.station.most_common_start.value().cloned(),
            most_common_end_station: report.station.most_common_end.value().cloned(),
            most_common_trip: report.station.most_common_trip.value().cloned(),
            total_duration: report.duration.total.value().copied(),
            mean_duration: report.duration.mean.value().copied(),
            top_user_type: top(&report.users.user_types),
            top_gender: top(&report.users.genders),
            earliest_birth_year: birth.map(|b| b.earliest),
            most_recent_birth_year: birth.map(|b| b.most_recent),
            most_common_birth_year: birth.map(|b| b.most_common),
        }
    }
}

/// Appends a [`SummaryRecord`] as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_summary(path: &str, summary: &SummaryRecord) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV summary");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // header only on the first write
        .from_writer(file);

    writer.serialize(summary)?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{TripView, filter};
    use crate::pager::RawDataPager;
    use crate::selection::{City, DayFilter, Month, MonthFilter};
    use crate::stats::test_support::table;
    use std::env;
    use std::fs;

    const TRIPS: &str = "\
Start Time,Trip Duration,Start Station,End Station,User Type
2017-06-21 08:36:34,489,A,B,Subscriber
2017-06-22 08:10:00,,A,C,Customer
";

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn selection() -> Selection {
        Selection {
            city: City::Washington,
            month: MonthFilter::All,
            day: DayFilter::All,
        }
    }

    #[test]
    fn test_render_report_marks_absent_columns() {
        let table = table(TRIPS);
        let report = StatsReport::compute(&TripView::all(&table));
        let text = render_report(&selection(), &report, &DisplayConfig::default());

        assert!(text.contains("Common start station: A"));
        assert!(text.contains("Common starting hour: 8"));
        assert!(text.contains("Gender is not recorded for this city"));
        assert!(text.contains("Birth Year is not recorded for this city"));
    }

    #[test]
    fn test_render_report_empty_selection() {
        let table = table(TRIPS);
        let view = filter(&table, MonthFilter::Only(Month::January), DayFilter::All);
        let report = StatsReport::compute(&view);
        let text = render_report(&selection(), &report, &DisplayConfig::default());

        assert!(text.contains("Trips selected: 0"));
        assert!(text.contains("Total travel time: 0 s (0h 0m 0s)"));
        assert!(text.contains("Average travel time: no data"));
    }

    #[test]
    fn test_render_report_section_layout() {
        let table = table(TRIPS);
        let report = StatsReport::compute(&TripView::all(&table));
        let display = DisplayConfig {
            rule_width: 3,
            ..DisplayConfig::default()
        };
        let text = render_report(&selection(), &report, &display);

        assert!(text.starts_with(
            "―――\n｜ Bikeshare statistics for washington (month: all, day: all)\n―――\n｜   Trips selected: 2\n―――\n\n"
        ));
        assert!(text.ends_with("―――\n\n"));
    }

    #[test]
    fn test_humanize_seconds() {
        assert_eq!(humanize_seconds(3725.0), "3725 s (1h 2m 5s)");
        assert_eq!(humanize_seconds(59.5), "59.5 s (0h 1m 0s)");
    }

    #[test]
    fn test_render_rows_uses_placeholder() {
        let table = table(TRIPS);
        let mut pager = RawDataPager::new(TripView::all(&table));
        let display = DisplayConfig {
            unset_placeholder: "<unset>".to_string(),
            ..DisplayConfig::default()
        };
        let text = render_rows(&pager.advance(), &display);

        assert!(text.contains("Trip Duration: 489"));
        assert!(text.contains("Trip Duration: <unset>"));
    }

    #[test]
    fn test_render_sources_marks_missing() {
        let sources = [
            SourceStatus {
                city: City::Chicago,
                path: "/data/chicago.csv".into(),
                exists: true,
            },
            SourceStatus {
                city: City::Washington,
                path: "/data/washington.csv".into(),
                exists: false,
            },
        ];
        assert_eq!(
            render_sources(&sources),
            "chicago      /data/chicago.csv\nwashington   /data/washington.csv  (missing)\n"
        );
    }

    #[test]
    fn test_print_json_does_not_panic() {
        let table = table(TRIPS);
        let report = StatsReport::compute(&TripView::all(&table));
        print_json(&report).unwrap();
        print_pretty(&report);
    }

    #[test]
    fn test_append_summary_writes_header_once() {
        let path = temp_path("bikeshare_stats_test_summary.csv");
        let _ = fs::remove_file(&path); // clean up any prior run

        let table = table(TRIPS);
        let report = StatsReport::compute(&TripView::all(&table));
        let summary = SummaryRecord::new(&selection(), &report);
        append_summary(&path, &summary).unwrap();
        append_summary(&path, &summary).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("generated_at,city,month,day,rows"));
        assert!(lines[1].contains(",washington,all,all,2,"));

        fs::remove_file(&path).unwrap();
    }
}
