use std::path::PathBuf;

use bikeshare_stats::config::DataSourceConfig;
use bikeshare_stats::loader::RecordLoader;
use bikeshare_stats::selection::{City, DayFilter, MonthFilter, Selection};
use bikeshare_stats::session::Session;
use bikeshare_stats::stats::{BirthYearStats, NoDataReason, Stat};
use bikeshare_stats::table::OptionalField;
use bikeshare_stats::{DataSourceError, Error};

fn fixtures() -> DataSourceConfig {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
    DataSourceConfig::with_data_dir(dir).with_file(City::NewYorkCity, "new_york_city.csv.gz")
}

fn open(city: &str, month: &str, day: &str) -> Session {
    let config = fixtures();
    let loader = RecordLoader::new(&config);
    let selection = Selection::parse(city, month, day).expect("valid selection");
    Session::open(&loader, selection).expect("fixture loads")
}

#[test]
fn test_full_pipeline_chicago() {
    let session = open("chicago", "all", "all");
    let report = session.stats();

    assert_eq!(report.rows, 12);
    assert_eq!(report.temporal.most_common_month, Stat::Available("June"));
    assert_eq!(report.temporal.most_common_day, Stat::Available("Monday"));
    assert_eq!(report.temporal.most_common_hour, Stat::Available(9));

    // Wood St and Theater on the Lake tie at three; Wood St appears first.
    assert_eq!(
        report.station.most_common_start,
        Stat::Available("Wood St & Hubbard St".to_string())
    );
    assert_eq!(
        report.station.most_common_trip,
        Stat::Available("Wood St & Hubbard St -> Damen Ave & Chicago Ave".to_string())
    );

    assert_eq!(report.duration.total, Stat::Available(7077.0));
    assert_eq!(report.duration.mean, Stat::Available(589.75));

    let user_types = report.users.user_types.value().unwrap();
    assert_eq!(user_types[0].value, "Subscriber");
    assert_eq!(user_types[0].count, 10);
    assert_eq!(user_types[1].count, 2);

    let genders = report.users.genders.value().unwrap();
    assert_eq!((genders[0].value.as_str(), genders[0].count), ("Male", 7));
    assert_eq!((genders[1].value.as_str(), genders[1].count), ("Female", 3));

    assert_eq!(
        report.users.birth_years,
        Stat::Available(BirthYearStats {
            earliest: 1975,
            most_recent: 1992,
            most_common: 1992,
        })
    );
}

#[test]
fn test_month_and_day_filter() {
    let session = open("Chicago", "June", "Monday");
    let report = session.stats();

    assert_eq!(report.rows, 3);
    assert_eq!(report.temporal.most_common_month, Stat::Available("June"));
    assert_eq!(report.temporal.most_common_hour, Stat::Available(9));
    assert_eq!(report.duration.total, Stat::Available(2170.0));
    assert_eq!(
        report.station.most_common_start,
        Stat::Available("Clinton St & Washington Blvd".to_string())
    );
}

#[test]
fn test_washington_lacks_demographics() {
    let session = open("washington", "all", "all");
    let report = session.stats();

    assert_eq!(report.rows, 5);
    assert_eq!(
        report.users.genders,
        Stat::NoData(NoDataReason::ColumnAbsent(OptionalField::Gender))
    );
    assert_eq!(
        report.users.birth_years,
        Stat::NoData(NoDataReason::ColumnAbsent(OptionalField::BirthYear))
    );
    let total = *report.duration.total.value().unwrap();
    assert!((total - 4905.634).abs() < 1e-6);
}

#[test]
fn test_empty_selection_reports_no_data() {
    // The Washington fixture has no January trips.
    let session = open("washington", "january", "all");
    let report = session.stats();

    assert_eq!(report.rows, 0);
    assert!(report.temporal.most_common_month.is_no_data());
    assert_eq!(report.duration.total, Stat::Available(0.0));
    assert_eq!(
        report.duration.mean,
        Stat::NoData(NoDataReason::EmptySelection)
    );
    assert!(session.pager().advance().is_empty());
}

#[test]
fn test_gzip_source() {
    let session = open("new york city", "all", "all");
    assert_eq!(session.table().len(), 3);
    assert_eq!(session.stats().rows, 3);
}

#[test]
fn test_pager_over_twelve_rows() {
    let session = open("chicago", "all", "all");
    let mut pager = session.pager();

    let sizes: Vec<usize> = (0..4).map(|_| pager.advance().len()).collect();
    assert_eq!(sizes, vec![5, 5, 2, 0]);

    // A new pager for the same session starts over.
    assert_eq!(session.pager().advance().len(), 5);
}

#[test]
fn test_missing_source_is_an_error() {
    let config = DataSourceConfig::with_data_dir("/nonexistent/bikeshare");
    let loader = RecordLoader::new(&config);
    let selection = Selection {
        city: City::Chicago,
        month: MonthFilter::All,
        day: DayFilter::All,
    };

    let err = Session::open(&loader, selection).unwrap_err();
    assert!(matches!(err, Error::DataSource(DataSourceError::Open { .. })));
}

#[test]
fn test_invalid_selection_rejected() {
    assert!(Selection::parse("boston", "all", "all").is_err());
    assert!(Selection::parse("chicago", "december", "all").is_err());
    assert!(Selection::parse("chicago", "all", "someday").is_err());
}
