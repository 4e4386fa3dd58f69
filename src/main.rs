//! CLI entry point for the bikeshare statistics tool.
//!
//! Provides subcommands for computing trip statistics for a city, paging
//! through the raw filtered trips, and listing the configured data sources.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bikeshare_stats::config::{DataSourceConfig, DisplayConfig};
use bikeshare_stats::loader::RecordLoader;
use bikeshare_stats::output::{
    SummaryRecord, append_summary, print_json, print_pretty, render_report, render_rows,
    render_sources,
};
use bikeshare_stats::selection::Selection;
use bikeshare_stats::session::Session;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare_stats")]
#[command(about = "Descriptive statistics over bike-share trip data", long_about = None)]
struct Cli {
    /// JSON file mapping cities to source files (defaults to BIKESHARE_DATA_DIR)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SelectionArgs {
    /// City to analyze: chicago, new york city or washington
    #[arg(short, long)]
    city: String,

    /// Month to filter by (january to june), or "all"
    #[arg(short, long, default_value = "all")]
    month: String,

    /// Day of week to filter by, or "all"
    #[arg(short, long, default_value = "all")]
    day: String,
}

impl SelectionArgs {
    fn to_selection(&self) -> Result<Selection> {
        Ok(Selection::parse(&self.city, &self.month, &self.day)?)
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute time, station, duration and user statistics
    Stats {
        #[command(flatten)]
        selection: SelectionArgs,

        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// CSV file to append a one-line summary to
        #[arg(long, value_name = "FILE")]
        append_csv: Option<String>,
    },
    /// Show raw filtered trips, five rows per page
    Raw {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Number of pages to show
        #[arg(short, long, default_value_t = 1)]
        pages: usize,

        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// List configured cities and their source files
    Cities,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/bikeshare_stats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let sources = match &cli.config {
        Some(path) => DataSourceConfig::load(path)?,
        None => DataSourceConfig::from_env(),
    };
    let display = DisplayConfig::default();

    match cli.command {
        Commands::Stats {
            selection,
            format,
            append_csv,
        } => {
            let selection = selection.to_selection()?;
            let session = open_session(&sources, selection)?;
            let report = session.stats();
            print_pretty(&report);

            match format {
                Format::Text => print!("{}", render_report(&selection, &report, &display)),
                Format::Json => print_json(&report)?,
            }

            if let Some(path) = append_csv {
                append_summary(&path, &SummaryRecord::new(&selection, &report))
                    .with_context(|| format!("failed to append summary to '{path}'"))?;
                info!(path = %path, "Summary appended");
            }
        }
        Commands::Raw {
            selection,
            pages,
            format,
        } => {
            let selection = selection.to_selection()?;
            let session = open_session(&sources, selection)?;
            let mut pager = session.pager();

            for rows in pager.pages(pages) {
                match format {
                    Format::Text => print!("{}", render_rows(&rows, &display)),
                    Format::Json => print_json(&rows)?,
                }
            }
        }
        Commands::Cities => {
            let statuses = sources.sources();
            for missing in statuses.iter().filter(|s| !s.exists) {
                warn!(city = %missing.city, path = %missing.path.display(), "Source file not found");
            }
            print!("{}", render_sources(&statuses));
        }
    }

    Ok(())
}

/// Loads the selected city and wraps it in a fresh session.
fn open_session(sources: &DataSourceConfig, selection: Selection) -> Result<Session> {
    let loader = RecordLoader::new(sources);
    Session::open(&loader, selection)
        .with_context(|| format!("failed to load trips for {}", selection.city))
}
