//! CLI entry point for the Campus Pulse satisfaction analytics tool.
//!
//! Each subcommand loads the rating table once, computes one summary and
//! prints it as a JSON envelope on stdout.

use anyhow::Result;
use campus_pulse::analyzers::aggregate::{
    facility_metrics, major_metrics, overall_metrics, time_metrics, year_metrics,
};
use campus_pulse::analyzers::dashboard::{dashboard_summary, filtered_dashboard_summary};
use campus_pulse::analyzers::insights::{correlation_analysis, insights, trend_analysis};
use campus_pulse::config::Config;
use campus_pulse::output::{Envelope, print_json, print_pretty, write_ratings};
use campus_pulse::source::load;
use campus_pulse::table::FilterCriteria;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "campus_pulse")]
#[command(about = "Descriptive statistics and insights over student satisfaction ratings", long_about = None)]
struct Cli {
    /// CSV file to load ratings from (overrides DATA_FILE_PATH)
    #[arg(short, long, global = true)]
    data: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Facility name (case-insensitive exact match)
    #[arg(long)]
    facility: Option<String>,

    /// Academic year label, e.g. "2022-2023"
    #[arg(long)]
    year: Option<String>,

    /// Major name (case-insensitive exact match)
    #[arg(long)]
    major: Option<String>,

    /// Inclusive score range as "min-max"; ignored if malformed
    #[arg(long)]
    score_range: Option<String>,
}

impl From<FilterArgs> for FilterCriteria {
    fn from(args: FilterArgs) -> Self {
        FilterCriteria {
            facility: args.facility,
            year: args.year,
            major: args.major,
            score_range: args.score_range,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Column {
    Facility,
    Year,
    Major,
}

#[derive(Subcommand)]
enum Commands {
    /// Whole-table statistics
    Overall,
    /// Per-facility statistics ranked by average score
    Facilities,
    /// Per-academic-year statistics
    Years,
    /// Statistics for the ten most-rated majors
    Majors,
    /// Statistics per time-of-day bucket
    Time,
    /// Monthly average score series
    Trends,
    /// Narrative insights
    Insights,
    /// Pairwise correlation of numeric columns
    Correlations,
    /// List rows matching the filters
    Filter {
        #[command(flatten)]
        filters: FilterArgs,

        /// Also write the matching rows to this CSV file
        #[arg(short, long)]
        export: Option<String>,
    },
    /// Complete dashboard summary, optionally filtered
    Dashboard {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Sorted distinct values of a column
    Distinct {
        #[arg(value_enum)]
        column: Column,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let config = Config::from_env();

    // Logging setup: colored stderr + JSON rolling log file
    let log_dir = Path::new(&config.log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&config.log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("campus_pulse.log"));

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
    let data_path = cli.data.unwrap_or(config.data_file_path);

    let outcome = load(&data_path);
    if outcome.is_synthesized() {
        warn!(path = %data_path, "Serving synthetic sample data");
    }
    let table = outcome.into_table();

    match cli.command {
        Commands::Overall => {
            print_json(&Envelope::ok(overall_metrics(&table)).with_timestamp())?;
        }
        Commands::Facilities => {
            let facilities = facility_metrics(&table);
            let count = facilities.len();
            print_json(&Envelope::ok(facilities).with_count(count))?;
        }
        Commands::Years => {
            let years = year_metrics(&table);
            let count = years.len();
            print_json(&Envelope::ok(years).with_count(count))?;
        }
        Commands::Majors => {
            let majors = major_metrics(&table);
            let count = majors.len();
            print_json(&Envelope::ok(majors).with_count(count))?;
        }
        Commands::Time => {
            print_json(&Envelope::ok(time_metrics(&table)))?;
        }
        Commands::Trends => {
            print_json(&Envelope::ok(trend_analysis(&table)))?;
        }
        Commands::Insights => {
            let found = insights(&table);
            let count = found.len();
            print_json(&Envelope::ok(found).with_count(count))?;
        }
        Commands::Correlations => {
            print_json(&Envelope::ok(correlation_analysis(&table)))?;
        }
        Commands::Filter { filters, export } => {
            let criteria = FilterCriteria::from(filters);
            let filtered = table.filter(&criteria);
            info!(rows = filtered.len(), "Filter applied");

            if let Some(path) = export {
                write_ratings(&path, filtered.rows())?;
            }

            let envelope = Envelope::ok(filtered.rows())
                .with_count(filtered.len())
                .with_filters(criteria);
            print_json(&envelope)?;
        }
        Commands::Dashboard { filters } => {
            let criteria = FilterCriteria::from(filters);
            let summary = if criteria == FilterCriteria::default() {
                dashboard_summary(&table)
            } else {
                filtered_dashboard_summary(&table, &criteria, config.filtered_insight_min_rows)
            };
            print_pretty(&summary);
            print_json(&Envelope::ok(summary))?;
        }
        Commands::Distinct { column } => {
            let values = match column {
                Column::Facility => table.distinct_facilities(),
                Column::Year => table.distinct_years(),
                Column::Major => table.distinct_majors(),
            };
            let count = values.len();
            print_json(&Envelope::ok(values).with_count(count))?;
        }
    }

    Ok(())
}
