//! CLI entry point for the OTP dashboard.
//!
//! Each subcommand corresponds to one dashboard view: the per-stop map table,
//! the monthly time series, and the single-route snapshot.

use anyhow::Result;
use clap::{Parser, Subcommand};
use otp_dashboard::{
    config::DashboardConfig,
    dataset::Datasets,
    fetch::BasicClient,
    model::DayType,
    output::{print_json, print_pretty, write_geo_view, write_time_series},
    pipeline::{
        GeoView,
        filter::{FilterSpec, Recency},
        snapshot::RouteSnapshot,
        timeseries::{Perspective, RouteSelection, distinct_values, time_series},
    },
};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "otp_dashboard")]
#[command(about = "Explore bus on-time performance by stop, month and route", long_about = None)]
struct Cli {
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<String>,

    /// URL or path of the OTP dataset (overrides config and OTP_SOURCE)
    #[arg(long, global = true)]
    otp_source: Option<String>,

    /// URL or path of the stop dataset (overrides config and STOPS_SOURCE)
    #[arg(long, global = true)]
    stops_source: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mean OTP per stop location, for the map view
    Geo {
        /// Day types to include (WEEKDAY, SAT., SUN.); none means all
        #[arg(short, long = "day-type", value_name = "DAY_TYPE")]
        day_types: Vec<DayType>,

        /// Garages to include; none means all configured garages
        #[arg(short, long = "garage", value_name = "GARAGE")]
        garages: Vec<String>,

        /// How recent the data must be: all, 9, 12 or 18 (months)
        #[arg(short, long, default_value = "all")]
        recency: Recency,

        /// CSV file to write the stop table to; garages go to a `_garages` sibling
        #[arg(short, long)]
        output: Option<String>,

        /// Log the stops and garages as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Monthly mean OTP per route, day type or garage
    TimeSeries {
        /// routes, day-types or garages
        #[arg(short, long, default_value = "routes")]
        perspective: Perspective,

        /// Routes to chart (1-5), used by the routes perspective
        #[arg(short, long = "route", value_name = "ROUTE")]
        routes: Vec<String>,

        /// CSV file to write the series to
        #[arg(short, long)]
        output: Option<String>,

        /// Log the table as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Compare one route's mean OTP to the system-wide mean
    Snapshot {
        #[arg(value_name = "ROUTE")]
        route: String,

        /// Log the snapshot as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// List the values available for a perspective
    ListValues {
        #[arg(short, long, default_value = "routes")]
        perspective: Perspective,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _file_guard = init_tracing()?;

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    let client = BasicClient::new()?;
    let datasets = Datasets::load(&client, &config).await?;

    match cli.command {
        Commands::Geo {
            day_types,
            garages,
            recency,
            output,
            json,
        } => {
            let today = chrono::Local::now().date_naive();
            let spec =
                FilterSpec::from_selection(&day_types, &garages, &config.garages, recency, today);
            info!(
                day_types = ?spec.day_types,
                garages = ?spec.garages,
                recency = %recency,
                "Computing geographic distribution"
            );

            let view = GeoView::compute(
                &datasets.otp,
                &datasets.stops,
                &spec,
                &config.garage_locations,
            );
            if view.stops.is_empty() {
                warn!("No data for the selected filters");
            } else {
                info!(
                    stops = view.stops.len(),
                    garages = view.garages.len(),
                    "Geographic view ready"
                );
            }

            print_pretty(&view);
            if json {
                print_json(&view)?;
            }
            if let Some(path) = output {
                let garages_path = write_geo_view(&path, &view)?;
                info!(path = %path, garages_path = %garages_path, "Geographic view written");
            }
        }
        Commands::TimeSeries {
            perspective,
            routes,
            output,
            json,
        } => {
            let values = match perspective {
                Perspective::Routes => match RouteSelection::new(routes) {
                    Ok(selection) => selection.routes().to_vec(),
                    Err(e) => {
                        warn!("{e}");
                        return Ok(());
                    }
                },
                _ => distinct_values(&datasets.otp, perspective),
            };

            info!(perspective = %perspective, values = ?values, "Computing time distribution");
            let table = time_series(&datasets.otp, perspective, &values);
            if table.is_empty() {
                warn!("No data for the selected values");
            } else {
                info!(months = table.months.len(), series = table.series.len(), "Time series ready");
            }

            print_pretty(&table);
            if json {
                print_json(&table)?;
            }
            if let Some(path) = output {
                write_time_series(&path, &table)?;
                info!(path = %path, "Time series written");
            }
        }
        Commands::Snapshot { route, json } => {
            let snapshot = match RouteSnapshot::compute(&datasets.otp, &route) {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    error!(route = %route, error = %e, "Route snapshot failed");
                    return Err(e.into());
                }
            };

            info!(
                route = %snapshot.route,
                on_time_percent = %format!("{:.1}%", snapshot.route_percent()),
                delta = %format!("{:+}%", snapshot.delta_percent),
                "Route snapshot"
            );
            if json {
                print_json(&snapshot)?;
            }
        }
        Commands::ListValues { perspective } => {
            let values = distinct_values(&datasets.otp, perspective);
            info!(perspective = %perspective, total = values.len(), "Available values");
            for value in &values {
                info!(value = %value, "Value");
            }
        }
    }

    Ok(())
}

/// Config file (or defaults), then environment, then CLI flags.
fn resolve_config(cli: &Cli) -> Result<DashboardConfig> {
    let mut config = match &cli.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    }
    .with_env_overrides();

    if let Some(source) = &cli.otp_source {
        config.otp_source = source.clone();
    }
    if let Some(source) = &cli.stops_source {
        config.stops_source = source.clone();
    }
    Ok(config)
}

/// Logging setup: colored stderr + JSON rolling log file.
fn init_tracing() -> Result<WorkerGuard> {
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/otp_dashboard.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("otp_dashboard.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

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

    Ok(file_guard)
}
