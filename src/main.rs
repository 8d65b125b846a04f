//! CLI entry point for the school bus tracker.
//!
//! Provides subcommands for serving the parent-facing API, polling a running
//! server for bus positions, and simulating a single bus position offline.

use anyhow::{Context, Result};
use bus_tracker::api;
use bus_tracker::directory::Directory;
use bus_tracker::fetch::BasicClient;
use bus_tracker::output::print_json;
use bus_tracker::service::QueryService;
use bus_tracker::tracker::{TrackOptions, TrackerClient, track};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bus_tracker")]
#[command(about = "Parent-facing school bus tracking backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        /// Address to listen on
        #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8001")]
        bind: String,

        /// JSON directory file (parents, children, buses); uses the demo data if unset
        #[arg(long, env = "DIRECTORY_PATH")]
        directory: Option<String>,
    },
    /// Log in to a running server and record each child's bus position to CSV
    Track {
        /// Server root URL
        #[arg(long, env = "TRACKER_URL", default_value = "http://localhost:8001")]
        base_url: String,

        /// Parent login email
        #[arg(long, env = "TRACKER_EMAIL")]
        email: String,

        /// Parent login password
        #[arg(long, env = "TRACKER_PASSWORD")]
        password: String,

        /// Sample rate: poll every X seconds
        #[arg(short = 'r', long, default_value_t = 10)]
        interval: u64,

        /// Number of samples to collect (0 = infinite)
        #[arg(short = 'n', long, default_value_t = 1)]
        num_samples: usize,

        /// CSV file to append positions to
        #[arg(short, long, default_value = "positions.csv")]
        output: String,
    },
    /// Simulate one bus position without a server
    Locate {
        /// Bus identifier, e.g. bus_001
        #[arg(value_name = "BUS_ID")]
        bus_id: String,

        /// Instant to simulate (RFC 3339); defaults to now
        #[arg(long)]
        at: Option<DateTime<Utc>>,

        /// JSON directory file; uses the demo data if unset
        #[arg(long, env = "DIRECTORY_PATH")]
        directory: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/bus_tracker.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bus_tracker.log"));

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

    match cli.command {
        Commands::Serve { bind, directory } => {
            let directory = load_directory(directory.as_deref())?;
            let service = Arc::new(QueryService::new(Arc::new(directory)));

            let listener = TcpListener::bind(&bind)
                .await
                .with_context(|| format!("failed to bind {bind}"))?;

            api::serve(listener, service, shutdown_signal()).await?;
        }
        Commands::Track {
            base_url,
            email,
            password,
            interval,
            num_samples,
            output,
        } => {
            let client = Arc::new(TrackerClient::new(BasicClient::new()?, &base_url));
            let options = TrackOptions {
                email,
                password,
                interval: Duration::from_secs(interval),
                num_samples,
                output,
            };

            tokio::select! {
                result = track(client, &options) => {
                    result?;
                }
                _ = shutdown_signal() => {}
            }
        }
        Commands::Locate {
            bus_id,
            at,
            directory,
        } => {
            let directory = load_directory(directory.as_deref())?;
            let service = QueryService::new(Arc::new(directory));
            let now = at.unwrap_or_else(Utc::now);

            let sample = service.vehicle_position_at(&bus_id, now)?;
            print_json(&sample)?;
        }
    }

    Ok(())
}

/// Loads the directory file at `path`, or the built-in demo data.
fn load_directory(path: Option<&str>) -> Result<Directory> {
    match path {
        Some(path) => Directory::load(path),
        None => {
            info!("No directory file configured, using demo data");
            Ok(Directory::demo()?)
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Ctrl-C received; shutting down...");
}
