//! # Extreme3D
//!
//! Print Logitech Extreme 3D Pro joystick state as JSON lines.
//!
//! The application opens the joystick, then either prints every pushed
//! snapshot (event mode) or polls at a fixed interval and prints changes
//! (poll mode).

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tokio::time::{interval, Duration};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use extreme3d_hid::config::{Config, LoggingConfig, PollConfig};
use extreme3d_hid::{ControlSnapshot, DeliveryMode, Joystick, Topic};

/// Configuration file used when no path is given
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// One printed output line
#[derive(Serialize)]
struct SnapshotRecord<'a> {
    timestamp: String,
    #[serde(flatten)]
    snapshot: &'a ControlSnapshot,
}

/// Render a snapshot as a timestamped JSON line
fn format_record(snapshot: &ControlSnapshot) -> serde_json::Result<String> {
    serde_json::to_string(&SnapshotRecord {
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        snapshot,
    })
}

fn print_snapshot(snapshot: &ControlSnapshot) {
    match format_record(snapshot) {
        Ok(line) => println!("{}", line),
        Err(e) => warn!("Failed to serialize snapshot: {}", e),
    }
}

/// Install the tracing subscriber, optionally writing to a log file
fn init_logging(logging: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&logging.level))
        .context("Invalid log filter")?;

    let (writer, guard) = if logging.file.is_empty() {
        (BoxMakeWriter::new(std::io::stderr), None)
    } else {
        let path = Path::new(&logging.file);
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let file_name = path
            .file_name()
            .with_context(|| format!("Log file path has no file name: {}", logging.file))?;
        let appender = tracing_appender::rolling::never(dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        (BoxMakeWriter::new(non_blocking), Some(guard))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .init();

    Ok(guard)
}

/// Print pushed snapshots until the stream ends or Ctrl+C
async fn run_events(joystick: &mut Joystick) {
    joystick.on(Topic::Data, print_snapshot);

    tokio::select! {
        delivered = joystick.run_events() => {
            warn!("Joystick event stream ended after {} snapshots", delivered);
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        }
    }
}

/// Poll at a fixed interval, printing changed snapshots, until Ctrl+C
async fn run_poll(joystick: &mut Joystick, poll: &PollConfig) {
    let mut ticker = interval(Duration::from_millis(poll.interval_ms));
    let mut last: Option<ControlSnapshot> = None;

    info!("Polling every {}ms (timeout {}ms)", poll.interval_ms, poll.timeout_ms);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                // Reads may block for up to timeout_ms
                let state = tokio::task::block_in_place(|| joystick.poll(poll.timeout_ms));
                if let Some(snapshot) = state {
                    if last != Some(snapshot) {
                        print_snapshot(&snapshot);
                        last = Some(snapshot);
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                break;
            }
        }
    }
}

/// Main entry point for Extreme3D
///
/// Usage: `extreme3d [CONFIG_PATH]`. When the configuration file does not
/// exist, built-in defaults are used.
///
/// # Errors
///
/// Returns error if the configuration is invalid or logging cannot be set up.
/// A missing joystick is logged and is not an error.
#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let config_found = Path::new(&config_path).exists();
    let config = if config_found {
        Config::load(&config_path)
            .with_context(|| format!("Failed to load configuration from {}", config_path))?
    } else {
        Config::default()
    };

    let _log_guard = init_logging(&config.logging)?;

    info!("Extreme3D v{} starting...", env!("CARGO_PKG_VERSION"));
    if !config_found {
        info!("No configuration at {}, using defaults", config_path);
    }

    let mut joystick = Joystick::open(&config.options())?;
    if !joystick.is_open() {
        warn!("No joystick available, exiting");
        return Ok(());
    }

    match joystick.mode() {
        DeliveryMode::Events => run_events(&mut joystick).await,
        DeliveryMode::Poll => run_poll(&mut joystick, &config.poll).await,
    }

    info!("Total reports processed: {}", joystick.reports_processed());
    joystick.close();

    Ok(())
}
