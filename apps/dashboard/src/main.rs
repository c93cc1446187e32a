mod config;
mod driver;
mod monitoring;
mod notify;
mod reconcile;
mod store;
mod tui;
mod validation;

use anyhow::{Context, Result};
use clap::Parser;
use logger::LogSink;
use std::path::PathBuf;

use crate::config::{Config, Persistence};
use crate::driver::{Driver, TickReport};
use crate::monitoring::ProbeExecutor;
use crate::notify::DesktopNotifier;
use crate::tui::TerminalPresenter;

/// Terminal dashboard and status logger for a fixed set of endpoints
#[derive(Debug, Parser)]
#[command(name = "epoch-dashboard", version, about)]
struct Cli {
    /// Run one check pass, write the status log and exit
    #[arg(long)]
    once: bool,

    /// Status log file (overrides the configured one)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file (defaults to $XDG_CONFIG_HOME/epoch-dashboard/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// How the status log is written
    #[arg(long, value_enum)]
    persistence: Option<Persistence>,

    /// Seconds between refreshes
    #[arg(long)]
    interval: Option<u64>,

    /// Per-probe timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Do not send desktop notifications
    #[arg(long)]
    no_notify: bool,

    /// Write diagnostic logs to this file while the dashboard is on screen
    #[arg(long)]
    trace_log: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    fn log_sink(&self) -> LogSink {
        if self.once || self.print_config {
            return LogSink::Stderr;
        }
        self.trace_log.clone().map_or(LogSink::Discard, LogSink::File)
    }

    /// Command line flags win over the config file
    fn apply_to(&self, config: &mut Config) {
        let dashboard = &mut config.dashboard;
        if let Some(output) = &self.output {
            dashboard.log_file = output.clone();
        }
        if let Some(persistence) = self.persistence {
            dashboard.persistence = persistence;
        }
        if let Some(interval) = self.interval {
            dashboard.interval_seconds = interval;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            dashboard.timeout_ms = timeout_ms;
        }
        if self.no_notify {
            dashboard.notifications = false;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(cli.log_sink()).context("Failed to open trace log")?;

    let mut config = Config::from_config(cli.config.as_ref()).context("Failed to load configuration")?;
    cli.apply_to(&mut config);
    config.validate()?;

    if cli.print_config {
        print!("{config}");
        return Ok(());
    }

    let prober = ProbeExecutor::new(config.dashboard.timeout()).context("Failed to create probe executor")?;
    let store = store::open(config.dashboard.persistence, &config.dashboard.log_file);
    let notifier = if config.dashboard.notifications {
        DesktopNotifier::detect()
    } else {
        DesktopNotifier::Disabled
    };
    tracing::debug!(?notifier, persistence = %config.dashboard.persistence, "dashboard wired");

    let driver = Driver::new(config.endpoints, prober, store, notifier, config.dashboard.interval());

    if cli.once {
        let report = driver.run_once().await?;
        print_summary(&report);
        return Ok(());
    }

    let mut presenter = TerminalPresenter::new().context("Failed to initialise terminal")?;
    let result = driver.run_continuous(&mut presenter).await;
    finish(result, presenter.restore())
}

/// The run's own error outranks a failure to restore the terminal
fn finish(result: Result<()>, restored: Result<()>) -> Result<()> {
    if let (Err(_), Err(e)) = (&result, &restored) {
        tracing::error!("failed to restore terminal: {e:#}");
    }
    result.and(restored)
}

fn print_summary(report: &TickReport) {
    println!("Checked at {}", report.observed_at);
    for row in &report.rows {
        let glyph = if row.reachable { "✔" } else { "✖" };
        println!("{glyph} {:<7} {} ({}) - last seen {}", row.status, row.name, row.address, row.last_seen);
    }
    for transition in &report.transitions {
        println!("{transition}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from([
            "epoch-dashboard",
            "--once",
            "-o",
            "status.md",
            "--persistence",
            "append",
            "--interval",
            "30",
            "--no-notify",
        ]);
        let mut config = Config::default();

        cli.apply_to(&mut config);

        assert!(cli.once);
        assert_eq!(config.dashboard.log_file, PathBuf::from("status.md"));
        assert_eq!(config.dashboard.persistence, Persistence::Append);
        assert_eq!(config.dashboard.interval_seconds, 30);
        assert!(!config.dashboard.notifications);
        assert_eq!(cli.log_sink(), LogSink::Stderr);
    }

    #[test]
    fn run_error_wins_over_restore_error() {
        let err = finish(Err(anyhow::anyhow!("Failed to persist status log")), Err(anyhow::anyhow!("tty gone")))
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to persist status log");

        let err = finish(Ok(()), Err(anyhow::anyhow!("tty gone"))).unwrap_err();
        assert_eq!(err.to_string(), "tty gone");

        assert!(finish(Ok(()), Ok(())).is_ok());
    }

    #[test]
    fn dashboard_logs_to_file_only_when_asked() {
        let cli = Cli::parse_from(["epoch-dashboard"]);
        assert_eq!(cli.log_sink(), LogSink::Discard);

        let cli = Cli::parse_from(["epoch-dashboard", "--trace-log", "trace.log"]);
        assert_eq!(cli.log_sink(), LogSink::File(PathBuf::from("trace.log")));
    }
}
