use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use clap::{Parser, Subcommand};
use docreel_core::{Config, HttpJobService};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod commands;
mod ui;

#[derive(Parser)]
#[command(name = "docreel")]
#[command(about = "Upload documents for video generation and follow the jobs until they finish")]
struct Cli {
    /// Base URL of the video generation service (overrides DOCREEL_API_URL and config.toml)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Status poll interval in milliseconds
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    interval_ms: Option<u64>,

    /// Print statuses as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Show progress logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload a document and print the task id
    Upload { file: PathBuf },
    /// Fetch the status of a task once
    Status { task_id: String },
    /// Poll a task until it completes
    Watch { task_id: String },
    /// Upload a document, then poll the new task until it completes
    Run { file: PathBuf },
    /// List generated videos
    Videos,
}

fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "warn,docreel=info,docreel_core=info"
    } else {
        "warn"
    }
}

fn init_logging(verbose: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Command-line flags win over whatever `Config::load` found.
fn apply_overrides(cli: &Cli, mut config: Config) -> Result<Config> {
    if let Some(url) = &cli.api_url {
        config = config.with_api_url(url)?;
    }
    if let Some(ms) = cli.interval_ms {
        config = config.with_poll_interval(Duration::from_millis(ms))?;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = apply_overrides(&cli, Config::load()?)?;
    debug!(api_url = %config.api_url, interval = ?config.poll_interval, "configuration loaded");
    let service = HttpJobService::new(&config)?;

    match &cli.command {
        Command::Upload { file } => {
            ui::print_banner();
            commands::upload(&service, file, config.poll_interval).await?;
        }
        Command::Status { task_id } => commands::status(&service, task_id, cli.json).await?,
        Command::Watch { task_id } => {
            ui::print_banner();
            commands::watch(&service, task_id, config.poll_interval, cli.json).await?;
        }
        Command::Run { file } => {
            ui::print_banner();
            commands::run(&service, file, config.poll_interval, cli.json).await?;
        }
        Command::Videos => commands::videos(),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "docreel",
            "run",
            "notes.pdf",
            "--api-url",
            "http://jobs:8000",
            "--interval-ms",
            "250",
        ])
        .unwrap();

        assert!(matches!(cli.command, Command::Run { ref file } if file == &PathBuf::from("notes.pdf")));
        let config = apply_overrides(&cli, Config::default()).unwrap();
        assert_eq!(config.api_url.as_str(), "http://jobs:8000/");
        assert_eq!(config.poll_interval, Duration::from_millis(250));
    }

    #[test]
    fn bad_api_url_is_rejected() {
        let cli = Cli::try_parse_from(["docreel", "videos", "--api-url", "localhost"]).unwrap();
        assert!(apply_overrides(&cli, Config::default()).is_err());
    }

    #[test]
    fn verbose_raises_own_crates_to_info() {
        assert_eq!(default_filter(false), "warn");
        let verbose = default_filter(true);
        assert!(verbose.contains("docreel=info"));
        assert!(verbose.contains("docreel_core=info"));
        assert!(!verbose.contains("debug"));
    }

    #[test]
    fn zero_interval_is_rejected_at_parse_time() {
        assert!(Cli::try_parse_from(["docreel", "watch", "t1", "--interval-ms", "0"]).is_err());

        let cli = Cli::try_parse_from(["docreel", "watch", "t1", "--interval-ms", "1"]).unwrap();
        let config = apply_overrides(&cli, Config::default()).unwrap();
        assert_eq!(config.poll_interval, Duration::from_millis(1));
    }

    #[test]
    fn overrides_leave_unset_fields_alone() {
        let base = Config::default()
            .with_api_url("http://from-file:9000")
            .unwrap();
        let cli = Cli::try_parse_from(["docreel", "videos"]).unwrap();

        let config = apply_overrides(&cli, base).unwrap();
        assert_eq!(config.api_url.as_str(), "http://from-file:9000/");
        assert_eq!(config.poll_interval, docreel_core::config::DEFAULT_POLL_INTERVAL);
    }
}
