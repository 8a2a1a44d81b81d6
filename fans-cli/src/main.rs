//! bili-fans
//!
//! Polls the public follower statistics of an account and prints the
//! resulting metric as JSON, one line per successful cycle.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use fans_tracker::fetcher::{DEFAULT_ENDPOINT, DEFAULT_USER_AGENT};
use fans_tracker::logging::setup::{init_logging, LoggingConfig};
use fans_tracker::prelude::*;
use tokio::sync::watch;
use tracing::{info, Level};

#[derive(Debug, Parser)]
#[command(name = "bili-fans", version, about = "Track follower growth of a public account")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    options: GlobalOptions,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Poll once and print the metric
    Once(AccountArgs),
    /// Poll on an interval until interrupted
    Watch {
        #[command(flatten)]
        account: AccountArgs,

        /// Seconds between polls
        #[arg(long, default_value_t = 3600, value_parser = clap::value_parser!(u64).range(1..))]
        interval_secs: u64,
    },
}

#[derive(Debug, Args)]
struct AccountArgs {
    /// Tracked user id
    id: String,

    /// Display name of the metric
    #[arg(long)]
    name: Option<String>,
}

#[derive(Debug, Args)]
struct GlobalOptions {
    /// API endpoint (scheme and host)
    #[arg(long, global = true, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// User-Agent header sent with each request
    #[arg(long, global = true, default_value = DEFAULT_USER_AGENT)]
    user_agent: String,

    /// HTTP request timeout in seconds
    #[arg(long, global = true, default_value_t = 30)]
    timeout_secs: u64,

    /// Validate TLS certificates
    #[arg(long, global = true)]
    verify_certs: bool,

    /// Detect month boundaries by (year, month) instead of month number only
    #[arg(long, global = true)]
    strict_months: bool,

    /// Use UTC instead of local time for calendar periods
    #[arg(long, global = true)]
    utc: bool,

    /// Log level
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    /// Full log filter directive, overriding --log-level
    #[arg(long, global = true)]
    log_filter: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

impl GlobalOptions {
    fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig::new()
            .with_endpoint(&self.endpoint)
            .with_user_agent(&self.user_agent)
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_accept_invalid_certs(!self.verify_certs)
    }

    fn tracker_config(&self) -> TrackerConfig {
        let mode = if self.strict_months {
            BoundaryMode::Strict
        } else {
            BoundaryMode::Legacy
        };
        let zone = if self.utc { ClockZone::Utc } else { ClockZone::Local };
        TrackerConfig::new()
            .with_boundary_mode(mode)
            .with_clock_zone(zone)
    }

    fn logging_config(&self) -> LoggingConfig {
        let base = match self.log_level {
            LogLevel::Debug | LogLevel::Trace => LoggingConfig::development(),
            _ => LoggingConfig::default(),
        };
        let config = base
            .with_tracker_level(self.log_level.into())
            .with_json_format(self.json_logs);
        match &self.log_filter {
            Some(filter) => config.with_env_filter(filter),
            None => config,
        }
    }
}

impl AccountArgs {
    fn account(&self) -> AccountConfig {
        let account = AccountConfig::new(&self.id);
        match &self.name {
            Some(name) => account.with_name(name),
            None => account,
        }
    }
}

fn print_metric(metric: &FansMetric) -> Result<()> {
    println!("{}", serde_json::to_string(metric)?);
    Ok(())
}

async fn run_once(coordinator: Coordinator) -> Result<()> {
    let snapshot = coordinator
        .trigger_refresh()
        .await
        .with_context(|| format!("Failed to fetch statistics for {}", coordinator.account().id()))?;
    info!(
        "{} has {} followers ({:+} this month, {:+} this year)",
        coordinator.account().display_name(),
        snapshot.follower,
        snapshot.monthly_increase,
        snapshot.yearly_increase
    );
    print_metric(&coordinator.metric())
}

async fn run_watch(coordinator: Coordinator, interval: Duration) -> Result<()> {
    let coordinator = Arc::new(coordinator);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut updates = coordinator.subscribe();

    let worker = PollWorker::new(coordinator.clone(), interval, shutdown_rx);
    let handle = tokio::spawn(worker.run());

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                print_metric(&coordinator.metric())?;
            }
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for Ctrl-C")?;
                info!("Interrupted, stopping");
                break;
            }
        }
    }

    // The worker may already be gone if it exited on its own.
    let _ = shutdown_tx.send(true);
    let stats = handle.await.context("Poll worker panicked")?;
    eprintln!(
        "{} cycles: {} succeeded, {} failed",
        stats.cycles, stats.succeeded, stats.failed
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.options.logging_config())?;

    let store = TrackerStore::new();
    let fetcher = cli.options.fetcher_config();
    let mut tracker = cli.options.tracker_config();

    match &cli.command {
        Command::Once(args) => {
            let coordinator = Coordinator::connect(args.account(), fetcher, &tracker, store)?;
            run_once(coordinator).await
        }
        Command::Watch {
            account,
            interval_secs,
        } => {
            tracker = tracker.with_poll_interval(Duration::from_secs(*interval_secs));
            let coordinator = Coordinator::connect(account.account(), fetcher, &tracker, store)?;
            run_watch(coordinator, tracker.poll_interval()).await
        }
    }
}
