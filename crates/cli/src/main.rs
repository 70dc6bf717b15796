//! issuesync CLI
//!
//! Operator surface for the Bugzilla/Jira sync bridge: runs the retry worker
//! and inspects the dead-letter queue. The HTTP webhook intake itself is not
//! started by this binary.

mod commands;
mod config;

use clap::{Parser, Subcommand};
use config::Config;
use issuesync_queue::DeadLetterQueue;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(name = "issuesync", version, about)]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Inspect or clear the dead-letter queue.
    Queue(commands::queue::QueueArgs),
    /// Run the retry worker.
    Worker(commands::worker::WorkerArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.config.app_debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(dsn) = &cli.config.sentry_dsn {
        tracing::debug!(%dsn, "SENTRY_DSN configured but no error-reporting client is wired up");
    }

    let queue = DeadLetterQueue::from_dsn(&cli.config.dl_queue_dsn).await?;

    match &cli.command {
        Command::Queue(args) => commands::queue::run(&queue, args).await,
        Command::Worker(args) => commands::worker::run(&queue, &cli.config, args).await,
    }
}
