use clap::{Args, Subcommand};
use issuesync_actions::{ActionRegistry, StepEnv};
use issuesync_clients::{FakeSourceTrackerClient, FakeTargetTrackerClient};
use issuesync_core::SystemClock;
use issuesync_queue::DeadLetterQueue;
use issuesync_worker::RetryWorker;

use crate::config::Config;

#[derive(Args, Debug)]
pub struct WorkerArgs {
    #[command(subcommand)]
    pub command: WorkerCommand,
}

#[derive(Subcommand, Debug)]
pub enum WorkerCommand {
    /// Drain the queue once and exit (the cron-job deployment mode).
    Run,
    /// Poll the queue continuously until SIGINT/SIGTERM (`CONSTANT_RETRY=true`).
    Serve {
        #[arg(long, default_value_t = 60)]
        poll_interval_secs: u64,
    },
}

/// No configured action sources are wired up here: action configuration is
/// loaded from whatever file/database the deployment chooses, and this
/// binary does no config-file parsing. An operator embedding this crate
/// supplies a real `ActionRegistry`; this binary runs an empty one, which
/// still exercises expiry and draining against anything already queued.
/// Tracker wrappers are interfaces only for the same reason, so the
/// in-memory fakes stand in here.
pub async fn run(queue: &DeadLetterQueue, config: &Config, args: &WorkerArgs) -> anyhow::Result<()> {
    let registry = ActionRegistry::new(Vec::new())?;
    let source = FakeSourceTrackerClient::new();
    let target = FakeTargetTrackerClient::new();
    let urls = config.tracker_urls();
    let env = StepEnv {
        source: &source,
        target: &target,
        urls: &urls,
    };
    let clock = SystemClock;
    let worker = RetryWorker::new(&registry, queue, &clock, config.retry_timeout_days);

    match args.command {
        WorkerCommand::Run => {
            let summary = worker.run_once(&env).await?;
            println!(
                "processed={} expired={} failed_bugs={}",
                summary.processed, summary.expired, summary.failed_bugs
            );
        }
        WorkerCommand::Serve { poll_interval_secs } => {
            let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
            tokio::spawn(async move {
                shutdown_signal().await;
                let _ = shutdown_tx.send(());
            });
            worker
                .run_forever(
                    &env,
                    std::time::Duration::from_secs(poll_interval_secs),
                    shutdown_rx,
                )
                .await?;
        }
    }
    Ok(())
}

/// Waits for SIGINT (Ctrl+C) or SIGTERM, whichever comes first.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { tracing::info!("received SIGINT"); }
        () = terminate => { tracing::info!("received SIGTERM"); }
    }
}
