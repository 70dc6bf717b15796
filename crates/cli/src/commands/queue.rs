use clap::{Args, Subcommand};
use issuesync_core::BugId;
use issuesync_queue::DeadLetterQueue;

#[derive(Args, Debug)]
pub struct QueueArgs {
    #[command(subcommand)]
    pub command: QueueCommand,
}

#[derive(Subcommand, Debug)]
pub enum QueueCommand {
    /// List queued item identifiers, optionally scoped to one bug.
    List {
        #[arg(long)]
        bug_id: Option<u64>,
    },
    /// Count queued items, optionally scoped to one bug.
    Size {
        #[arg(long)]
        bug_id: Option<u64>,
    },
    /// Remove every item from the queue.
    Clear,
}

pub async fn run(queue: &DeadLetterQueue, args: &QueueArgs) -> anyhow::Result<()> {
    match &args.command {
        QueueCommand::List { bug_id: Some(id) } => {
            let identifiers = queue.list(BugId(*id)).await?;
            for identifier in identifiers {
                println!("{identifier}");
            }
        }
        QueueCommand::List { bug_id: None } => {
            let by_bug = queue.list_all().await?;
            for (bug_id, identifiers) in by_bug {
                for identifier in identifiers {
                    println!("{bug_id}\t{identifier}");
                }
            }
        }
        QueueCommand::Size { bug_id } => {
            let size = queue.size(bug_id.map(BugId)).await?;
            println!("{size}");
        }
        QueueCommand::Clear => {
            queue.clear().await?;
            println!("queue cleared");
        }
    }
    Ok(())
}
