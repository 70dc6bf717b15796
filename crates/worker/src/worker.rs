use std::collections::HashSet;
use std::time::Duration;

use chrono::Duration as ChronoDuration;
use issuesync_actions::{ActionRegistry, ActionRunner, StepEnv};
use issuesync_core::{BugId, Clock};
use issuesync_queue::{DeadLetterQueue, QueueError};

/// Per-pass outcome counters, surfaced so the CLI can log a one-line summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub processed: usize,
    pub expired: usize,
    pub failed_bugs: usize,
}

/// Single-instance scheduled loop draining the dead-letter queue. Owns no
/// state between passes beyond what `queue` itself persists; every field is
/// an injected dependency rather than a hidden singleton.
pub struct RetryWorker<'a> {
    registry: &'a ActionRegistry,
    queue: &'a DeadLetterQueue,
    clock: &'a dyn Clock,
    retry_timeout_days: i64,
}

impl<'a> RetryWorker<'a> {
    #[must_use]
    pub fn new(
        registry: &'a ActionRegistry,
        queue: &'a DeadLetterQueue,
        clock: &'a dyn Clock,
        retry_timeout_days: i64,
    ) -> Self {
        Self {
            registry,
            queue,
            clock,
            retry_timeout_days,
        }
    }

    /// Runs exactly one pass over the whole queue: expire anything past
    /// `retry_timeout_days` regardless of other state, then replay each
    /// bug's items in order, blocking the rest of a bug's items on its
    /// first non-ignore failure this pass.
    pub async fn run_once(&self, env: &StepEnv<'_>) -> Result<PassSummary, QueueError> {
        let cutoff = self.clock.now() - ChronoDuration::days(self.retry_timeout_days);
        let mut failed_bugs: HashSet<BugId> = HashSet::new();
        let mut summary = PassSummary::default();
        let runner = ActionRunner::new(self.registry);

        let all = self.queue.get_all().await?;
        for (bug_id, items) in all {
            for item in items {
                if item.timestamp() < cutoff {
                    self.queue.remove(bug_id, &item.identifier()).await?;
                    summary.expired += 1;
                    tracing::warn!(bug_id = %bug_id, "expiring queue item past retry timeout");
                    continue;
                }

                if failed_bugs.contains(&bug_id) {
                    continue;
                }

                let identifier = item.identifier();
                match runner.execute(item.payload, env).await {
                    Ok(_) => {
                        self.queue.remove(bug_id, &identifier).await?;
                        summary.processed += 1;
                    }
                    Err(err) if err.is_ignore() => {
                        tracing::info!(bug_id = %bug_id, %err, "dropping permanently ignored item");
                        self.queue.remove(bug_id, &identifier).await?;
                    }
                    Err(err) => {
                        tracing::warn!(bug_id = %bug_id, %err, "item failed, blocking this bug for the rest of the pass");
                        failed_bugs.insert(bug_id);
                    }
                }
            }
        }

        summary.failed_bugs = failed_bugs.len();
        Ok(summary)
    }

    /// Loops `run_once` with a fixed delay between passes until `shutdown`
    /// resolves, never mid-item: shutdown is only observed between passes.
    /// This is the `CONSTANT_RETRY=true` deployment mode; the cron-style
    /// alternative just calls `run_once` directly on its own schedule.
    pub async fn run_forever(
        &self,
        env: &StepEnv<'_>,
        poll_interval: Duration,
        mut shutdown: tokio::sync::oneshot::Receiver<()>,
    ) -> Result<(), QueueError> {
        loop {
            let summary = self.run_once(env).await?;
            tracing::info!(
                processed = summary.processed,
                expired = summary.expired,
                failed_bugs = summary.failed_bugs,
                "retry worker pass complete"
            );

            tokio::select! {
                () = tokio::time::sleep(poll_interval) => {}
                _ = &mut shutdown => {
                    tracing::info!("retry worker received shutdown signal");
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::{TimeZone, Utc};
    use issuesync_clients::{FakeSourceTrackerClient, FakeTargetTrackerClient};
    use issuesync_core::{
        ActionConfig, ActionParameters, Bug, Event, EventAction, EventTarget, EventUser,
        FixedClock, ProjectKey, StepGroupsRaw, WebhookRequest,
    };
    use issuesync_queue::MemoryQueueBackend;

    use super::*;

    fn bug(id: u64, whiteboard: &str) -> Bug {
        Bug {
            id: BugId(id),
            summary: "x".into(),
            status: "NEW".into(),
            resolution: String::new(),
            assigned_to: String::new(),
            whiteboard: whiteboard.into(),
            see_also: Vec::new(),
            is_private: false,
            comment: None,
            component: String::new(),
            product: String::new(),
            priority: String::new(),
            severity: String::new(),
        }
    }

    fn request(id: u64, time: chrono::DateTime<Utc>) -> WebhookRequest {
        WebhookRequest {
            webhook_id: 1,
            webhook_name: "bugzilla".into(),
            bug: bug(id, "[devtest]"),
            event: Event {
                action: EventAction::Create,
                time,
                user: EventUser { login: "a@b.com".into() },
                changes: Vec::new(),
                target: EventTarget::Bug,
                routing_key: None,
            },
        }
    }

    fn registry() -> ActionRegistry {
        ActionRegistry::new(vec![ActionConfig {
            whiteboard_tag: "devtest".into(),
            jira_project_key: ProjectKey::new("JBI"),
            allow_private: false,
            parameters: ActionParameters::default(),
            steps: StepGroupsRaw::new(),
        }])
        .unwrap()
    }

    #[tokio::test]
    async fn expired_items_are_removed_without_running_the_pipeline() {
        let registry = registry();
        let queue = DeadLetterQueue::new(Box::new(MemoryQueueBackend::new()));
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        let old = now - chrono::Duration::days(10);
        queue.postpone(request(1, old), old).await.unwrap();

        let source = FakeSourceTrackerClient::new();
        let target = FakeTargetTrackerClient::new();
        let urls = issuesync_actions::TrackerUrls::new(
            "https://jira.example.com",
            "https://bugzilla.example.com",
        );
        let env = StepEnv { source: &source, target: &target, urls: &urls };
        let clock = FixedClock(now);
        let worker = RetryWorker::new(&registry, &queue, &clock, 7);

        let summary = worker.run_once(&env).await.unwrap();
        assert_eq!(summary.expired, 1);
        assert_eq!(summary.processed, 0);
        assert_eq!(queue.size(None).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn head_of_line_blocking_preserves_later_items_for_the_same_bug() {
        let registry = registry();
        let queue = DeadLetterQueue::new(Box::new(MemoryQueueBackend::new()));
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        let t0 = now - chrono::Duration::minutes(2);
        let t1 = now - chrono::Duration::minutes(1);

        // A modify event with no source bug seeded fails with a (non-ignore)
        // client NotFound error from the private-bug refetch path being
        // absent; instead we force a failure via an update whose linked
        // issue doesn't exist on the target, which set_issue_status rejects.
        let mut failing_bug = bug(7, "[devtest]");
        failing_bug.see_also = vec!["https://jira.example.com/browse/JBI-404".into()];
        let mut req0 = request(7, t0);
        req0.bug = failing_bug.clone();
        req0.event.action = EventAction::Modify;
        let mut req1 = request(7, t1);
        req1.bug = failing_bug;
        req1.event.action = EventAction::Modify;

        queue.postpone(req0, t0).await.unwrap();
        queue.postpone(req1, t1).await.unwrap();

        let source = FakeSourceTrackerClient::new();
        let target = FakeTargetTrackerClient::new();
        let urls = issuesync_actions::TrackerUrls::new(
            "https://jira.example.com",
            "https://bugzilla.example.com",
        );
        let env = StepEnv { source: &source, target: &target, urls: &urls };
        let clock = FixedClock(now);
        let worker = RetryWorker::new(&registry, &queue, &clock, 7);

        let summary = worker.run_once(&env).await.unwrap();
        assert_eq!(summary.processed, 0);
        assert_eq!(summary.failed_bugs, 1);
        // Both items remain queued: the first failed, the second was
        // head-of-line blocked and never attempted.
        assert_eq!(queue.size(Some(BugId(7))).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn successful_item_is_removed_and_counted() {
        let registry = registry();
        let queue = DeadLetterQueue::new(Box::new(MemoryQueueBackend::new()));
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        let t0 = now - chrono::Duration::minutes(1);

        let source = FakeSourceTrackerClient::new();
        source.seed_bug(bug(1, "[devtest]"));
        source.seed_comments(
            BugId(1),
            vec![issuesync_core::Comment {
                id: 1,
                text: "hi".into(),
                author: "a@b.com".into(),
                time: now,
                is_private: false,
            }],
        );
        queue.postpone(request(1, t0), t0).await.unwrap();

        let target = FakeTargetTrackerClient::new();
        let urls = issuesync_actions::TrackerUrls::new(
            "https://jira.example.com",
            "https://bugzilla.example.com",
        );
        let env = StepEnv { source: &source, target: &target, urls: &urls };
        let clock = FixedClock(now);
        let worker = RetryWorker::new(&registry, &queue, &clock, 7);

        let summary = worker.run_once(&env).await.unwrap();
        assert_eq!(summary.processed, 1);
        assert_eq!(queue.size(None).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn run_forever_stops_on_shutdown_signal() {
        static PASSES: AtomicUsize = AtomicUsize::new(0);
        let registry = registry();
        let queue = DeadLetterQueue::new(Box::new(MemoryQueueBackend::new()));
        let source = FakeSourceTrackerClient::new();
        let target = FakeTargetTrackerClient::new();
        let urls = issuesync_actions::TrackerUrls::new(
            "https://jira.example.com",
            "https://bugzilla.example.com",
        );
        let env = StepEnv { source: &source, target: &target, urls: &urls };
        let clock = issuesync_core::SystemClock;
        let worker = RetryWorker::new(&registry, &queue, &clock, 7);

        let (tx, rx) = tokio::sync::oneshot::channel();
        tx.send(()).unwrap();
        worker
            .run_forever(&env, Duration::from_secs(60), rx)
            .await
            .unwrap();
        PASSES.fetch_add(1, Ordering::SeqCst);
        assert_eq!(PASSES.load(Ordering::SeqCst), 1);
    }
}
