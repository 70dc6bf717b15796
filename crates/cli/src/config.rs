use clap::Parser;

/// Process-wide configuration, sourced entirely from the environment.
/// No config file parsing — env vars and CLI flags only.
#[derive(Parser, Debug, Clone)]
#[command(name = "issuesync", version, about)]
pub struct Config {
    /// Dead-letter queue storage URI, e.g. `file:///var/lib/jbi/queue`.
    #[arg(long, env = "DL_QUEUE_DSN", global = true)]
    pub dl_queue_dsn: String,

    /// Age (in days) past which a queued item is dropped unprocessed.
    #[arg(long, env = "RETRY_TIMEOUT_DAYS", default_value_t = 7, global = true)]
    pub retry_timeout_days: i64,

    /// Run the retry worker as a continuous poll loop instead of one-shot.
    #[arg(long, env = "CONSTANT_RETRY", default_value_t = false, global = true)]
    pub constant_retry: bool,

    /// Target tracker base URL.
    #[arg(long, env = "JIRA_BASE_URL", global = true)]
    pub jira_base_url: String,

    /// Target tracker username, used alongside the API key for basic auth.
    #[arg(long, env = "JIRA_USERNAME", global = true)]
    pub jira_username: Option<String>,

    /// Target tracker API key.
    #[arg(long, env = "JIRA_API_KEY", global = true)]
    pub jira_api_key: Option<String>,

    /// Source tracker base URL.
    #[arg(long, env = "BUGZILLA_BASE_URL", global = true)]
    pub bugzilla_base_url: String,

    /// Source tracker API key.
    #[arg(long, env = "BUGZILLA_API_KEY", global = true)]
    pub bugzilla_api_key: Option<String>,

    /// Enables verbose/debug logging regardless of `RUST_LOG`.
    #[arg(long, env = "APP_DEBUG", default_value_t = false, global = true)]
    pub app_debug: bool,

    /// Error-reporting DSN. Accepted for parity with the source deployment;
    /// no Sentry client is wired up here.
    #[arg(long, env = "SENTRY_DSN", global = true)]
    pub sentry_dsn: Option<String>,

    /// Accepted for parity with the source deployment; unused.
    #[arg(long, env = "SENTRY_TRACES_SAMPLE_RATE", global = true)]
    pub sentry_traces_sample_rate: Option<f64>,
}

impl Config {
    #[must_use]
    pub fn tracker_urls(&self) -> issuesync_actions::TrackerUrls {
        issuesync_actions::TrackerUrls::new(self.jira_base_url.clone(), self.bugzilla_base_url.clone())
    }
}
