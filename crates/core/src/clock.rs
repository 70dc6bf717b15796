use chrono::{DateTime, Utc};

/// Source of "now", injected so expiry and timestamp logic is testable
/// without sleeping real time.
///
/// Modeled as an explicit dependency rather than a hidden singleton, per the
/// "global state" design note: the queue handle, clock, and client handles
/// are process-wide but constructed at startup and passed down.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fixed clock for deterministic tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
