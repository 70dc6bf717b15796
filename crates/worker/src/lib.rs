pub mod worker;

pub use worker::{PassSummary, RetryWorker};
