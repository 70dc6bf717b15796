pub mod error;
pub mod fakes;
pub mod source;
pub mod target;

pub use error::ClientError;
pub use fakes::{FakeSourceTrackerClient, FakeTargetTrackerClient};
pub use source::{DynSourceTrackerClient, SourceTrackerClient};
pub use target::{DynTargetTrackerClient, TargetTrackerClient};
