pub mod error;
pub mod pipeline;
pub mod registry;
pub mod runner;
pub mod step_name;
pub mod steps;
pub mod urls;

pub use error::{ConfigError, LookupError, RunnerError, StepError};
pub use pipeline::run_pipeline;
pub use registry::{ActionRegistry, ResolvedAction};
pub use runner::{ActionRunner, IntakeOutcome, WebhookIntake};
pub use step_name::StepName;
pub use steps::StepEnv;
pub use urls::TrackerUrls;
