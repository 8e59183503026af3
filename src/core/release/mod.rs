mod pipeline;
mod types;

pub use pipeline::{plan, run};
pub use types::{
    ReleaseArtifact, ReleaseOptions, ReleasePlan, ReleasePlanStep, ReleaseRun, ReleaseStepResult,
    ReleaseStepStatus,
};
