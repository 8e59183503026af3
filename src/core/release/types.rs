use serde::Serialize;

/// One planned step. The id is stable across plan and run output.
#[derive(Debug, Clone, Serialize)]
pub struct ReleasePlanStep {
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReleasePlan {
    pub version: String,
    pub steps: Vec<ReleasePlanStep>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseStepStatus {
    Completed,
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReleaseStepResult {
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    pub status: ReleaseStepStatus,
}

/// A file produced into the dist directory by the build step.
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseArtifact {
    pub path: String,
    pub size: u64,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReleaseRun {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_version: Option<String>,
    pub dry_run: bool,
    pub steps: Vec<ReleaseStepResult>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<ReleaseArtifact>,
}

#[derive(Debug, Clone, Default)]
pub struct ReleaseOptions {
    /// Version to stamp; defaults to the latest git tag.
    pub set_version: Option<String>,
    pub dry_run: bool,
    pub no_upload: bool,
}
