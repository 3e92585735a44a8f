//! Run report handed back to callers of a workflow

use crate::core::{
    ExecutionStatus, Pipeline, PipelineResult, StepKind, StepState, WorkflowContext,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Per-step record in a report
#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    pub name: String,
    pub kind: StepKind,
    pub state: StepState,
}

/// Everything known about one workflow run once it has finished
#[derive(Debug, Serialize)]
pub struct PipelineReport {
    pub execution_id: Uuid,
    pub workflow: String,
    pub project_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub status: ExecutionStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub steps: Vec<StepRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failing_step: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip)]
    pub result: PipelineResult,
}

impl PipelineReport {
    pub fn new(pipeline: &Pipeline, context: &WorkflowContext, result: PipelineResult) -> Self {
        Self {
            execution_id: pipeline.state.execution_id,
            workflow: pipeline.name.clone(),
            project_name: context.project_name.clone(),
            version: context.version.clone(),
            status: pipeline.state.status,
            started_at: pipeline.state.started_at,
            finished_at: pipeline.state.finished_at,
            steps: pipeline
                .steps
                .iter()
                .map(|step| StepRecord {
                    name: step.name.clone(),
                    kind: step.kind(),
                    state: step.state.clone(),
                })
                .collect(),
            failing_step: result.failing_step().map(str::to_string),
            reason: result.reason().map(ToString::to_string),
            result,
        }
    }

    /// Names of steps whose action ran, in order
    pub fn executed_steps(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter(|s| matches!(s.state, StepState::Completed { .. } | StepState::Failed { .. }))
            .map(|s| s.name.as_str())
            .collect()
    }

    /// Names of steps skipped by their condition
    pub fn skipped_steps(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter(|s| matches!(s.state, StepState::Skipped { .. }))
            .map(|s| s.name.as_str())
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
