//! Pipeline domain model

use crate::core::{
    state::{ExecutionStatus, PipelineState, StepState},
    step::Step,
};

/// An ordered list of steps plus the state of its run
#[derive(Debug, Clone)]
pub struct Pipeline {
    /// Workflow name ("init", "deploy")
    pub name: String,

    /// Steps in execution order
    pub steps: Vec<Step>,

    /// Execution state
    pub state: PipelineState,
}

impl Pipeline {
    pub fn new(name: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            name: name.into(),
            steps,
            state: PipelineState::new(),
        }
    }

    /// Get a step by name
    pub fn step(&self, name: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.name == name)
    }

    /// Step names in declaration order
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name.as_str()).collect()
    }

    /// Names of steps whose action actually ran, in order
    pub fn executed_steps(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter(|s| {
                matches!(
                    s.state,
                    StepState::Completed { .. } | StepState::Failed { .. }
                )
            })
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

    /// Check if the run was aborted
    pub fn has_aborted(&self) -> bool {
        self.state.status == ExecutionStatus::Aborted
    }
}
