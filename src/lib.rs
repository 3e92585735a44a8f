//! release-flow - init and deploy workflows for front-end projects

pub mod cli;
pub mod collaborators;
pub mod core;
pub mod execution;
pub mod prompt;
pub mod workflows;

// Re-export commonly used types
pub use collaborators::{Collaborators, ConfigKind, ConfigStore};
pub use core::{Pipeline, PipelineReport, PipelineResult, Platform, Step, StepState, WorkflowContext, WorkflowError};
pub use execution::{CommandExecutor, CommandPurpose, ExecutionEvent, OutcomeClassifier, StepPipeline, Verdict};
pub use prompt::{PromptGateway, PromptRequest, PromptResponse};
pub use workflows::Orchestrator;
