//! Init and deploy workflows
//!
//! Each workflow is a fixed list of steps (see [`init::steps`] and
//! [`deploy::steps`]) interpreted by a [`StepPipeline`]. Branches are step
//! conditions evaluated while the run progresses.

pub mod deploy;
pub mod init;

use crate::{
    collaborators::Collaborators,
    core::{config::ReleaseConfig, Pipeline, PipelineReport, Platform, WorkflowContext, WorkflowError},
    execution::{CommandExecutor, ExecutionEvent, StepExecutor, StepPipeline},
    prompt::PromptGateway,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Name reported for input validation failures, which abort before any step
pub const VALIDATE_STEP: &str = "validate";

/// Entry point for both workflows
pub struct Orchestrator {
    engine: StepPipeline,
    config: ReleaseConfig,
    working_dir: PathBuf,
}

impl Orchestrator {
    pub fn new(engine: StepPipeline, config: ReleaseConfig, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            engine,
            config,
            working_dir: working_dir.into(),
        }
    }

    /// Wire an orchestrator from its capabilities
    pub fn with_collaborators(
        commands: Arc<dyn CommandExecutor>,
        prompt: Arc<dyn PromptGateway>,
        collaborators: Collaborators,
        config: ReleaseConfig,
        working_dir: impl Into<PathBuf>,
    ) -> Self {
        let executor = StepExecutor::new(commands, prompt, collaborators);
        Self::new(StepPipeline::new(executor), config, working_dir)
    }

    pub fn add_event_handler<F>(&mut self, handler: F)
    where
        F: Fn(ExecutionEvent) + Send + Sync + 'static,
    {
        self.engine.add_event_handler(handler);
    }

    /// Scaffold a new project called `project_name`
    pub async fn init(&self, project_name: &str) -> PipelineReport {
        let mut context = WorkflowContext::new(project_name.trim(), &self.working_dir);
        let mut pipeline = Pipeline::new("init", init::steps(&self.config));

        if context.project_name.is_empty() {
            let reason = WorkflowError::Validation("Project name must not be empty".to_string());
            let result = self.engine.reject(&mut pipeline, VALIDATE_STEP, reason);
            return PipelineReport::new(&pipeline, &context, result);
        }

        info!("Initialising {} in {}", context.project_name, self.working_dir.display());
        let result = self.engine.run(&mut pipeline, &mut context).await;
        PipelineReport::new(&pipeline, &context, result)
    }

    /// Test, build and publish `version`, optionally to an explicit platform
    ///
    /// An unsupported platform or an empty version aborts before any step runs.
    pub async fn deploy(&self, version: &str, platform: Option<&str>) -> PipelineReport {
        let mut context = WorkflowContext::new(self.project_name(), &self.working_dir).with_version(version.trim());
        let mut pipeline = Pipeline::new("deploy", deploy::steps(&self.config));

        let validated = Self::validate_deploy(version).and_then(|_| Platform::parse_optional(platform));
        match validated {
            Ok(platform) => context = context.with_platform(platform),
            Err(reason) => {
                let result = self.engine.reject(&mut pipeline, VALIDATE_STEP, reason);
                return PipelineReport::new(&pipeline, &context, result);
            }
        }

        info!(
            "Deploying {} version {} ({})",
            context.project_name,
            version,
            platform.unwrap_or("default target")
        );
        let result = self.engine.run(&mut pipeline, &mut context).await;
        PipelineReport::new(&pipeline, &context, result)
    }

    fn validate_deploy(version: &str) -> Result<(), WorkflowError> {
        if version.trim().is_empty() {
            return Err(WorkflowError::Validation("Version must not be empty".to_string()));
        }
        Ok(())
    }

    /// Configured project name, or the working directory's name
    fn project_name(&self) -> String {
        self.config
            .project_name
            .clone()
            .or_else(|| {
                self.working_dir
                    .canonicalize()
                    .ok()
                    .and_then(|dir| dir.file_name().map(|name| name.to_string_lossy().into_owned()))
            })
            .unwrap_or_else(|| "project".to_string())
    }
}
