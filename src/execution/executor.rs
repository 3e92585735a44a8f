//! Step executor - runs individual steps against commands, prompts and collaborators

use crate::{
    collaborators::{Collaborators, ConfigKind},
    core::{
        render_placeholders, ContextWrite, Delegate, FileOp, FileSpec, Step, StepAction, StepNotice,
        WorkflowContext, WorkflowError,
    },
    execution::{CommandExecutor, CommandPurpose, OutcomeClassifier, Verdict},
    prompt::{PromptGateway, PromptRequest},
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Storage profile values an index rewrite cannot do without
const STORAGE_KEYS: [&str; 2] = ["bucket", "region"];

/// What a successfully executed step hands back to the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub verdict: Verdict,
    /// Messages for the operator, in emission order
    pub notices: Vec<StepNotice>,
    /// Context writes merged by the pipeline once the step succeeds
    pub writes: Vec<ContextWrite>,
}

impl StepOutcome {
    fn success() -> Self {
        Self {
            verdict: Verdict::Success,
            notices: Vec::new(),
            writes: Vec::new(),
        }
    }

    fn with_notices(mut self, notices: Vec<StepNotice>) -> Self {
        self.notices = notices;
        self
    }

    fn with_writes(mut self, writes: Vec<ContextWrite>) -> Self {
        self.writes = writes;
        self
    }
}

/// Executes a single step
pub struct StepExecutor {
    commands: Arc<dyn CommandExecutor>,
    prompt: Arc<dyn PromptGateway>,
    collaborators: Collaborators,
}

impl StepExecutor {
    pub fn new(
        commands: Arc<dyn CommandExecutor>,
        prompt: Arc<dyn PromptGateway>,
        collaborators: Collaborators,
    ) -> Self {
        Self {
            commands,
            prompt,
            collaborators,
        }
    }

    /// Execute a step
    ///
    /// An `Err` aborts the run; the context is only read here, writes travel
    /// back in the outcome.
    pub async fn execute(&self, step: &Step, context: &WorkflowContext) -> Result<StepOutcome, WorkflowError> {
        info!("Executing step: {} ({})", step.name, step.kind());

        match &step.action {
            StepAction::Command { purpose, command } => {
                self.run_command(step, *purpose, command, context).await
            }
            StepAction::Prompt {
                key,
                request,
                abort_on_decline,
            } => self.ask(key, request, *abort_on_decline, context).await,
            StepAction::FileOp(op) => self.apply_file_op(op, context).await,
            StepAction::Delegate(delegate) => {
                self.delegate(*delegate, context).await?;
                Ok(StepOutcome::success())
            }
            StepAction::Notice(notices) => {
                let vars = context.get_rendering_variables();
                let rendered = notices
                    .iter()
                    .map(|notice| StepNotice::new(notice.level, render_placeholders(&notice.message, &vars)))
                    .collect();
                Ok(StepOutcome::success().with_notices(rendered))
            }
        }
    }

    async fn run_command(
        &self,
        step: &Step,
        purpose: CommandPurpose,
        command: &str,
        context: &WorkflowContext,
    ) -> Result<StepOutcome, WorkflowError> {
        let command = render_placeholders(command, &context.get_rendering_variables());
        debug!("Effective command for step {}: {}", step.name, command);

        // A spawn failure propagates for every purpose
        let output = self.commands.run(&command, Some(&context.working_dir)).await?;
        debug!(
            "Step {} exited with {:?} ({} bytes stdout, {} bytes stderr)",
            step.name,
            output.exit_code,
            output.stdout.len(),
            output.stderr.len()
        );

        let outcome = OutcomeClassifier::outcome(purpose, &output.stdout, &output.stderr);
        let notices = OutcomeClassifier::notices(purpose, &outcome, &context.project_name);

        let stops_on_warning = outcome.verdict == Verdict::Warning && !step.continue_on_warning;
        if outcome.is_fatal(purpose) || stops_on_warning {
            error!("Step {} classified as {:?}", step.name, outcome.verdict);
            for notice in &notices {
                error!("{}", notice.message);
            }
            return Err(WorkflowError::ExternalCommand {
                command,
                stderr: outcome.raw_stderr.trim_end().to_string(),
            });
        }

        if outcome.verdict == Verdict::Error {
            warn!("Step {} reported an error for {} purpose, continuing", step.name, purpose);
        }

        Ok(StepOutcome {
            verdict: outcome.verdict,
            notices,
            writes: Vec::new(),
        })
    }

    async fn ask(
        &self,
        key: &str,
        request: &PromptRequest,
        abort_on_decline: bool,
        context: &WorkflowContext,
    ) -> Result<StepOutcome, WorkflowError> {
        let request = PromptRequest::new(
            render_placeholders(&request.message, &context.get_rendering_variables()),
            request.required,
        );
        let response = self.prompt.ask(&request).await?;
        debug!("Prompt {} answered {:?}", key, response.answer);

        if abort_on_decline && !response.is_yes() {
            info!("Operator declined '{}'", key);
            return Err(WorkflowError::UserAbort(format!(
                "{} aborted by operator",
                context.project_name
            )));
        }

        Ok(StepOutcome::success().with_writes(vec![ContextWrite::Answer {
            key: key.to_string(),
            value: response.answer,
        }]))
    }

    async fn apply_file_op(&self, op: &FileOp, context: &WorkflowContext) -> Result<StepOutcome, WorkflowError> {
        let fs = &self.collaborators.file_system;

        match op {
            FileOp::MakeDirs(paths) => {
                for path in paths {
                    fs.make_dir(path).await?;
                }
                Ok(StepOutcome::success())
            }
            FileOp::CreateFiles(files) => {
                let params = context.get_rendering_variables();
                for FileSpec { path, template } in files {
                    let contents = self.collaborators.templater.render(template, &params)?;
                    fs.create(path, &contents).await?;
                }
                Ok(StepOutcome::success())
            }
            FileOp::RewriteReference { target, marker, url } => {
                let store = &self.collaborators.config_store;
                store.require_active(ConfigKind::Storage)?;
                let storage = store.get_active(ConfigKind::Storage)?;
                for key in STORAGE_KEYS {
                    storage.require(key)?;
                }

                let writes: Vec<ContextWrite> = storage
                    .values
                    .iter()
                    .map(|(key, value)| ContextWrite::Resolved {
                        key: format!("storage.{}", key),
                        value: value.clone(),
                    })
                    .collect();

                let mut vars = context.get_rendering_variables();
                for write in &writes {
                    if let ContextWrite::Resolved { key, value } = write {
                        vars.insert(key.clone(), value.clone());
                    }
                }
                vars.insert("marker".to_string(), marker.clone());

                let new_url = render_placeholders(url, &vars);
                if new_url.contains("{{") {
                    return Err(WorkflowError::Config(format!(
                        "Unresolved placeholder in rewrite url '{}'",
                        new_url
                    )));
                }
                let count = fs.rewrite_reference(target, marker, &new_url).await?;

                let notices = if count == 0 {
                    vec![StepNotice::notice(format!("No reference to {} found in {}", marker, target))]
                } else {
                    vec![StepNotice::info(format!("{} now points at {}", target, new_url))]
                };
                Ok(StepOutcome::success().with_notices(notices).with_writes(writes))
            }
        }
    }

    async fn delegate(&self, delegate: Delegate, context: &WorkflowContext) -> Result<(), WorkflowError> {
        let c = &self.collaborators;

        match delegate {
            Delegate::GitInit => c.source_control.init().await,
            Delegate::GitPush => c.source_control.push(require_version(context)?).await,
            Delegate::AppEngineDeploy => c.deployer.deploy_app_engine(require_version(context)?).await,
            Delegate::ElasticBeanstalkDeploy { staged } => {
                c.deployer
                    .deploy_elastic_beanstalk(require_version(context)?, staged)
                    .await
            }
            Delegate::DefaultDeploy => c.deployer.deploy_default(require_version(context)?).await,
            Delegate::BundleUpload { compressed } => c.uploader.upload(compressed).await,
        }
    }
}

fn require_version(context: &WorkflowContext) -> Result<&str, WorkflowError> {
    context
        .version
        .as_deref()
        .ok_or_else(|| WorkflowError::Validation("No release version in context".to_string()))
}
