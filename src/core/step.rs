//! Step domain model

use crate::core::{state::StepState, Platform, WorkflowContext};
use crate::execution::CommandPurpose;
use crate::prompt::PromptRequest;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The tag of a step's action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Command,
    Prompt,
    FileOp,
    Delegate,
    Notice,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StepKind::Command => "command",
            StepKind::Prompt => "prompt",
            StepKind::FileOp => "file_op",
            StepKind::Delegate => "delegate",
            StepKind::Notice => "notice",
        };
        f.write_str(name)
    }
}

/// What a step does when it runs
#[derive(Debug, Clone)]
pub enum StepAction {
    /// Run an external command and classify its output
    Command {
        purpose: CommandPurpose,
        /// Command line, may contain `{{ placeholders }}`
        command: String,
    },
    /// Ask the operator and store the answer under `key`
    Prompt {
        key: String,
        request: PromptRequest,
        /// Abort the run unless the answer is yes
        abort_on_decline: bool,
    },
    /// Mutate the project's files
    FileOp(FileOp),
    /// Hand off to an external collaborator
    Delegate(Delegate),
    /// Report messages to the operator
    Notice(Vec<StepNotice>),
}

/// File mutations available to steps
#[derive(Debug, Clone)]
pub enum FileOp {
    /// Create directories (pre-existing ones are fine)
    MakeDirs(Vec<String>),
    /// Render templates into files
    CreateFiles(Vec<FileSpec>),
    /// Point references to `marker` inside `target` at the active storage location
    RewriteReference {
        target: String,
        marker: String,
        /// URL template rendered with the resolved storage values
        url: String,
    },
}

/// One generated file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSpec {
    /// Path relative to the working directory
    pub path: String,
    /// Template name passed to the templater
    pub template: String,
}

impl FileSpec {
    pub fn new(path: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            template: template.into(),
        }
    }
}

/// External collaborator calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delegate {
    GitInit,
    GitPush,
    AppEngineDeploy,
    ElasticBeanstalkDeploy { staged: bool },
    DefaultDeploy,
    BundleUpload { compressed: bool },
}

impl fmt::Display for Delegate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delegate::GitInit => write!(f, "git-init"),
            Delegate::GitPush => write!(f, "git-push"),
            Delegate::AppEngineDeploy => write!(f, "app-engine-deploy"),
            Delegate::ElasticBeanstalkDeploy { staged } => {
                write!(f, "elastic-beanstalk-deploy (staged={})", staged)
            }
            Delegate::DefaultDeploy => write!(f, "default-deploy"),
            Delegate::BundleUpload { compressed } => {
                write!(f, "bundle-upload (compressed={})", compressed)
            }
        }
    }
}

/// Severity of an operator-facing message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Notice,
    Success,
    Error,
}

/// A message produced by a step for the operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepNotice {
    pub level: NoticeLevel,
    pub message: String,
}

impl StepNotice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn notice(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Notice, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }
}

/// Decides at run time whether a step executes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepCondition {
    /// The prompt stored under this key was answered yes
    Confirmed(String),
    /// The run targets exactly this platform (`None` = no platform supplied)
    Platform(Option<Platform>),
}

impl StepCondition {
    /// Evaluate against the current context
    pub fn evaluate(&self, context: &WorkflowContext) -> bool {
        match self {
            StepCondition::Confirmed(key) => context.confirmed(key),
            StepCondition::Platform(platform) => context.platform == *platform,
        }
    }

    /// Human-readable reason used when the step is skipped
    pub fn skip_reason(&self) -> String {
        match self {
            StepCondition::Confirmed(key) => format!("'{}' was not confirmed", key),
            StepCondition::Platform(Some(platform)) => format!("platform is not {}", platform),
            StepCondition::Platform(None) => "an explicit platform was supplied".to_string(),
        }
    }
}

/// A single step in a workflow
#[derive(Debug, Clone)]
pub struct Step {
    /// Step identifier, reported on abort
    pub name: String,

    /// Progress message shown when the step starts
    pub description: Option<String>,

    pub action: StepAction,

    /// Evaluated right before the step would run
    pub condition: Option<StepCondition>,

    /// Whether a Warning verdict still lets the run continue
    pub continue_on_warning: bool,

    /// Runtime state
    pub state: StepState,
}

impl Step {
    pub fn new(name: impl Into<String>, action: StepAction) -> Self {
        Self {
            name: name.into(),
            description: None,
            action,
            condition: None,
            continue_on_warning: true,
            state: StepState::Pending,
        }
    }

    pub fn command(name: impl Into<String>, purpose: CommandPurpose, command: impl Into<String>) -> Self {
        Self::new(
            name,
            StepAction::Command {
                purpose,
                command: command.into(),
            },
        )
    }

    /// A yes/no gate whose answer later steps can depend on
    pub fn confirm(name: impl Into<String>, key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            name,
            StepAction::Prompt {
                key: key.into(),
                request: PromptRequest::new(message, true),
                abort_on_decline: false,
            },
        )
    }

    /// A yes/no gate that aborts the run when declined
    pub fn require_confirmation(
        name: impl Into<String>,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(
            name,
            StepAction::Prompt {
                key: key.into(),
                request: PromptRequest::new(message, true),
                abort_on_decline: true,
            },
        )
    }

    pub fn file_op(name: impl Into<String>, op: FileOp) -> Self {
        Self::new(name, StepAction::FileOp(op))
    }

    pub fn delegate(name: impl Into<String>, delegate: Delegate) -> Self {
        Self::new(name, StepAction::Delegate(delegate))
    }

    pub fn notice(name: impl Into<String>, notices: Vec<StepNotice>) -> Self {
        Self::new(name, StepAction::Notice(notices))
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn when(mut self, condition: StepCondition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn kind(&self) -> StepKind {
        match self.action {
            StepAction::Command { .. } => StepKind::Command,
            StepAction::Prompt { .. } => StepKind::Prompt,
            StepAction::FileOp(_) => StepKind::FileOp,
            StepAction::Delegate(_) => StepKind::Delegate,
            StepAction::Notice(_) => StepKind::Notice,
        }
    }

    /// Whether the step should run given the current context
    pub fn should_run(&self, context: &WorkflowContext) -> bool {
        self.condition
            .as_ref()
            .map_or(true, |condition| condition.evaluate(context))
    }
}
