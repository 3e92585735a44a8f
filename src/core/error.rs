//! Workflow error taxonomy

use std::path::PathBuf;
use thiserror::Error;

use crate::collaborators::ConfigKind;

/// Every way a workflow run can be aborted.
///
/// Non-fatal issues (package-install warnings, test stderr) never become a
/// `WorkflowError`; they travel as notices on the step outcome instead.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Malformed input, raised before any side effect runs
    #[error("Validation error: {0}")]
    Validation(String),

    /// The operator declined a required confirmation
    #[error("{0}")]
    UserAbort(String),

    /// A command's output was classified as a fatal error
    #[error("Command '{command}' failed: {stderr}")]
    ExternalCommand { command: String, stderr: String },

    /// A required external configuration has no active profile
    #[error("No active {kind} configuration found")]
    ConfigurationMissing { kind: ConfigKind },

    /// The command executor could not run the command at all
    #[error("Failed to execute '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// A file mutation failed
    #[error("File operation on {} failed: {source}", path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A template name the templater does not know
    #[error("Unknown template: {0}")]
    Template(String),

    /// Unreadable or invalid configuration file
    #[error("Configuration error: {0}")]
    Config(String),
}

impl WorkflowError {
    /// Short machine-friendly name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            WorkflowError::Validation(_) => "validation",
            WorkflowError::UserAbort(_) => "user_abort",
            WorkflowError::ExternalCommand { .. } => "external_command",
            WorkflowError::ConfigurationMissing { .. } => "configuration_missing",
            WorkflowError::Spawn { .. } => "spawn",
            WorkflowError::FileSystem { .. } => "file_system",
            WorkflowError::Template(_) => "template",
            WorkflowError::Config(_) => "config",
        }
    }

    pub(crate) fn fs(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        WorkflowError::FileSystem {
            path: path.into(),
            source,
        }
    }
}
