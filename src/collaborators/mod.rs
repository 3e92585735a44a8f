//! External collaborators consumed by the workflow core
//!
//! Each trait is a narrow contract. The default implementations shell out
//! through the same [`CommandExecutor`] the pipeline uses, or touch the local
//! filesystem; tests substitute their own.

pub mod cloud;
pub mod config_store;
pub mod fs;
pub mod git;
pub mod storage;
pub mod templates;

use crate::core::WorkflowError;
use crate::execution::{CommandExecutor, CommandOutput};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

pub use cloud::CliDeployer;
pub use config_store::{ActiveConfig, ConfigKind, YamlConfigStore};
pub use fs::LocalFileSystem;
pub use git::GitCli;
pub use storage::S3Uploader;
pub use templates::BuiltinTemplates;

/// Source-control side effects
#[async_trait]
pub trait SourceControl: Send + Sync {
    /// Initialize local source-control state
    async fn init(&self) -> Result<(), WorkflowError>;

    /// Commit, tag and push the given version
    async fn push(&self, version: &str) -> Result<(), WorkflowError>;
}

/// Cloud deploy delegates, one per supported platform
#[async_trait]
pub trait CloudDeployer: Send + Sync {
    async fn deploy_app_engine(&self, version: &str) -> Result<(), WorkflowError>;

    async fn deploy_elastic_beanstalk(&self, version: &str, staged: bool) -> Result<(), WorkflowError>;

    /// Single-target deploy used when no platform was chosen
    async fn deploy_default(&self, version: &str) -> Result<(), WorkflowError>;
}

/// Object-storage publishing of the built bundle
#[async_trait]
pub trait BundleUploader: Send + Sync {
    async fn upload(&self, compressed: bool) -> Result<(), WorkflowError>;
}

/// Named configuration profiles with one active profile per kind
pub trait ConfigStore: Send + Sync {
    /// The active profile of `kind`, or `ConfigurationMissing`
    fn get_active(&self, kind: ConfigKind) -> Result<ActiveConfig, WorkflowError>;

    /// Fail with `ConfigurationMissing` unless a profile of `kind` is active
    fn require_active(&self, kind: ConfigKind) -> Result<(), WorkflowError> {
        self.get_active(kind).map(|_| ())
    }
}

/// Produces generated file contents
pub trait Templater: Send + Sync {
    fn render(&self, template: &str, params: &HashMap<String, String>) -> Result<String, WorkflowError>;
}

/// File primitives, paths relative to the project directory
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Create a directory and its parents; existing directories are fine
    async fn make_dir(&self, path: &str) -> Result<(), WorkflowError>;

    /// Create or overwrite a file
    async fn create(&self, path: &str, contents: &str) -> Result<(), WorkflowError>;

    /// Point every reference to `marker` inside `target` at `new_url`.
    /// Returns the number of rewritten references.
    async fn rewrite_reference(&self, target: &str, marker: &str, new_url: &str) -> Result<usize, WorkflowError>;
}

/// Everything a workflow may call besides commands and prompts
#[derive(Clone)]
pub struct Collaborators {
    pub source_control: Arc<dyn SourceControl>,
    pub deployer: Arc<dyn CloudDeployer>,
    pub uploader: Arc<dyn BundleUploader>,
    pub config_store: Arc<dyn ConfigStore>,
    pub templater: Arc<dyn Templater>,
    pub file_system: Arc<dyn FileSystem>,
}

/// Run a command and turn a non-zero exit status into `ExternalCommand`
pub(crate) async fn run_checked(
    executor: &dyn CommandExecutor,
    command: &str,
    cwd: &Path,
) -> Result<CommandOutput, WorkflowError> {
    let output = executor.run(command, Some(cwd)).await?;

    if !output.success() {
        warn!("`{}` exited with {:?}", command, output.exit_code);
        let stderr = if output.stderr.trim().is_empty() {
            format!("exit code {:?}", output.exit_code)
        } else {
            output.stderr.trim_end().to_string()
        };
        return Err(WorkflowError::ExternalCommand {
            command: command.to_string(),
            stderr,
        });
    }

    Ok(output)
}
