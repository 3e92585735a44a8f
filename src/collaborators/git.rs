//! Source control through the git CLI

use crate::collaborators::{run_checked, SourceControl};
use crate::core::WorkflowError;
use crate::execution::CommandExecutor;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// `SourceControl` backed by the `git` executable
pub struct GitCli {
    executor: Arc<dyn CommandExecutor>,
    dir: PathBuf,
}

impl GitCli {
    pub fn new(executor: Arc<dyn CommandExecutor>, dir: impl Into<PathBuf>) -> Self {
        Self {
            executor,
            dir: dir.into(),
        }
    }

    /// Commands that publish a release, in order
    pub fn push_commands(version: &str) -> Vec<String> {
        vec![
            "git add -A".to_string(),
            format!("git commit --allow-empty -m \"Release {}\"", version),
            format!("git tag v{}", version),
            "git push --follow-tags".to_string(),
        ]
    }
}

#[async_trait]
impl SourceControl for GitCli {
    async fn init(&self) -> Result<(), WorkflowError> {
        info!("Initialising git repository in {}", self.dir.display());
        run_checked(self.executor.as_ref(), "git init", &self.dir).await?;
        Ok(())
    }

    async fn push(&self, version: &str) -> Result<(), WorkflowError> {
        info!("Pushing version {} to git", version);
        for command in Self::push_commands(version) {
            run_checked(self.executor.as_ref(), &command, &self.dir).await?;
        }
        Ok(())
    }
}
