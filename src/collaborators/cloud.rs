//! Cloud deploys through the gcloud and eb CLIs

use crate::collaborators::{run_checked, CloudDeployer, ConfigKind, ConfigStore};
use crate::core::{config::DeployConfig, Platform, WorkflowError};
use crate::execution::CommandExecutor;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// `CloudDeployer` shelling out to `gcloud` and `eb`
pub struct CliDeployer {
    executor: Arc<dyn CommandExecutor>,
    store: Arc<dyn ConfigStore>,
    config: DeployConfig,
    dir: PathBuf,
}

impl CliDeployer {
    pub fn new(
        executor: Arc<dyn CommandExecutor>,
        store: Arc<dyn ConfigStore>,
        config: DeployConfig,
        dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            executor,
            store,
            config,
            dir: dir.into(),
        }
    }

    /// App Engine version ids only allow lowercase letters, digits and hyphens
    pub fn app_engine_version_id(version: &str) -> String {
        version
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
            .collect()
    }

    fn app_engine_command(&self, version: &str) -> String {
        let mut command = format!(
            "gcloud app deploy --version {} --quiet",
            Self::app_engine_version_id(version)
        );

        // The project profile is optional; gcloud falls back to its own default
        match self.store.get_active(ConfigKind::AppEngine) {
            Ok(profile) => {
                if let Some(project) = profile.get("project") {
                    command.push_str(&format!(" --project {}", project));
                }
            }
            Err(e) => debug!("No App Engine profile, using gcloud default project: {}", e),
        }

        if !self.config.app_engine_promote {
            command.push_str(" --no-promote");
        }
        command
    }

    fn elastic_beanstalk_command(version: &str, staged: bool) -> String {
        let mut command = format!("eb deploy --label {}", version);
        if staged {
            command.push_str(" --staged");
        }
        command
    }
}

#[async_trait]
impl CloudDeployer for CliDeployer {
    async fn deploy_app_engine(&self, version: &str) -> Result<(), WorkflowError> {
        info!("Deploying {} to Google App Engine", version);
        let command = self.app_engine_command(version);
        run_checked(self.executor.as_ref(), &command, &self.dir).await?;
        Ok(())
    }

    async fn deploy_elastic_beanstalk(&self, version: &str, staged: bool) -> Result<(), WorkflowError> {
        info!("Deploying {} to Elastic Beanstalk (staged: {})", version, staged);
        let command = Self::elastic_beanstalk_command(version, staged);
        run_checked(self.executor.as_ref(), &command, &self.dir).await?;
        Ok(())
    }

    async fn deploy_default(&self, version: &str) -> Result<(), WorkflowError> {
        match self.config.default_target {
            Platform::Gae => self.deploy_app_engine(version).await,
            Platform::Eb => self.deploy_elastic_beanstalk(version, false).await,
        }
    }
}
