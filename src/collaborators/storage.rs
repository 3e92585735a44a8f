//! Bundle upload to S3 through the aws CLI

use crate::collaborators::{run_checked, BundleUploader, ConfigKind, ConfigStore};
use crate::core::{config::UploadConfig, WorkflowError};
use crate::execution::CommandExecutor;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// `BundleUploader` copying the bundle into the active storage bucket
pub struct S3Uploader {
    executor: Arc<dyn CommandExecutor>,
    store: Arc<dyn ConfigStore>,
    config: UploadConfig,
    dir: PathBuf,
}

impl S3Uploader {
    pub fn new(
        executor: Arc<dyn CommandExecutor>,
        store: Arc<dyn ConfigStore>,
        config: UploadConfig,
        dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            executor,
            store,
            config,
            dir: dir.into(),
        }
    }

    /// Object key of the bundle inside the bucket
    pub fn object_key(&self) -> String {
        let file_name = Path::new(&self.config.bundle)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.config.bundle.clone());
        format!("{}{}", self.config.key_prefix, file_name)
    }

    fn upload_command(&self, bucket: &str, region: &str, compressed: bool) -> String {
        let source = if compressed {
            format!("{}.gz", self.config.bundle)
        } else {
            self.config.bundle.clone()
        };

        let mut command = format!(
            "aws s3 cp {} s3://{}/{} --region {} --content-type application/javascript",
            source,
            bucket,
            self.object_key(),
            region
        );
        if compressed {
            command.push_str(" --content-encoding gzip");
        }
        command
    }
}

#[async_trait]
impl BundleUploader for S3Uploader {
    async fn upload(&self, compressed: bool) -> Result<(), WorkflowError> {
        let storage = self.store.get_active(ConfigKind::Storage)?;
        let bucket = storage.require("bucket")?;
        let region = storage.require("region")?;

        info!("Uploading bundle to s3://{}/{}", bucket, self.object_key());
        let command = self.upload_command(bucket, region, compressed);
        run_checked(self.executor.as_ref(), &command, &self.dir).await?;
        Ok(())
    }
}
