//! Local filesystem primitives

use crate::collaborators::FileSystem;
use crate::core::WorkflowError;
use async_trait::async_trait;
use regex::{Captures, Regex};
use std::path::PathBuf;
use tracing::{debug, warn};

/// `FileSystem` rooted at the project directory
#[derive(Debug, Clone)]
pub struct LocalFileSystem {
    root: PathBuf,
}

impl LocalFileSystem {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let relative = path.strip_prefix("./").unwrap_or(path);
        self.root.join(relative)
    }
}

/// Replace `src`/`href` URLs ending in `marker` with `new_url`
///
/// Returns the rewritten text and the number of replaced references.
pub fn rewrite_references(content: &str, marker: &str, new_url: &str) -> (String, usize) {
    let pattern = format!(
        r#"(?P<open>\b(?:src|href)\s*=\s*["'])[^"']*{}(?P<close>["'])"#,
        regex::escape(marker)
    );
    // The pattern is built from an escaped literal, so it always compiles
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(_) => return (content.to_string(), 0),
    };

    let mut count = 0;
    let rewritten = re.replace_all(content, |caps: &Captures| {
        count += 1;
        format!("{}{}{}", &caps["open"], new_url, &caps["close"])
    });

    (rewritten.into_owned(), count)
}

#[async_trait]
impl FileSystem for LocalFileSystem {
    async fn make_dir(&self, path: &str) -> Result<(), WorkflowError> {
        let full = self.resolve(path);
        debug!("Creating directory {}", full.display());
        tokio::fs::create_dir_all(&full)
            .await
            .map_err(|e| WorkflowError::fs(full, e))
    }

    async fn create(&self, path: &str, contents: &str) -> Result<(), WorkflowError> {
        let full = self.resolve(path);
        debug!("Writing {} ({} bytes)", full.display(), contents.len());

        if let Some(parent) = full.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| WorkflowError::fs(parent, e))?;
        }
        tokio::fs::write(&full, contents)
            .await
            .map_err(|e| WorkflowError::fs(full, e))
    }

    async fn rewrite_reference(&self, target: &str, marker: &str, new_url: &str) -> Result<usize, WorkflowError> {
        let full = self.resolve(target);
        let content = tokio::fs::read_to_string(&full)
            .await
            .map_err(|e| WorkflowError::fs(&full, e))?;

        let (rewritten, count) = rewrite_references(&content, marker, new_url);
        if count == 0 {
            warn!("No reference to {} found in {}", marker, full.display());
            return Ok(0);
        }

        tokio::fs::write(&full, rewritten)
            .await
            .map_err(|e| WorkflowError::fs(full, e))?;
        Ok(count)
    }
}
