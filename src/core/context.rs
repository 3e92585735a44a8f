//! Workflow context - state threaded through a single pipeline run

use crate::core::Platform;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::OnceLock;

static PLACEHOLDER: OnceLock<Option<Regex>> = OnceLock::new();

/// Mutable record carried through one pipeline run
///
/// Created at workflow entry, read by every step and written only through
/// the [`ContextWrite`]s a step hands back to the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowContext {
    /// Project name (init argument, or the configured/derived name on deploy)
    pub project_name: String,

    /// Release version being deployed
    pub version: Option<String>,

    /// Explicit deploy target
    pub platform: Option<Platform>,

    /// Directory the workflow operates in
    pub working_dir: PathBuf,

    /// Configuration resolved by collaborators during the run
    /// (e.g. `storage.bucket`, `storage.region`)
    pub resolved: HashMap<String, String>,

    /// Operator answers keyed by prompt key
    pub answers: HashMap<String, String>,
}

/// A single write a step asks the pipeline to merge into the context
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextWrite {
    Resolved { key: String, value: String },
    Answer { key: String, value: String },
}

impl WorkflowContext {
    /// Create a new context for a project
    pub fn new(project_name: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_name: project_name.into(),
            version: None,
            platform: None,
            working_dir: working_dir.into(),
            resolved: HashMap::new(),
            answers: HashMap::new(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_platform(mut self, platform: Option<Platform>) -> Self {
        self.platform = platform;
        self
    }

    /// Apply a step's writes
    pub fn merge(&mut self, writes: Vec<ContextWrite>) {
        for write in writes {
            match write {
                ContextWrite::Resolved { key, value } => {
                    self.resolved.insert(key, value);
                }
                ContextWrite::Answer { key, value } => {
                    self.answers.insert(key, value);
                }
            }
        }
    }

    /// Whether the prompt stored under `key` was answered yes
    pub fn confirmed(&self, key: &str) -> bool {
        self.answers
            .get(key)
            .is_some_and(|answer| crate::prompt::is_yes(answer))
    }

    /// Get all variables available for placeholder rendering
    pub fn get_rendering_variables(&self) -> HashMap<String, String> {
        let mut vars = self.resolved.clone();

        vars.insert("project_name".to_string(), self.project_name.clone());
        vars.insert("cwd".to_string(), self.working_dir.display().to_string());

        if let Some(ref version) = self.version {
            vars.insert("version".to_string(), version.clone());
        }
        if let Some(platform) = self.platform {
            vars.insert("platform".to_string(), platform.to_string());
        }

        vars
    }
}

/// Replace `{{ name }}` placeholders with their values
///
/// Single pass: substituted values are never expanded again. Unknown
/// placeholders are left untouched.
pub fn render_placeholders(template: &str, variables: &HashMap<String, String>) -> String {
    let placeholder = PLACEHOLDER.get_or_init(|| Regex::new(r"\{\{ (\w[\w.]*) \}\}").ok());
    let Some(re) = placeholder else {
        return template.to_string();
    };

    re.replace_all(template, |caps: &Captures| match variables.get(&caps[1]) {
        Some(value) => value.clone(),
        None => caps[0].to_string(),
    })
    .into_owned()
}
