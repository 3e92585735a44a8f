//! YAML-backed configuration profile store

use crate::collaborators::ConfigStore;
use crate::core::WorkflowError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Kinds of external configuration a workflow may need
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigKind {
    /// Object storage (bucket, region)
    Storage,
    /// App Engine (project)
    AppEngine,
}

impl fmt::Display for ConfigKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigKind::Storage => f.write_str("storage"),
            ConfigKind::AppEngine => f.write_str("app engine"),
        }
    }
}

/// The active profile of one kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveConfig {
    pub name: String,
    pub values: BTreeMap<String, String>,
}

impl ActiveConfig {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// A value the caller cannot do without
    pub fn require(&self, key: &str) -> Result<&str, WorkflowError> {
        self.get(key).ok_or_else(|| {
            WorkflowError::Config(format!("Profile '{}' has no '{}' value", self.name, key))
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct KindSection {
    #[serde(default)]
    active: Option<String>,
    #[serde(default)]
    profiles: BTreeMap<String, BTreeMap<String, String>>,
}

/// Profiles per kind, loaded from a YAML file
///
/// ```yaml
/// storage:
///   active: production
///   profiles:
///     production:
///       bucket: my-assets
///       region: eu-west-1
/// ```
#[derive(Debug, Clone, Default)]
pub struct YamlConfigStore {
    sections: BTreeMap<ConfigKind, KindSection>,
}

impl YamlConfigStore {
    /// Default store location: `<config dir>/release-flow/store.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("release-flow").join("store.yaml"))
    }

    /// Load a store file; a missing file is an empty store
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, WorkflowError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No config store at {}, starting empty", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| WorkflowError::fs(path, e))?;
        Self::from_yaml(&content)
    }

    /// Parse a store from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, WorkflowError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let sections: BTreeMap<ConfigKind, KindSection> = serde_yaml::from_str(yaml)
            .map_err(|e| WorkflowError::Config(format!("Invalid config store: {}", e)))?;
        Ok(Self { sections })
    }
}

impl ConfigStore for YamlConfigStore {
    fn get_active(&self, kind: ConfigKind) -> Result<ActiveConfig, WorkflowError> {
        let missing = || WorkflowError::ConfigurationMissing { kind };

        let section = self.sections.get(&kind).ok_or_else(missing)?;
        let name = section.active.as_ref().ok_or_else(missing)?;
        let values = section.profiles.get(name).ok_or_else(missing)?;

        Ok(ActiveConfig {
            name: name.clone(),
            values: values.clone(),
        })
    }
}
