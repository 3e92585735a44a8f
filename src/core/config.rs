//! Project release configuration from YAML

use crate::core::Platform;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default file name looked up in the project directory
pub const DEFAULT_CONFIG_FILE: &str = "release.yaml";

/// Top-level release configuration loaded from YAML
///
/// Every field has a default, so an absent or empty file yields a
/// usable configuration for a standard npm/webpack project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReleaseConfig {
    /// Project name used by deploy (defaults to the directory name)
    #[serde(default)]
    pub project_name: Option<String>,

    /// External commands run by Command steps
    #[serde(default)]
    pub commands: CommandsConfig,

    /// Rewrite of the bundle reference inside the built index file
    #[serde(default)]
    pub index_rewrite: Option<IndexRewriteConfig>,

    /// Bundle upload settings
    #[serde(default)]
    pub upload: UploadConfig,

    /// Cloud deploy settings
    #[serde(default)]
    pub deploy: DeployConfig,
}

/// Command lines, rendered with `{{ placeholders }}` before running
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandsConfig {
    #[serde(default = "default_test_command")]
    pub test: String,

    #[serde(default = "default_build_command")]
    pub build: String,

    #[serde(default = "default_install_command")]
    pub install: String,

    /// Starts a dev build in a separate process/terminal
    #[serde(default = "default_launch_command")]
    pub launch: String,
}

/// Index rewrite configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexRewriteConfig {
    /// File whose references get rewritten
    #[serde(default = "default_rewrite_target")]
    pub target: String,

    /// File name the rewritten references end with
    #[serde(default = "default_rewrite_marker")]
    pub marker: String,

    /// New URL template, rendered with `storage.*` and `marker`
    #[serde(default = "default_rewrite_url")]
    pub url: String,
}

/// Bundle upload configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Built bundle to upload
    #[serde(default = "default_bundle_path")]
    pub bundle: String,

    /// Upload the gzip-compressed bundle (`<bundle>.gz`)
    #[serde(default = "default_true")]
    pub compressed: bool,

    /// Object key prefix inside the bucket
    #[serde(default)]
    pub key_prefix: String,
}

/// Cloud deploy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Target used when no platform is given on the command line
    #[serde(default = "default_target")]
    pub default_target: Platform,

    /// Promote the new App Engine version to receive all traffic
    #[serde(default = "default_true")]
    pub app_engine_promote: bool,
}

fn default_test_command() -> String {
    "npm run test".to_string()
}

fn default_build_command() -> String {
    "npm run build:prod".to_string()
}

fn default_install_command() -> String {
    "npm install".to_string()
}

fn default_launch_command() -> String {
    if cfg!(target_os = "macos") {
        r#"osascript -e 'tell application "Terminal" to do script "cd {{ cwd }}; npm run build;"'"#
            .to_string()
    } else {
        "nohup npm run build > build.log 2>&1 &".to_string()
    }
}

fn default_rewrite_target() -> String {
    "build/index.html".to_string()
}

fn default_rewrite_marker() -> String {
    "bundle.js".to_string()
}

fn default_rewrite_url() -> String {
    "https://s3.{{ storage.region }}.amazonaws.com/{{ storage.bucket }}/{{ marker }}".to_string()
}

fn default_bundle_path() -> String {
    "build/bundle.js".to_string()
}

fn default_target() -> Platform {
    Platform::Gae
}

fn default_true() -> bool {
    true
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            test: default_test_command(),
            build: default_build_command(),
            install: default_install_command(),
            launch: default_launch_command(),
        }
    }
}

impl Default for IndexRewriteConfig {
    fn default() -> Self {
        Self {
            target: default_rewrite_target(),
            marker: default_rewrite_marker(),
            url: default_rewrite_url(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            bundle: default_bundle_path(),
            compressed: true,
            key_prefix: String::new(),
        }
    }
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            default_target: default_target(),
            app_engine_promote: true,
        }
    }
}

impl ReleaseConfig {
    /// Load release configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load `release.yaml` from a project directory, falling back to defaults
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let path = dir.as_ref().join(DEFAULT_CONFIG_FILE);
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse release configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: ReleaseConfig = if yaml.trim().is_empty() {
            ReleaseConfig::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the release configuration
    pub fn validate(&self) -> Result<()> {
        let commands = [
            ("test", &self.commands.test),
            ("build", &self.commands.build),
            ("install", &self.commands.install),
            ("launch", &self.commands.launch),
        ];
        for (name, command) in commands {
            if command.trim().is_empty() {
                anyhow::bail!("Command '{}' must not be empty", name);
            }
        }

        if let Some(rewrite) = &self.index_rewrite {
            if rewrite.marker.trim().is_empty() {
                anyhow::bail!("index_rewrite.marker must not be empty");
            }
            if rewrite.target.trim().is_empty() {
                anyhow::bail!("index_rewrite.target must not be empty");
            }
        }

        if self.upload.bundle.trim().is_empty() {
            anyhow::bail!("upload.bundle must not be empty");
        }

        Ok(())
    }
}
