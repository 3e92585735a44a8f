//! CLI command definitions

use clap::Args;

/// Scaffold a new front-end project in the working directory
#[derive(Debug, Args, Clone)]
pub struct InitCommand {
    /// Name of the new project
    pub project_name: String,
}

/// Test, build and publish a release
#[derive(Debug, Args, Clone)]
pub struct DeployCommand {
    /// Version being released (e.g. 1.2.0)
    pub version: String,

    /// Target platform: eb or gae (default target when omitted)
    pub platform: Option<String>,
}
