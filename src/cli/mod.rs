//! Command-line interface

pub mod commands;
pub mod output;
pub mod terminal_output;

use clap::{Parser, Subcommand};
use commands::{DeployCommand, InitCommand};
use std::ffi::OsString;

/// Init and deploy workflows for front-end projects
#[derive(Debug, Parser, Clone)]
#[command(name = "release-flow")]
#[command(version = "0.1.0")]
#[command(about = "Init and deploy workflows for front-end projects", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the release configuration file (default: <dir>/release.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Path to the configuration profile store
    #[arg(long, global = true)]
    pub store: Option<String>,

    /// Project directory (default: current directory)
    #[arg(short, long, global = true)]
    pub dir: Option<String>,

    /// Answer "y" to every yes/no prompt
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Print the run report as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Scaffold a new project
    Init(InitCommand),

    /// Deploy a release
    Deploy(DeployCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}
