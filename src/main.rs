use anyhow::{Context, Result};
use release_flow::cli::output::{format_report_summary, format_step_table, style, INFO};
use release_flow::cli::terminal_output::TerminalReporter;
use release_flow::cli::{Cli, Command};
use release_flow::collaborators::{
    BuiltinTemplates, CliDeployer, Collaborators, ConfigStore, GitCli, LocalFileSystem, S3Uploader,
    YamlConfigStore,
};
use release_flow::core::config::ReleaseConfig;
use release_flow::core::PipelineReport;
use release_flow::execution::{CommandExecutor, ShellCommandExecutor};
use release_flow::prompt::{AssumeYes, PromptGateway, TerminalPrompt};
use release_flow::workflows::Orchestrator;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging; RUST_LOG wins over --verbose
    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    let dir = match &cli.dir {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    let mut orchestrator = build_orchestrator(&cli, &dir)?;

    if !cli.json {
        let reporter = Arc::new(TerminalReporter::new());
        orchestrator.add_event_handler(move |event| reporter.handle(&event));
    }

    let report = match &cli.command {
        Command::Init(cmd) => orchestrator.init(&cmd.project_name).await,
        Command::Deploy(cmd) => orchestrator.deploy(&cmd.version, cmd.platform.as_deref()).await,
    };

    print_report(&cli, &report)?;

    let code = report.result.exit_code();
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

/// Wire the command-line backed collaborators for `dir`
fn build_orchestrator(cli: &Cli, dir: &Path) -> Result<Orchestrator> {
    let config = match &cli.config {
        Some(path) => ReleaseConfig::from_file(path)
            .with_context(|| format!("Failed to load release config {}", path))?,
        None => ReleaseConfig::load_from_dir(dir).context("Failed to load release config")?,
    };

    let store_path = cli
        .store
        .as_ref()
        .map(PathBuf::from)
        .or_else(YamlConfigStore::default_path);
    let store = match store_path {
        Some(path) => {
            debug!("Using config store {}", path.display());
            YamlConfigStore::load(&path).with_context(|| format!("Failed to load config store {}", path.display()))?
        }
        None => YamlConfigStore::default(),
    };
    let store: Arc<dyn ConfigStore> = Arc::new(store);

    let commands: Arc<dyn CommandExecutor> = Arc::new(ShellCommandExecutor::new());
    let collaborators = Collaborators {
        source_control: Arc::new(GitCli::new(commands.clone(), dir)),
        deployer: Arc::new(CliDeployer::new(
            commands.clone(),
            store.clone(),
            config.deploy.clone(),
            dir,
        )),
        uploader: Arc::new(S3Uploader::new(
            commands.clone(),
            store.clone(),
            config.upload.clone(),
            dir,
        )),
        config_store: store,
        templater: Arc::new(BuiltinTemplates::new()),
        file_system: Arc::new(LocalFileSystem::new(dir)),
    };

    let prompt: Arc<dyn PromptGateway> = if cli.yes {
        Arc::new(AssumeYes)
    } else {
        Arc::new(TerminalPrompt::stdin())
    };

    Ok(Orchestrator::with_collaborators(
        commands,
        prompt,
        collaborators,
        config,
        dir,
    ))
}

fn print_report(cli: &Cli, report: &PipelineReport) -> Result<()> {
    if cli.json {
        println!("{}", report.to_json().context("Failed to serialize report")?);
        return Ok(());
    }

    if cli.verbose {
        println!("{} Steps of {}:", INFO, style(&report.workflow).bold());
        println!("{}", format_step_table(report));
    }
    println!("{}", format_report_summary(report));
    Ok(())
}
