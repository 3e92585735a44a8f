//! Fakes and assertions shared by the workflow scenarios
//!
//! Every fake writes into one ordered call log, so a scenario can assert the
//! exact sequence of side effects a run produced.

use async_trait::async_trait;
use release_flow::collaborators::{
    ActiveConfig, BuiltinTemplates, BundleUploader, CloudDeployer, Collaborators, ConfigKind,
    ConfigStore, FileSystem, SourceControl, Templater,
};
use release_flow::core::config::{IndexRewriteConfig, ReleaseConfig};
use release_flow::core::{PipelineReport, WorkflowError};
use release_flow::execution::{CommandExecutor, CommandOutput, ExecutionEvent};
use release_flow::prompt::{PromptGateway, PromptRequest, PromptResponse};
use release_flow::workflows::Orchestrator;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::path::Path;
use std::sync::{Arc, Mutex};

pub type CallLog = Arc<Mutex<Vec<String>>>;

fn record(log: &CallLog, entry: String) {
    log.lock().unwrap().push(entry);
}

/// Command executor replying with canned outputs matched by prefix
pub struct ScriptedCommands {
    log: CallLog,
    replies: Vec<(String, CommandOutput)>,
    spawn_failures: Vec<String>,
}

#[async_trait]
impl CommandExecutor for ScriptedCommands {
    async fn run(&self, command: &str, _cwd: Option<&Path>) -> Result<CommandOutput, WorkflowError> {
        record(&self.log, format!("command {}", command));

        if self.spawn_failures.iter().any(|prefix| command.starts_with(prefix.as_str())) {
            return Err(WorkflowError::Spawn {
                command: command.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "command not found"),
            });
        }

        Ok(self
            .replies
            .iter()
            .find(|(prefix, _)| command.starts_with(prefix.as_str()))
            .map(|(_, output)| output.clone())
            .unwrap_or_else(|| CommandOutput::new("", "")))
    }
}

/// Prompt gateway answering from a queue; an empty queue is closed input
pub struct ScriptedPrompt {
    log: CallLog,
    answers: Mutex<VecDeque<String>>,
}

#[async_trait]
impl PromptGateway for ScriptedPrompt {
    async fn ask(&self, request: &PromptRequest) -> Result<PromptResponse, WorkflowError> {
        record(&self.log, format!("prompt {}", request.message));
        match self.answers.lock().unwrap().pop_front() {
            Some(answer) => Ok(PromptResponse::new(answer)),
            None => Err(WorkflowError::UserAbort("No answer scripted".to_string())),
        }
    }
}

/// Source control, deployers, uploader and file system in one recorder
pub struct FakeCollaborators {
    log: CallLog,
    fail_on: Option<String>,
    pub files: Mutex<BTreeMap<String, String>>,
}

impl FakeCollaborators {
    fn call(&self, entry: String) -> Result<(), WorkflowError> {
        let fails = self
            .fail_on
            .as_ref()
            .is_some_and(|prefix| entry.starts_with(prefix.as_str()));
        record(&self.log, entry.clone());

        if fails {
            return Err(WorkflowError::ExternalCommand {
                command: entry,
                stderr: "simulated failure".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl SourceControl for FakeCollaborators {
    async fn init(&self) -> Result<(), WorkflowError> {
        self.call("git.init".to_string())
    }

    async fn push(&self, version: &str) -> Result<(), WorkflowError> {
        self.call(format!("git.push {}", version))
    }
}

#[async_trait]
impl CloudDeployer for FakeCollaborators {
    async fn deploy_app_engine(&self, version: &str) -> Result<(), WorkflowError> {
        self.call(format!("deploy.app_engine {}", version))
    }

    async fn deploy_elastic_beanstalk(&self, version: &str, staged: bool) -> Result<(), WorkflowError> {
        self.call(format!("deploy.elastic_beanstalk {} staged={}", version, staged))
    }

    async fn deploy_default(&self, version: &str) -> Result<(), WorkflowError> {
        self.call(format!("deploy.default {}", version))
    }
}

#[async_trait]
impl BundleUploader for FakeCollaborators {
    async fn upload(&self, compressed: bool) -> Result<(), WorkflowError> {
        self.call(format!("upload compressed={}", compressed))
    }
}

#[async_trait]
impl FileSystem for FakeCollaborators {
    async fn make_dir(&self, path: &str) -> Result<(), WorkflowError> {
        self.call(format!("fs.make_dir {}", path))
    }

    async fn create(&self, path: &str, contents: &str) -> Result<(), WorkflowError> {
        self.call(format!("fs.create {}", path))?;
        self.files.lock().unwrap().insert(path.to_string(), contents.to_string());
        Ok(())
    }

    async fn rewrite_reference(&self, target: &str, marker: &str, new_url: &str) -> Result<usize, WorkflowError> {
        self.call(format!("fs.rewrite_reference {} {} {}", target, marker, new_url))?;
        Ok(1)
    }
}

/// Built-in templates behind a recorder
pub struct RecordingTemplater {
    log: CallLog,
}

impl Templater for RecordingTemplater {
    fn render(&self, template: &str, params: &HashMap<String, String>) -> Result<String, WorkflowError> {
        record(&self.log, format!("templater.render {}", template));
        BuiltinTemplates.render(template, params)
    }
}

/// Config store with at most one storage profile
pub struct FakeStore {
    log: CallLog,
    storage: Option<ActiveConfig>,
}

impl ConfigStore for FakeStore {
    fn require_active(&self, kind: ConfigKind) -> Result<(), WorkflowError> {
        record(&self.log, format!("config.require_active {}", kind));
        match (kind, &self.storage) {
            (ConfigKind::Storage, Some(_)) => Ok(()),
            _ => Err(WorkflowError::ConfigurationMissing { kind }),
        }
    }

    fn get_active(&self, kind: ConfigKind) -> Result<ActiveConfig, WorkflowError> {
        record(&self.log, format!("config.get_active {}", kind));
        match (kind, &self.storage) {
            (ConfigKind::Storage, Some(active)) => Ok(active.clone()),
            _ => Err(WorkflowError::ConfigurationMissing { kind }),
        }
    }
}

/// Scenario setup
#[derive(Default)]
pub struct Setup {
    pub replies: Vec<(&'static str, CommandOutput)>,
    pub spawn_failures: Vec<&'static str>,
    pub answers: Vec<&'static str>,
    /// An active storage profile (bucket `assets`, region `eu-west-1`)
    pub storage: bool,
    /// Replaces the values of the storage profile when non-empty
    pub storage_values: Vec<(&'static str, &'static str)>,
    pub index_rewrite: bool,
    /// Fail the first collaborator call starting with this prefix
    pub fail_on: Option<&'static str>,
}

pub struct Harness {
    pub log: CallLog,
    pub events: Arc<Mutex<Vec<ExecutionEvent>>>,
    pub fakes: Arc<FakeCollaborators>,
    pub orchestrator: Orchestrator,
}

pub fn harness(setup: Setup) -> Harness {
    let log: CallLog = Arc::new(Mutex::new(Vec::new()));

    let commands = Arc::new(ScriptedCommands {
        log: log.clone(),
        replies: setup
            .replies
            .into_iter()
            .map(|(prefix, output)| (prefix.to_string(), output))
            .collect(),
        spawn_failures: setup.spawn_failures.iter().map(|s| s.to_string()).collect(),
    });
    let prompt = Arc::new(ScriptedPrompt {
        log: log.clone(),
        answers: Mutex::new(setup.answers.iter().map(|s| s.to_string()).collect()),
    });
    let fakes = Arc::new(FakeCollaborators {
        log: log.clone(),
        fail_on: setup.fail_on.map(str::to_string),
        files: Mutex::new(BTreeMap::new()),
    });

    let values = if setup.storage_values.is_empty() {
        vec![("bucket", "assets"), ("region", "eu-west-1")]
    } else {
        setup.storage_values
    };
    let storage = setup.storage.then(|| ActiveConfig {
        name: "production".to_string(),
        values: values
            .into_iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect(),
    });

    let collaborators = Collaborators {
        source_control: fakes.clone(),
        deployer: fakes.clone(),
        uploader: fakes.clone(),
        config_store: Arc::new(FakeStore {
            log: log.clone(),
            storage,
        }),
        templater: Arc::new(RecordingTemplater { log: log.clone() }),
        file_system: fakes.clone(),
    };

    let mut config = ReleaseConfig::default();
    config.project_name = Some("shop-front".to_string());
    config.commands.launch = "open-terminal npm run build".to_string();
    if setup.index_rewrite {
        config.index_rewrite = Some(IndexRewriteConfig::default());
    }

    let mut orchestrator = Orchestrator::with_collaborators(commands, prompt, collaborators, config, "/work");

    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    orchestrator.add_event_handler(move |event| sink.lock().unwrap().push(event));

    Harness {
        log,
        events,
        fakes,
        orchestrator,
    }
}

impl Harness {
    pub fn calls(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    /// Calls starting with `prefix`, in order
    pub fn calls_with(&self, prefix: &str) -> Vec<String> {
        self.calls().into_iter().filter(|c| c.starts_with(prefix)).collect()
    }

    /// Every notice message emitted during the run
    pub fn notices(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                ExecutionEvent::StepNotice { notice, .. } => Some(notice.message.clone()),
                _ => None,
            })
            .collect()
    }
}

pub fn assert_completed(report: &PipelineReport) {
    assert!(
        report.result.is_completed(),
        "Expected completed run, aborted at {:?}: {:?}",
        report.failing_step,
        report.reason
    );
    assert_eq!(report.result.exit_code(), 0);
}

pub fn assert_aborted_at(report: &PipelineReport, step: &str) {
    assert_eq!(report.result.failing_step(), Some(step), "reason: {:?}", report.reason);
    assert_eq!(report.result.exit_code(), 1);
    let last_executed = report.executed_steps().last().map(|s| s.to_string());
    if step != "validate" {
        assert_eq!(last_executed.as_deref(), Some(step), "no step may run after the failing one");
    }
}
