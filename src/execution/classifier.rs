//! Outcome classification of raw command output
//!
//! Each command purpose has its own heuristic. The fatal/non-fatal split is
//! asymmetric: only a failed production build aborts a run.
//! A failed package install or failing tests are reported and the run goes
//! on.

use crate::core::StepNotice;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker the build tooling prints on stderr when the build fails
const BUILD_FAILURE_MARKER: &str = "Exit status";

/// Marker npm uses for warnings on stderr
const INSTALL_WARNING_MARKER: &str = "WARN";

/// Marker npm prints on stdout after installing packages
const INSTALL_SUCCESS_MARKER: &str = "added";

/// Why a command is run; selects the classification rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandPurpose {
    Test,
    Build,
    PackageInstall,
    /// Build-and-run in a separate process
    Launch,
}

impl CommandPurpose {
    /// Whether an `Error` verdict aborts the pipeline
    pub fn aborts_on_error(&self) -> bool {
        matches!(self, CommandPurpose::Build)
    }
}

impl fmt::Display for CommandPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CommandPurpose::Test => "test",
            CommandPurpose::Build => "build",
            CommandPurpose::PackageInstall => "package_install",
            CommandPurpose::Launch => "launch",
        };
        f.write_str(name)
    }
}

/// Semantic judgment of a command's output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Success,
    Warning,
    Error,
    /// Informational only; never aborts
    Unclassified,
}

/// Classified result of one command run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub raw_stdout: String,
    pub raw_stderr: String,
    pub verdict: Verdict,
}

impl CommandOutcome {
    /// Whether this outcome must abort a step of the given purpose
    pub fn is_fatal(&self, purpose: CommandPurpose) -> bool {
        self.verdict == Verdict::Error && purpose.aborts_on_error()
    }
}

/// Turns raw command output into verdicts and operator notices
pub struct OutcomeClassifier;

impl OutcomeClassifier {
    /// Classify raw output for a purpose
    pub fn classify(purpose: CommandPurpose, stdout: &str, stderr: &str) -> Verdict {
        match purpose {
            CommandPurpose::Build => {
                if stderr.contains(BUILD_FAILURE_MARKER) {
                    Verdict::Error
                } else {
                    Verdict::Success
                }
            }
            CommandPurpose::Test => Verdict::Unclassified,
            CommandPurpose::PackageInstall => {
                if !stderr.is_empty() {
                    if stderr.contains(INSTALL_WARNING_MARKER) {
                        Verdict::Warning
                    } else {
                        Verdict::Error
                    }
                } else if stdout.contains(INSTALL_SUCCESS_MARKER) {
                    Verdict::Success
                } else {
                    Verdict::Unclassified
                }
            }
            CommandPurpose::Launch => {
                if stderr.is_empty() {
                    Verdict::Success
                } else {
                    Verdict::Error
                }
            }
        }
    }

    /// Classify and wrap the raw output
    pub fn outcome(purpose: CommandPurpose, stdout: &str, stderr: &str) -> CommandOutcome {
        CommandOutcome {
            raw_stdout: stdout.to_string(),
            raw_stderr: stderr.to_string(),
            verdict: Self::classify(purpose, stdout, stderr),
        }
    }

    /// Operator-facing messages for a classified outcome
    pub fn notices(purpose: CommandPurpose, outcome: &CommandOutcome, project_name: &str) -> Vec<StepNotice> {
        let stderr = outcome.raw_stderr.as_str();
        let mut notices = Vec::new();

        match purpose {
            CommandPurpose::Build => match outcome.verdict {
                Verdict::Error => notices.push(StepNotice::error("Error running production build")),
                _ => notices.push(StepNotice::success("Production build completed")),
            },
            CommandPurpose::Test => {
                if !stderr.trim().is_empty() {
                    notices.push(StepNotice::notice(stderr.trim_end()));
                }
            }
            CommandPurpose::PackageInstall => {
                match outcome.verdict {
                    Verdict::Warning => {
                        notices.push(StepNotice::notice(format!("NPM Warning: {}", stderr.trim_end())))
                    }
                    Verdict::Error => {
                        notices.push(StepNotice::error(format!("NPM Error: {}", stderr.trim_end())))
                    }
                    _ => {}
                }
                if outcome.raw_stdout.contains(INSTALL_SUCCESS_MARKER) {
                    notices.push(StepNotice::success("Installed npm packages"));
                }
            }
            CommandPurpose::Launch => match outcome.verdict {
                Verdict::Error => notices.push(StepNotice::error(stderr.trim_end())),
                _ => {
                    notices.push(StepNotice::success(format!(
                        "Webpack is now serving and watching {}",
                        project_name
                    )));
                    notices.push(StepNotice::notice(
                        "A new terminal window has been opened for this process",
                    ));
                }
            },
        }

        notices
    }
}
