//! Pipeline execution engine

pub mod classifier;
pub mod command;
pub mod engine;
pub mod executor;

pub use classifier::{CommandOutcome, CommandPurpose, OutcomeClassifier, Verdict};
pub use command::{CommandExecutor, CommandOutput, ShellCommandExecutor};
pub use engine::{EventHandler, ExecutionEvent, StepPipeline};
pub use executor::{StepExecutor, StepOutcome};
