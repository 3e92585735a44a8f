//! Operator prompts

pub mod terminal;

use crate::core::WorkflowError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use terminal::{AssumeYes, LinePrompt, TerminalPrompt};

/// A question for the operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRequest {
    pub message: String,
    /// An empty answer is asked again
    pub required: bool,
}

impl PromptRequest {
    pub fn new(message: impl Into<String>, required: bool) -> Self {
        Self {
            message: message.into(),
            required,
        }
    }
}

/// The operator's answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptResponse {
    pub answer: String,
}

impl PromptResponse {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
        }
    }

    pub fn is_yes(&self) -> bool {
        is_yes(&self.answer)
    }
}

/// Poses questions and waits, without timeout, for the answer
///
/// Re-asking on an empty answer to a required request is the gateway's
/// job, not the caller's.
#[async_trait]
pub trait PromptGateway: Send + Sync {
    async fn ask(&self, request: &PromptRequest) -> Result<PromptResponse, WorkflowError>;
}

/// Case-insensitive comparison against "y"
pub fn is_yes(answer: &str) -> bool {
    answer.eq_ignore_ascii_case("y")
}
