//! Line-based prompt gateway for the terminal
//!
//! Questions are echoed to stderr so stdout only ever carries the run
//! report.

use crate::core::WorkflowError;
use crate::prompt::{PromptGateway, PromptRequest, PromptResponse};
use async_trait::async_trait;
use console::style;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};
use tokio::sync::Mutex;
use tracing::debug;

type Echo = std::sync::Mutex<Box<dyn Write + Send>>;

/// Prompt gateway reading answers line by line
pub struct LinePrompt<R> {
    reader: Mutex<R>,
    echo: Option<Echo>,
}

/// Prompt gateway attached to the process's stdin
pub type TerminalPrompt = LinePrompt<BufReader<Stdin>>;

impl TerminalPrompt {
    pub fn stdin() -> Self {
        LinePrompt::with_echo(BufReader::new(tokio::io::stdin()), std::io::stderr())
    }
}

impl<R> LinePrompt<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    /// Read answers from any buffered reader, without echoing questions
    pub fn new(reader: R) -> Self {
        Self {
            reader: Mutex::new(reader),
            echo: None,
        }
    }

    /// Read answers from `reader`, writing each question to `echo` first
    pub fn with_echo(reader: R, echo: impl Write + Send + 'static) -> Self {
        Self {
            reader: Mutex::new(reader),
            echo: Some(std::sync::Mutex::new(Box::new(echo))),
        }
    }

    fn show(&self, request: &PromptRequest) {
        let Some(echo) = &self.echo else {
            return;
        };
        if let Ok(mut out) = echo.lock() {
            let _ = write!(out, "{} ", style(&request.message).for_stderr().bold());
            let _ = out.flush();
        }
    }
}

#[async_trait]
impl<R> PromptGateway for LinePrompt<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn ask(&self, request: &PromptRequest) -> Result<PromptResponse, WorkflowError> {
        let mut reader = self.reader.lock().await;

        loop {
            self.show(request);

            let mut line = String::new();
            let read = reader
                .read_line(&mut line)
                .await
                .map_err(|e| WorkflowError::UserAbort(format!("Failed to read answer: {}", e)))?;

            if read == 0 {
                return Err(WorkflowError::UserAbort(format!(
                    "Input closed before answering '{}'",
                    request.message
                )));
            }

            let answer = line.trim_end_matches(['\r', '\n']).to_string();
            if answer.is_empty() && request.required {
                debug!("Empty answer to required prompt, asking again");
                continue;
            }

            return Ok(PromptResponse { answer });
        }
    }
}

/// Answers every prompt with "y"
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

#[async_trait]
impl PromptGateway for AssumeYes {
    async fn ask(&self, request: &PromptRequest) -> Result<PromptResponse, WorkflowError> {
        eprintln!(
            "{} {}",
            style(&request.message).for_stderr().bold(),
            style("y").for_stderr().dim()
        );
        Ok(PromptResponse::new("y"))
    }
}
