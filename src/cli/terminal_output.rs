//! Live terminal rendering of execution events
//!
//! Command steps get a spinner while the external process runs; every
//! other event is printed as a line through [`format_execution_event`].

use crate::{
    cli::output::format_execution_event,
    core::StepKind,
    execution::ExecutionEvent,
};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::Duration;

/// Event handler printing a workflow run to the terminal
#[derive(Default)]
pub struct TerminalReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl TerminalReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle one execution event
    pub fn handle(&self, event: &ExecutionEvent) {
        match event {
            ExecutionEvent::PipelineStarted { .. } => {
                self.print_separator();
                self.print_line(event);
            }
            ExecutionEvent::StepStarted {
                kind: StepKind::Command,
                description,
                step,
                ..
            } => {
                let message = description.clone().unwrap_or_else(|| step.clone());
                self.start_spinner(message);
            }
            ExecutionEvent::PipelineFinished { .. } => {
                self.stop_spinner();
                self.print_line(event);
                self.print_separator();
            }
            _ => {
                self.stop_spinner();
                self.print_line(event);
            }
        }
    }

    /// Whether a spinner is currently shown
    pub fn is_spinning(&self) -> bool {
        self.spinner.lock().map(|s| s.is_some()).unwrap_or(false)
    }

    fn print_line(&self, event: &ExecutionEvent) {
        if let Some(line) = format_execution_event(event) {
            println!("{}", line);
            self.flush_stdout();
        }
    }

    fn start_spinner(&self, message: String) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(template) = ProgressStyle::with_template("{spinner:.green} {msg}") {
            spinner.set_style(template);
        }
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut slot) = self.spinner.lock() {
            if let Some(previous) = slot.replace(spinner) {
                previous.finish_and_clear();
            }
        }
    }

    fn stop_spinner(&self) {
        if let Ok(mut slot) = self.spinner.lock() {
            if let Some(spinner) = slot.take() {
                spinner.finish_and_clear();
            }
        }
    }

    /// A horizontal rule spanning the terminal width
    fn print_separator(&self) {
        let width = term_size::dimensions_stdout()
            .map(|(w, _)| w)
            .unwrap_or(80);
        println!("{}", style("─".repeat(width)).dim());
    }

    fn flush_stdout(&self) {
        let _ = io::stdout().flush();
    }
}
