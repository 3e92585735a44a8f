//! CLI output formatting

use crate::{
    core::{ExecutionStatus, NoticeLevel, PipelineReport, StepNotice, StepState},
    execution::{ExecutionEvent, Verdict},
};
use console::Emoji;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static SPINNER: Emoji<'_, '_> = Emoji("⏳ ", "~ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "! ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");
pub static SKIP: Emoji<'_, '_> = Emoji("⏭️  ", "- ");

/// Format a step state for display
pub fn format_step_state(state: &StepState) -> String {
    match state {
        StepState::Pending => style("PENDING").dim().to_string(),
        StepState::Running { .. } => style("RUNNING").yellow().to_string(),
        StepState::Completed { verdict, .. } => match verdict {
            Verdict::Warning => style("COMPLETED (warning)").yellow().to_string(),
            Verdict::Error => style("COMPLETED (error reported)").yellow().to_string(),
            _ => style("COMPLETED").green().to_string(),
        },
        StepState::Failed { .. } => style("FAILED").red().to_string(),
        StepState::Skipped { .. } => style("SKIPPED").dim().to_string(),
    }
}

/// Format an execution status for display
pub fn format_status(status: ExecutionStatus) -> String {
    match status {
        ExecutionStatus::Idle => style("IDLE").dim().to_string(),
        ExecutionStatus::Running => style("RUNNING").yellow().to_string(),
        ExecutionStatus::Completed => style("COMPLETED").green().to_string(),
        ExecutionStatus::Aborted => style("ABORTED").red().to_string(),
    }
}

/// Format an operator notice according to its level
pub fn format_notice(notice: &StepNotice) -> String {
    match notice.level {
        NoticeLevel::Info => format!("   {}", notice.message),
        NoticeLevel::Notice => format!("{}{}", WARN, style(&notice.message).yellow()),
        NoticeLevel::Success => format!("{}{}", CHECK, style(&notice.message).green()),
        NoticeLevel::Error => format!("{}{}", CROSS, style(&notice.message).red()),
    }
}

/// Format an execution event for display
///
/// Returns `None` for events that produce no line of their own.
pub fn format_execution_event(event: &ExecutionEvent) -> Option<String> {
    let line = match event {
        ExecutionEvent::PipelineStarted {
            execution_id,
            pipeline_name,
            total_steps,
        } => format!(
            "{}Starting {} ({} steps, {})",
            ROCKET,
            style(pipeline_name).bold(),
            total_steps,
            style(&execution_id.to_string()[..8]).dim()
        ),
        ExecutionEvent::StepStarted { description, .. } => match description {
            Some(description) => format!("{}{}", SPINNER, description),
            None => return None,
        },
        ExecutionEvent::StepSkipped { step, reason } => {
            format!("{}{} {}", SKIP, style(step).dim(), style(format!("({})", reason)).dim())
        }
        ExecutionEvent::StepNotice { notice, .. } => format_notice(notice),
        ExecutionEvent::StepCompleted { step, verdict } => match verdict {
            Verdict::Warning | Verdict::Error => format!("{}{}", WARN, style(step).yellow()),
            _ => format!("{}{}", CHECK, style(step).green()),
        },
        ExecutionEvent::StepFailed { step, error } => {
            format!("{}{}: {}", CROSS, style(step).red(), error)
        }
        ExecutionEvent::PipelineFinished { execution_id, status } => format!(
            "{}Run {} {}",
            INFO,
            style(&execution_id.to_string()[..8]).dim(),
            format_status(*status)
        ),
    };
    Some(line)
}

/// Per-step states of a finished run, one line each
pub fn format_step_table(report: &PipelineReport) -> String {
    let width = report.steps.iter().map(|s| s.name.len()).max().unwrap_or(0);
    report
        .steps
        .iter()
        .map(|s| format!("  {:<width$}  {}", s.name, format_step_state(&s.state), width = width))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One-line summary printed after a run
pub fn format_report_summary(report: &PipelineReport) -> String {
    match (&report.failing_step, &report.reason) {
        (Some(step), Some(reason)) => format!(
            "{}{} {} at {}: {}",
            CROSS,
            style(&report.workflow).bold(),
            style("aborted").red(),
            style(step).red(),
            reason
        ),
        _ => format!(
            "{}{} {} ({} ran, {} skipped)",
            CHECK,
            style(&report.workflow).bold(),
            style("completed").green(),
            report.executed_steps().len(),
            report.skipped_steps().len()
        ),
    }
}
