//! Execution state models

use crate::core::WorkflowError;
use crate::execution::Verdict;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Overall pipeline execution status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionStatus {
    /// Pipeline has not started
    Idle,
    /// Pipeline is currently running
    Running,
    /// Every step ran or was skipped
    Completed,
    /// A step aborted the run
    Aborted,
}

/// State of a single step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StepState {
    /// Step has not been reached
    Pending,
    /// Step is currently running
    Running {
        started_at: DateTime<Utc>,
    },
    /// Step finished without aborting the run
    Completed {
        verdict: Verdict,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    },
    /// Step's condition evaluated to false
    Skipped {
        reason: String,
    },
    /// Step aborted the run
    Failed {
        error: String,
        started_at: DateTime<Utc>,
        failed_at: DateTime<Utc>,
    },
}

/// Overall pipeline state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineState {
    /// Unique execution ID
    pub execution_id: Uuid,

    /// Current execution status
    pub status: ExecutionStatus,

    /// When execution started
    pub started_at: Option<DateTime<Utc>>,

    /// When execution completed or aborted
    pub finished_at: Option<DateTime<Utc>>,

    /// Index of the step currently running
    pub current_step: Option<usize>,

    /// Total number of steps
    pub total_steps: usize,

    /// Number of completed steps
    pub completed_steps: usize,

    /// Number of skipped steps
    pub skipped_steps: usize,
}

impl PipelineState {
    /// Create a new pipeline state
    pub fn new() -> Self {
        Self {
            execution_id: Uuid::new_v4(),
            status: ExecutionStatus::Idle,
            started_at: None,
            finished_at: None,
            current_step: None,
            total_steps: 0,
            completed_steps: 0,
            skipped_steps: 0,
        }
    }

    /// Mark pipeline as started
    pub fn start(&mut self, total_steps: usize) {
        self.status = ExecutionStatus::Running;
        self.started_at = Some(Utc::now());
        self.total_steps = total_steps;
    }

    /// Mark pipeline as completed
    pub fn complete(&mut self) {
        self.status = ExecutionStatus::Completed;
        self.current_step = None;
        self.finished_at = Some(Utc::now());
    }

    /// Mark pipeline as aborted
    pub fn abort(&mut self) {
        self.status = ExecutionStatus::Aborted;
        self.finished_at = Some(Utc::now());
    }

    /// Calculate progress percentage (0.0 to 1.0)
    pub fn progress(&self) -> f64 {
        if self.total_steps == 0 {
            return 0.0;
        }
        (self.completed_steps + self.skipped_steps) as f64 / self.total_steps as f64
    }
}

impl Default for PipelineState {
    fn default() -> Self {
        Self::new()
    }
}

/// Terminal record of a pipeline run
#[derive(Debug)]
pub enum PipelineResult {
    Completed,
    Aborted {
        /// Name of the step that aborted the run
        step: String,
        reason: WorkflowError,
    },
}

impl PipelineResult {
    pub fn is_completed(&self) -> bool {
        matches!(self, PipelineResult::Completed)
    }

    /// Name of the failing step, if the run aborted
    pub fn failing_step(&self) -> Option<&str> {
        match self {
            PipelineResult::Completed => None,
            PipelineResult::Aborted { step, .. } => Some(step),
        }
    }

    /// Abort reason, if the run aborted
    pub fn reason(&self) -> Option<&WorkflowError> {
        match self {
            PipelineResult::Completed => None,
            PipelineResult::Aborted { reason, .. } => Some(reason),
        }
    }

    /// Process exit code for the CLI
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineResult::Completed => 0,
            PipelineResult::Aborted { .. } => 1,
        }
    }
}
