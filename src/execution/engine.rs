//! Pipeline engine - runs a workflow's steps in order and decides when to abort

use crate::{
    core::{
        render_placeholders, ExecutionStatus, Pipeline, PipelineResult, StepKind, StepNotice, StepState,
        WorkflowContext, WorkflowError,
    },
    execution::{StepExecutor, Verdict},
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Events that can occur during pipeline execution
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    PipelineStarted {
        execution_id: Uuid,
        pipeline_name: String,
        total_steps: usize,
    },
    StepStarted {
        step: String,
        index: usize,
        kind: StepKind,
        description: Option<String>,
    },
    StepSkipped {
        step: String,
        reason: String,
    },
    StepNotice {
        step: String,
        notice: StepNotice,
    },
    StepCompleted {
        step: String,
        verdict: Verdict,
    },
    StepFailed {
        step: String,
        error: String,
    },
    PipelineFinished {
        execution_id: Uuid,
        status: ExecutionStatus,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(ExecutionEvent) + Send + Sync>;

/// Sequential step interpreter
///
/// `Idle -> Running(i) -> Completed | Aborted`. A step's condition is evaluated
/// right before it would run; an error from a step aborts the run and no later
/// step executes. Nothing already done is undone.
pub struct StepPipeline {
    executor: StepExecutor,
    event_handlers: Vec<EventHandler>,
}

impl StepPipeline {
    pub fn new(executor: StepExecutor) -> Self {
        Self {
            executor,
            event_handlers: Vec::new(),
        }
    }

    /// Add an event handler
    pub fn add_event_handler<F>(&mut self, handler: F)
    where
        F: Fn(ExecutionEvent) + Send + Sync + 'static,
    {
        self.event_handlers.push(Arc::new(handler));
    }

    /// Emit an event to all handlers
    fn emit_event(&self, event: ExecutionEvent) {
        for handler in &self.event_handlers {
            handler(event.clone());
        }
    }

    /// Run every step of `pipeline` against `context`
    pub async fn run(&self, pipeline: &mut Pipeline, context: &mut WorkflowContext) -> PipelineResult {
        let execution_id = pipeline.state.execution_id;
        info!("Starting pipeline execution: {} ({})", pipeline.name, execution_id);

        pipeline.state.start(pipeline.steps.len());
        self.emit_event(ExecutionEvent::PipelineStarted {
            execution_id,
            pipeline_name: pipeline.name.clone(),
            total_steps: pipeline.steps.len(),
        });

        for index in 0..pipeline.steps.len() {
            pipeline.state.current_step = Some(index);
            let step = pipeline.steps[index].clone();

            if !step.should_run(context) {
                let reason = step
                    .condition
                    .as_ref()
                    .map(|condition| condition.skip_reason())
                    .unwrap_or_default();
                debug!("Skipping step {}: {}", step.name, reason);

                pipeline.steps[index].state = StepState::Skipped {
                    reason: reason.clone(),
                };
                pipeline.state.skipped_steps += 1;
                self.emit_event(ExecutionEvent::StepSkipped {
                    step: step.name.clone(),
                    reason,
                });
                continue;
            }

            let started_at = Utc::now();
            pipeline.steps[index].state = StepState::Running { started_at };
            self.emit_event(ExecutionEvent::StepStarted {
                step: step.name.clone(),
                index,
                kind: step.kind(),
                description: step
                    .description
                    .as_ref()
                    .map(|d| render_placeholders(d, &context.get_rendering_variables())),
            });

            match self.executor.execute(&step, context).await {
                Ok(outcome) => {
                    for notice in outcome.notices {
                        self.emit_event(ExecutionEvent::StepNotice {
                            step: step.name.clone(),
                            notice,
                        });
                    }

                    context.merge(outcome.writes);
                    pipeline.steps[index].state = StepState::Completed {
                        verdict: outcome.verdict,
                        started_at,
                        completed_at: Utc::now(),
                    };
                    pipeline.state.completed_steps += 1;
                    debug!("{} progress: {:.0}%", pipeline.name, pipeline.state.progress() * 100.0);
                    self.emit_event(ExecutionEvent::StepCompleted {
                        step: step.name.clone(),
                        verdict: outcome.verdict,
                    });
                }
                Err(reason) => {
                    error!("Step {} aborted the pipeline: {}", step.name, reason);

                    pipeline.steps[index].state = StepState::Failed {
                        error: reason.to_string(),
                        started_at,
                        failed_at: Utc::now(),
                    };
                    pipeline.state.abort();
                    self.emit_event(ExecutionEvent::StepFailed {
                        step: step.name.clone(),
                        error: reason.to_string(),
                    });
                    self.emit_event(ExecutionEvent::PipelineFinished {
                        execution_id,
                        status: ExecutionStatus::Aborted,
                    });

                    return PipelineResult::Aborted {
                        step: step.name,
                        reason,
                    };
                }
            }
        }

        pipeline.state.complete();
        info!(
            "Pipeline execution finished: {} ({} ran, {} skipped)",
            pipeline.name, pipeline.state.completed_steps, pipeline.state.skipped_steps
        );
        self.emit_event(ExecutionEvent::PipelineFinished {
            execution_id,
            status: ExecutionStatus::Completed,
        });

        PipelineResult::Completed
    }

    /// Abort a run before any of its steps executes
    pub fn reject(&self, pipeline: &mut Pipeline, step: &str, reason: WorkflowError) -> PipelineResult {
        let execution_id = pipeline.state.execution_id;
        error!("Pipeline {} rejected at {}: {}", pipeline.name, step, reason);

        pipeline.state.start(pipeline.steps.len());
        pipeline.state.abort();
        self.emit_event(ExecutionEvent::StepFailed {
            step: step.to_string(),
            error: reason.to_string(),
        });
        self.emit_event(ExecutionEvent::PipelineFinished {
            execution_id,
            status: ExecutionStatus::Aborted,
        });

        PipelineResult::Aborted {
            step: step.to_string(),
            reason,
        }
    }
}
