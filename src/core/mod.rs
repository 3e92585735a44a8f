//! Core domain models
//!
//! This module defines the data structures a workflow run is made of:
//! steps, the pipeline holding them, the context threaded through the run
//! and the errors that abort it.

pub mod config;
pub mod context;
pub mod error;
pub mod pipeline;
pub mod platform;
pub mod report;
pub mod state;
pub mod step;

pub use context::*;
pub use error::WorkflowError;
pub use pipeline::*;
pub use platform::Platform;
pub use report::{PipelineReport, StepRecord};
pub use state::*;
pub use step::*;
